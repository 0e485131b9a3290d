#![forbid(unsafe_code)]

//! Per-monitor animation flags ("quirks").
//!
//! A quirk is a named boolean carrying the instant it last flipped. The layout
//! sampler turns `now - flipped_at` into animation progress, so the timestamp
//! only moves when the value really changes, or when a caller explicitly
//! re-arms it with [`QuirkTable::restamp`].
//!
//! # Invariants
//!
//! 1. [`QuirkTable::set`] returns `true` and records `now` iff the stored value
//!    changed on at least one addressed monitor.
//! 2. A quirk that never flipped (or whose stamp was cleared) reports an
//!    elapsed time of [`Duration::MAX`], which lies outside every animation
//!    window.
//! 3. Out-of-range monitor indices are ignored on write and read as `false`.
//!
//! # Example
//!
//! ```
//! use dock_core::quirk::{Quirk, QuirkTable};
//! use web_time::Instant;
//!
//! let mut quirks = QuirkTable::new(2);
//! let t0 = Instant::now();
//! assert!(quirks.set(Quirk::Visible, true, None, t0));
//! assert!(!quirks.set(Quirk::Visible, true, None, t0));
//! assert!(quirks.get(Quirk::Visible, 1));
//! ```

use std::fmt;
use std::time::Duration;

use bitflags::bitflags;
use web_time::Instant;

/// Named per-icon state flag, each driving one animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Quirk {
    Visible,
    Active,
    Running,
    Urgent,
    Presented,
    Unfolded,
    Starting,
    Shimmer,
    CenterSaved,
    Progress,
    DropPrelight,
    DropDim,
    Desat,
    PulseOnce,
}

impl Quirk {
    /// Number of quirks.
    pub const COUNT: usize = 14;

    /// Every quirk, in declaration order.
    pub const ALL: [Quirk; Self::COUNT] = [
        Quirk::Visible,
        Quirk::Active,
        Quirk::Running,
        Quirk::Urgent,
        Quirk::Presented,
        Quirk::Unfolded,
        Quirk::Starting,
        Quirk::Shimmer,
        Quirk::CenterSaved,
        Quirk::Progress,
        Quirk::DropPrelight,
        Quirk::DropDim,
        Quirk::Desat,
        Quirk::PulseOnce,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The single-bit set for this quirk.
    pub const fn flag(self) -> QuirkSet {
        match self {
            Quirk::Visible => QuirkSet::VISIBLE,
            Quirk::Active => QuirkSet::ACTIVE,
            Quirk::Running => QuirkSet::RUNNING,
            Quirk::Urgent => QuirkSet::URGENT,
            Quirk::Presented => QuirkSet::PRESENTED,
            Quirk::Unfolded => QuirkSet::UNFOLDED,
            Quirk::Starting => QuirkSet::STARTING,
            Quirk::Shimmer => QuirkSet::SHIMMER,
            Quirk::CenterSaved => QuirkSet::CENTER_SAVED,
            Quirk::Progress => QuirkSet::PROGRESS,
            Quirk::DropPrelight => QuirkSet::DROP_PRELIGHT,
            Quirk::DropDim => QuirkSet::DROP_DIM,
            Quirk::Desat => QuirkSet::DESAT,
            Quirk::PulseOnce => QuirkSet::PULSE_ONCE,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Quirk::Visible => "visible",
            Quirk::Active => "active",
            Quirk::Running => "running",
            Quirk::Urgent => "urgent",
            Quirk::Presented => "presented",
            Quirk::Unfolded => "unfolded",
            Quirk::Starting => "starting",
            Quirk::Shimmer => "shimmer",
            Quirk::CenterSaved => "center_saved",
            Quirk::Progress => "progress",
            Quirk::DropPrelight => "drop_prelight",
            Quirk::DropDim => "drop_dim",
            Quirk::Desat => "desat",
            Quirk::PulseOnce => "pulse_once",
        }
    }
}

impl fmt::Display for Quirk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// Current quirk values for one monitor.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct QuirkSet: u16 {
        const VISIBLE = 1 << 0;
        const ACTIVE = 1 << 1;
        const RUNNING = 1 << 2;
        const URGENT = 1 << 3;
        const PRESENTED = 1 << 4;
        const UNFOLDED = 1 << 5;
        const STARTING = 1 << 6;
        const SHIMMER = 1 << 7;
        const CENTER_SAVED = 1 << 8;
        const PROGRESS = 1 << 9;
        const DROP_PRELIGHT = 1 << 10;
        const DROP_DIM = 1 << 11;
        const DESAT = 1 << 12;
        const PULSE_ONCE = 1 << 13;
    }
}

#[derive(Debug, Clone, Default)]
struct MonitorQuirks {
    values: QuirkSet,
    stamps: [Option<Instant>; Quirk::COUNT],
}

/// Quirk values and flip timestamps for every monitor an icon appears on.
#[derive(Debug, Clone)]
pub struct QuirkTable {
    monitors: Vec<MonitorQuirks>,
}

impl Default for QuirkTable {
    fn default() -> Self {
        Self::new(1)
    }
}

impl QuirkTable {
    /// Create an all-false table for `monitors` monitors (at least one).
    #[must_use]
    pub fn new(monitors: usize) -> Self {
        Self {
            monitors: vec![MonitorQuirks::default(); monitors.max(1)],
        }
    }

    #[inline]
    pub fn monitor_count(&self) -> usize {
        self.monitors.len()
    }

    /// Grow or shrink to `monitors` entries.
    ///
    /// New monitors copy the values of monitor 0 without timestamps so icons
    /// appear settled on a freshly attached screen.
    pub fn resize(&mut self, monitors: usize) {
        let monitors = monitors.max(1);
        let template = MonitorQuirks {
            values: self.monitors[0].values,
            stamps: [None; Quirk::COUNT],
        };
        self.monitors.resize(monitors, template);
    }

    /// Value of `quirk` on `monitor`.
    #[inline]
    pub fn get(&self, quirk: Quirk, monitor: usize) -> bool {
        self.monitors
            .get(monitor)
            .is_some_and(|m| m.values.contains(quirk.flag()))
    }

    /// True if `quirk` is set on any monitor.
    pub fn any(&self, quirk: Quirk) -> bool {
        self.monitors.iter().any(|m| m.values.contains(quirk.flag()))
    }

    /// All quirk values for `monitor`.
    pub fn values(&self, monitor: usize) -> QuirkSet {
        self.monitors
            .get(monitor)
            .map(|m| m.values)
            .unwrap_or_default()
    }

    /// Set `quirk` on one monitor, or on all of them when `monitor` is `None`.
    ///
    /// Returns whether any addressed monitor changed value; only changed
    /// monitors get their timestamp moved to `now`.
    pub fn set(&mut self, quirk: Quirk, value: bool, monitor: Option<usize>, now: Instant) -> bool {
        let flag = quirk.flag();
        let mut changed = false;
        for m in self.addressed_mut(monitor) {
            if m.values.contains(flag) != value {
                m.values.set(flag, value);
                m.stamps[quirk.index()] = Some(now);
                changed = true;
            }
        }
        changed
    }

    /// Set a value as if it had been in place forever (no animation).
    pub fn set_settled(&mut self, quirk: Quirk, value: bool, monitor: Option<usize>) {
        let flag = quirk.flag();
        for m in self.addressed_mut(monitor) {
            m.values.set(flag, value);
            m.stamps[quirk.index()] = None;
        }
    }

    /// Move the timestamp to `now` without touching the value.
    pub fn restamp(&mut self, quirk: Quirk, monitor: Option<usize>, now: Instant) {
        for m in self.addressed_mut(monitor) {
            m.stamps[quirk.index()] = Some(now);
        }
    }

    /// Forget the timestamp so the quirk reads as long settled.
    pub fn clear_stamp(&mut self, quirk: Quirk, monitor: Option<usize>) {
        for m in self.addressed_mut(monitor) {
            m.stamps[quirk.index()] = None;
        }
    }

    /// Instant of the last flip, if any.
    pub fn flipped_at(&self, quirk: Quirk, monitor: usize) -> Option<Instant> {
        self.monitors
            .get(monitor)
            .and_then(|m| m.stamps[quirk.index()])
    }

    /// Time since the last flip; `Duration::MAX` if it never flipped.
    pub fn elapsed(&self, quirk: Quirk, monitor: usize, now: Instant) -> Duration {
        self.flipped_at(quirk, monitor)
            .map_or(Duration::MAX, |at| now.saturating_duration_since(at))
    }

    fn addressed_mut(&mut self, monitor: Option<usize>) -> impl Iterator<Item = &mut MonitorQuirks> {
        let range = match monitor {
            Some(m) if m < self.monitors.len() => m..m + 1,
            Some(_) => 0..0,
            None => 0..self.monitors.len(),
        };
        self.monitors[range].iter_mut()
    }
}
