#![forbid(unsafe_code)]

//! Icon entity.
//!
//! An [`Icon`] is plain state: identity, kind, group, priority, quirks and a
//! few per-monitor geometry caches. It stores no callbacks; observers
//! subscribe through the runtime's event bus keyed by [`IconId`].
//!
//! `sort_priority` and `position` are only written by the
//! [`IconCollection`](crate::IconCollection), which keeps the ordering
//! invariants.

use std::fmt;

use dock_core::{Point3, Quirk, QuirkTable, WindowId};
use web_time::Instant;

/// Stable handle for an icon. Never reused within one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IconId(pub u64);

impl fmt::Display for IconId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "icon#{}", self.0)
    }
}

/// Which partition group an icon belongs to. Ordinal order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum IconPosition {
    Begin,
    #[default]
    Floating,
    End,
}

impl IconPosition {
    /// End icons live on the shelf; everything else in main.
    #[inline]
    pub const fn on_shelf(self) -> bool {
        matches!(self, Self::End)
    }
}

/// Closed set of icon kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconKind {
    Application,
    Device,
    Home,
    Hud,
    Trash,
    Spacer,
    Desktop,
    Expo,
    Volume,
    Separator,
}

/// What an icon kind is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconCapabilities {
    pub draggable: bool,
    pub accepts_drop: bool,
    pub system_item: bool,
    pub shows_shortcut: bool,
    pub can_be_favorite: bool,
}

impl IconKind {
    pub const fn capabilities(self) -> IconCapabilities {
        const fn caps(
            draggable: bool,
            accepts_drop: bool,
            system_item: bool,
            shows_shortcut: bool,
            can_be_favorite: bool,
        ) -> IconCapabilities {
            IconCapabilities {
                draggable,
                accepts_drop,
                system_item,
                shows_shortcut,
                can_be_favorite,
            }
        }
        match self {
            Self::Application => caps(true, true, false, true, true),
            Self::Device | Self::Volume => caps(true, true, false, true, true),
            Self::Desktop | Self::Expo => caps(true, false, false, true, true),
            Self::Home | Self::Hud => caps(false, false, true, false, false),
            Self::Trash => caps(false, true, true, false, false),
            Self::Spacer | Self::Separator => caps(false, false, false, false, false),
        }
    }

    /// Default group for a freshly created icon of this kind.
    pub const fn default_position(self) -> IconPosition {
        match self {
            Self::Home | Self::Hud => IconPosition::Begin,
            Self::Trash | Self::Separator => IconPosition::End,
            _ => IconPosition::Floating,
        }
    }
}

/// A launcher icon.
#[derive(Debug, Clone)]
pub struct Icon {
    pub(crate) id: IconId,
    kind: IconKind,
    pub(crate) position: IconPosition,
    pub(crate) sort_priority: i32,
    pub(crate) removed: bool,
    pub(crate) sticky: bool,
    quirks: QuirkTable,
    progress: f32,
    present_urgency: f32,
    uri: Option<String>,
    tooltip: String,
    shortcut: Option<char>,
    centers: Vec<Point3>,
    saved_centers: Vec<Point3>,
    windows: Vec<WindowId>,
}

impl Icon {
    /// Create an icon of `kind` in its default group.
    #[must_use]
    pub fn new(kind: IconKind) -> Self {
        Self {
            id: IconId(0),
            kind,
            position: kind.default_position(),
            sort_priority: 0,
            removed: false,
            sticky: false,
            quirks: QuirkTable::new(1),
            progress: 0.0,
            present_urgency: 0.0,
            uri: None,
            tooltip: String::new(),
            shortcut: None,
            centers: vec![Point3::default()],
            saved_centers: vec![Point3::default()],
            windows: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_position(mut self, position: IconPosition) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.sort_priority = priority;
        self
    }

    #[must_use]
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    #[must_use]
    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = tooltip.into();
        self
    }

    #[must_use]
    pub fn sticky(mut self) -> Self {
        self.sticky = true;
        self
    }

    /// Start out visible on every monitor, without a fade-in.
    #[must_use]
    pub fn visible(mut self) -> Self {
        self.quirks.set_settled(Quirk::Visible, true, None);
        self
    }

    #[inline]
    pub fn id(&self) -> IconId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> IconKind {
        self.kind
    }

    #[inline]
    pub fn capabilities(&self) -> IconCapabilities {
        self.kind.capabilities()
    }

    #[inline]
    pub fn position(&self) -> IconPosition {
        self.position
    }

    #[inline]
    pub fn sort_priority(&self) -> i32 {
        self.sort_priority
    }

    /// Marked for removal and waiting out the grace period.
    #[inline]
    pub fn is_removed(&self) -> bool {
        self.removed
    }

    /// Pinned as a favorite.
    #[inline]
    pub fn is_sticky(&self) -> bool {
        self.sticky
    }

    /// Visible on at least one monitor.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.quirks.any(Quirk::Visible)
    }

    #[inline]
    pub fn quirks(&self) -> &QuirkTable {
        &self.quirks
    }

    #[inline]
    pub fn quirk(&self, quirk: Quirk, monitor: usize) -> bool {
        self.quirks.get(quirk, monitor)
    }

    /// Set a quirk on one monitor (or all). Returns whether it changed.
    pub fn set_quirk(&mut self, quirk: Quirk, value: bool, monitor: Option<usize>, now: Instant) -> bool {
        let changed = self.quirks.set(quirk, value, monitor, now);
        if changed {
            tracing::trace!(target: "dock.model", icon = %self.id, %quirk, value, ?monitor, "quirk flipped");
        }
        changed
    }

    /// End a one-shot animation: clear the quirk and forget when it flipped,
    /// so it reads as long settled rather than fading out.
    pub fn expire_quirk(&mut self, quirk: Quirk, monitor: Option<usize>, now: Instant) {
        self.quirks.set(quirk, false, monitor, now);
        self.quirks.clear_stamp(quirk, monitor);
        tracing::trace!(target: "dock.model", icon = %self.id, %quirk, ?monitor, "quirk expired");
    }

    /// Re-arm a quirk's animation without changing its value.
    pub fn restamp_quirk(&mut self, quirk: Quirk, monitor: Option<usize>, now: Instant) {
        self.quirks.restamp(quirk, monitor, now);
    }

    #[inline]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Task progress in `[0, 1]`; out-of-range values are clamped.
    pub fn set_progress(&mut self, progress: f32) {
        self.progress = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    /// How strongly a presented icon overrides the autohide offset.
    #[inline]
    pub fn present_urgency(&self) -> f32 {
        self.present_urgency
    }

    pub fn set_present_urgency(&mut self, urgency: f32) {
        self.present_urgency = if urgency.is_finite() {
            urgency.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    /// Present the icon above the autohide offset; `urgency` scales how far.
    pub fn present(&mut self, urgency: f32, monitor: Option<usize>, now: Instant) {
        self.set_present_urgency(urgency);
        self.set_quirk(Quirk::Presented, true, monitor, now);
    }

    pub fn unpresent(&mut self, monitor: Option<usize>, now: Instant) {
        self.set_quirk(Quirk::Presented, false, monitor, now);
    }

    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }

    pub fn set_tooltip(&mut self, tooltip: impl Into<String>) {
        self.tooltip = tooltip.into();
    }

    #[inline]
    pub fn shortcut(&self) -> Option<char> {
        self.shortcut
    }

    pub fn set_shortcut(&mut self, shortcut: Option<char>) {
        self.shortcut = shortcut;
    }

    /// Logical centre last laid out on `monitor`.
    pub fn center(&self, monitor: usize) -> Point3 {
        self.centers.get(monitor).copied().unwrap_or_default()
    }

    pub fn set_center(&mut self, monitor: usize, center: Point3) {
        if let Some(slot) = self.centers.get_mut(monitor) {
            *slot = center;
        }
    }

    /// Centre captured by the last [`save_center`](Self::save_center).
    pub fn saved_center(&self, monitor: usize) -> Point3 {
        self.saved_centers.get(monitor).copied().unwrap_or_default()
    }

    /// Remember current centres so the sampler can glide from them.
    pub fn save_center(&mut self, now: Instant) {
        self.saved_centers.clone_from(&self.centers);
        self.quirks.set(Quirk::CenterSaved, true, None, now);
        self.quirks.restamp(Quirk::CenterSaved, None, now);
    }

    /// Windows backing this icon, for the window-state source.
    pub fn windows(&self) -> &[WindowId] {
        &self.windows
    }

    pub fn set_windows(&mut self, windows: Vec<WindowId>) {
        self.windows = windows;
    }

    pub(crate) fn set_monitor_count(&mut self, monitors: usize) {
        let monitors = monitors.max(1);
        self.quirks.resize(monitors);
        self.centers.resize(monitors, Point3::default());
        self.saved_centers.resize(monitors, Point3::default());
    }
}
