#![forbid(unsafe_code)]

//! Hide and reveal state for one launcher.
//!
//! With [`HideMode::Autohide`] the launcher stays hidden unless at least one
//! [`RevealReasons`] flag is set. Clearing the last reason starts the hide
//! delay; setting any reason cancels it. With [`HideMode::Never`] the launcher
//! is always revealed and reasons are only recorded.

use std::time::Duration;

use bitflags::bitflags;
use dock_core::HideMode;
use dock_layout::timing::{SHORT, ratio, since};
use web_time::Instant;

bitflags! {
    /// Why the launcher is currently revealed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RevealReasons: u8 {
        const EDGE = 1 << 0;
        const HOVER = 1 << 1;
        const KEY_NAV = 1 << 2;
        const DRAG = 1 << 3;
        const EXTERNAL = 1 << 4;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealChange {
    Revealed,
    Hidden,
}

#[derive(Debug, Clone)]
pub struct RevealState {
    mode: HideMode,
    hide_delay: Duration,
    reasons: RevealReasons,
    revealed: bool,
    toggled_at: Option<Instant>,
    hide_deadline: Option<Instant>,
}

impl RevealState {
    pub fn new(mode: HideMode, hide_delay: Duration) -> Self {
        Self {
            mode,
            hide_delay,
            reasons: RevealReasons::empty(),
            revealed: mode == HideMode::Never,
            toggled_at: None,
            hide_deadline: None,
        }
    }

    #[inline]
    pub fn mode(&self) -> HideMode {
        self.mode
    }

    #[inline]
    pub fn reasons(&self) -> RevealReasons {
        self.reasons
    }

    #[inline]
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Instant of the last show/hide transition.
    #[inline]
    pub fn toggled_at(&self) -> Option<Instant> {
        self.toggled_at
    }

    #[inline]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.hide_deadline
    }

    pub fn set_hide_delay(&mut self, delay: Duration) {
        self.hide_delay = delay;
    }

    pub fn set_mode(&mut self, mode: HideMode, now: Instant) -> Option<RevealChange> {
        if self.mode == mode {
            return None;
        }
        self.mode = mode;
        self.hide_deadline = None;
        match mode {
            HideMode::Never => self.show(now),
            HideMode::Autohide if self.reasons.is_empty() => self.hide(now),
            HideMode::Autohide => None,
        }
    }

    /// Set or clear one reason.
    pub fn set_reason(&mut self, reason: RevealReasons, on: bool, now: Instant) -> Option<RevealChange> {
        self.reasons.set(reason, on);
        if self.mode == HideMode::Never {
            return None;
        }
        if !self.reasons.is_empty() {
            self.hide_deadline = None;
            return self.show(now);
        }
        if self.revealed && self.hide_deadline.is_none() {
            self.hide_deadline = Some(now + self.hide_delay);
        }
        None
    }

    /// Fire the hide delay.
    pub fn tick(&mut self, now: Instant) -> Option<RevealChange> {
        let deadline = self.hide_deadline?;
        if now < deadline {
            return None;
        }
        self.hide_deadline = None;
        if self.reasons.is_empty() && self.mode == HideMode::Autohide {
            self.hide(now)
        } else {
            None
        }
    }

    /// `0` fully shown, `1` fully hidden; animates over [`SHORT`].
    pub fn hide_progress(&self, now: Instant) -> f32 {
        if self.mode == HideMode::Never {
            return 0.0;
        }
        let r = ratio(since(now, self.toggled_at), SHORT);
        if self.revealed { 1.0 - r } else { r }
    }

    fn show(&mut self, now: Instant) -> Option<RevealChange> {
        if self.revealed {
            return None;
        }
        self.revealed = true;
        self.toggled_at = Some(now);
        Some(RevealChange::Revealed)
    }

    fn hide(&mut self, now: Instant) -> Option<RevealChange> {
        if !self.revealed {
            return None;
        }
        self.revealed = false;
        self.toggled_at = Some(now);
        Some(RevealChange::Hidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_500: Duration = Duration::from_millis(500);
    const MS_100: Duration = Duration::from_millis(100);

    #[test]
    fn never_mode_is_always_shown() {
        let mut state = RevealState::new(HideMode::Never, MS_500);
        let now = Instant::now();
        assert!(state.is_revealed());
        assert_eq!(state.set_reason(RevealReasons::HOVER, false, now), None);
        assert_eq!(state.hide_progress(now), 0.0);
    }

    #[test]
    fn autohide_starts_hidden() {
        let state = RevealState::new(HideMode::Autohide, MS_500);
        assert!(!state.is_revealed());
        assert_eq!(state.hide_progress(Instant::now()), 1.0);
    }

    #[test]
    fn reason_reveals_and_delay_hides() {
        let mut state = RevealState::new(HideMode::Autohide, MS_500);
        let t0 = Instant::now();
        assert_eq!(
            state.set_reason(RevealReasons::EDGE, true, t0),
            Some(RevealChange::Revealed)
        );
        assert_eq!(state.hide_progress(t0), 1.0);
        assert_eq!(state.hide_progress(t0 + SHORT), 0.0);

        let t1 = t0 + MS_100;
        assert_eq!(state.set_reason(RevealReasons::EDGE, false, t1), None);
        assert_eq!(state.next_deadline(), Some(t1 + MS_500));
        assert_eq!(state.tick(t1 + MS_100), None);
        assert_eq!(state.tick(t1 + MS_500), Some(RevealChange::Hidden));
        assert!(!state.is_revealed());
    }

    #[test]
    fn new_reason_cancels_pending_hide() {
        let mut state = RevealState::new(HideMode::Autohide, MS_500);
        let t0 = Instant::now();
        state.set_reason(RevealReasons::EDGE, true, t0);
        state.set_reason(RevealReasons::EDGE, false, t0);
        assert_eq!(state.set_reason(RevealReasons::HOVER, true, t0 + MS_100), None);
        assert_eq!(state.next_deadline(), None);
        assert_eq!(state.tick(t0 + MS_500 * 2), None);
        assert!(state.is_revealed());
    }

    #[test]
    fn switching_mode() {
        let mut state = RevealState::new(HideMode::Never, MS_500);
        let t0 = Instant::now();
        assert_eq!(state.set_mode(HideMode::Autohide, t0), Some(RevealChange::Hidden));
        assert_eq!(state.set_mode(HideMode::Never, t0), Some(RevealChange::Revealed));
    }
}
