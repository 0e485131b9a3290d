#![forbid(unsafe_code)]

//! Self-limiting redraw scheduling.
//!
//! A frame is requested by any state change. After drawing it, the scheduler
//! re-arms itself only while an animation is still running, so an idle
//! launcher costs nothing.

use std::time::Duration;

use web_time::Instant;

#[derive(Debug, Clone)]
pub struct RedrawScheduler {
    interval: Duration,
    pending: Option<Instant>,
    last_frame: Option<Instant>,
    frames: u64,
}

impl RedrawScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: None,
            last_frame: None,
            frames: 0,
        }
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Ask for a frame as soon as the frame interval allows.
    pub fn request(&mut self, now: Instant) {
        let earliest = self
            .last_frame
            .map_or(now, |last| (last + self.interval).max(now));
        self.pending = Some(self.pending.map_or(earliest, |p| p.min(earliest)));
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.pending.is_some_and(|due| due <= now)
    }

    #[inline]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending
    }

    /// Frames drawn so far.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Record a drawn frame; keep going only while `animating`.
    pub fn on_frame(&mut self, now: Instant, animating: bool) {
        self.last_frame = Some(now);
        self.frames += 1;
        self.pending = animating.then(|| now + self.interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_16: Duration = Duration::from_millis(16);
    const MS_5: Duration = Duration::from_millis(5);

    #[test]
    fn first_request_is_immediate() {
        let mut r = RedrawScheduler::new(MS_16);
        let t0 = Instant::now();
        r.request(t0);
        assert!(r.is_due(t0));
    }

    #[test]
    fn request_respects_interval() {
        let mut r = RedrawScheduler::new(MS_16);
        let t0 = Instant::now();
        r.on_frame(t0, false);
        assert!(!r.is_pending());
        r.request(t0 + MS_5);
        assert!(!r.is_due(t0 + MS_5));
        assert_eq!(r.next_deadline(), Some(t0 + MS_16));
    }

    #[test]
    fn animation_keeps_rearming() {
        let mut r = RedrawScheduler::new(MS_16);
        let t0 = Instant::now();
        r.on_frame(t0, true);
        assert_eq!(r.next_deadline(), Some(t0 + MS_16));
        r.on_frame(t0 + MS_16, false);
        assert_eq!(r.next_deadline(), None);
        assert_eq!(r.frames(), 2);
    }
}
