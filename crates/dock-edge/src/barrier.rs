#![forbid(unsafe_code)]

//! Pointer barrier wrapper with hit coalescing.
//!
//! A barrier is a one-pixel trip-wire along a monitor edge. The display
//! server reports every pointer collision as a raw hit; this wrapper folds all
//! hits inside a smoothing window into one [`BarrierEvent`] carrying the
//! averaged velocity, the same way input coalescers fold bursts of resize or
//! motion events.
//!
//! # Lifecycle
//!
//! ```text
//! inactive ──construct──► armed ──hit──► window open ──deadline──► flush
//!     ▲                     ▲                                        │
//!     └────destroy──────────┴──────────rearm◄──release◄──────────────┘
//! ```
//!
//! # Invariants
//!
//! 1. At most one event per smoothing window.
//! 2. Emitted velocity = average of the window's hits, capped at
//!    [`VELOCITY_CAP`] × `max_velocity_multiplier`.
//! 3. [`PointerBarrier::is_first_event`] is true only for the first event
//!    emitted for a given push (event id).
//! 4. Hits on an inactive barrier are dropped.

use std::time::Duration;

use web_time::Instant;

/// Base cap on reported velocity, before the responsiveness multiplier.
pub const VELOCITY_CAP: f32 = 600.0;

/// Which kind of edge a barrier guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Orientation {
    /// A vertical line on the left edge of a monitor.
    Vertical,
    /// A horizontal line on the top edge of a monitor.
    Horizontal,
}

impl Orientation {
    pub const ALL: [Orientation; 2] = [Orientation::Vertical, Orientation::Horizontal];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Directions in which the pointer may cross freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarrierDirection {
    Both,
    Left,
    Right,
    Up,
    Down,
}

/// Line segment and pass direction handed to the backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarrierGeometry {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub direction: BarrierDirection,
}

impl BarrierGeometry {
    /// Barrier along the edge `orientation` selects on `monitor`.
    pub fn for_monitor(monitor: dock_core::Rect, orientation: Orientation) -> Self {
        match orientation {
            Orientation::Vertical => Self {
                x1: monitor.x,
                y1: monitor.y,
                x2: monitor.x,
                y2: monitor.bottom(),
                direction: BarrierDirection::Right,
            },
            Orientation::Horizontal => Self {
                x1: monitor.x,
                y1: monitor.y,
                x2: monitor.right(),
                y2: monitor.y,
                direction: BarrierDirection::Down,
            },
        }
    }
}

/// One collision notification from the display server.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawHit {
    pub x: f32,
    pub y: f32,
    /// Instantaneous speed in pixels per second.
    pub velocity: f32,
    /// Identifies one continuous push against the barrier.
    pub event_id: u32,
}

impl RawHit {
    #[must_use]
    pub const fn new(x: f32, y: f32, velocity: f32, event_id: u32) -> Self {
        Self {
            x,
            y,
            velocity,
            event_id,
        }
    }

    /// Build a hit from a motion delta reported over `dtime_ms`.
    ///
    /// A zero time delta reports the minimal velocity of 1 instead of
    /// dividing by zero.
    #[must_use]
    pub fn from_motion(x: f32, y: f32, dx: f32, dy: f32, dtime_ms: u32, event_id: u32) -> Self {
        let velocity = if dtime_ms == 0 {
            1.0
        } else {
            (dx * dx + dy * dy).sqrt() / dtime_ms as f32 * 1000.0
        };
        Self::new(x, y, velocity, event_id)
    }
}

/// Coalesced barrier hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarrierEvent {
    pub x: f32,
    pub y: f32,
    pub velocity: f32,
    pub event_id: u32,
}

/// Smoothing and release state for one edge trip-wire.
#[derive(Debug, Clone)]
pub struct PointerBarrier {
    monitor: usize,
    orientation: Orientation,
    geometry: Option<BarrierGeometry>,
    smoothing: Duration,
    max_velocity_multiplier: f32,
    released: bool,
    release_once: bool,
    released_event_id: Option<u32>,
    // Window accumulation.
    velocity_sum: f32,
    hit_count: u32,
    last_x: f32,
    last_y: f32,
    window_deadline: Option<Instant>,
    // Push tracking.
    current_event_id: Option<u32>,
    pending_first: bool,
    last_emitted_first: bool,
    events_emitted: u64,
}

impl PointerBarrier {
    /// Create an inactive barrier.
    #[must_use]
    pub fn new(monitor: usize, orientation: Orientation) -> Self {
        Self {
            monitor,
            orientation,
            geometry: None,
            smoothing: Duration::from_millis(75),
            max_velocity_multiplier: 1.0,
            released: false,
            release_once: false,
            released_event_id: None,
            velocity_sum: 0.0,
            hit_count: 0,
            last_x: 0.0,
            last_y: 0.0,
            window_deadline: None,
            current_event_id: None,
            pending_first: false,
            last_emitted_first: false,
            events_emitted: 0,
        }
    }

    /// Set the smoothing window.
    #[must_use]
    pub fn with_smoothing(mut self, smoothing: Duration) -> Self {
        self.smoothing = smoothing;
        self
    }

    /// Set the velocity cap multiplier.
    #[must_use]
    pub fn with_max_velocity_multiplier(mut self, multiplier: f32) -> Self {
        self.max_velocity_multiplier = multiplier.max(0.0);
        self
    }

    pub fn set_smoothing(&mut self, smoothing: Duration) {
        self.smoothing = smoothing;
    }

    pub fn set_max_velocity_multiplier(&mut self, multiplier: f32) {
        self.max_velocity_multiplier = multiplier.max(0.0);
    }

    #[inline]
    pub fn monitor(&self) -> usize {
        self.monitor
    }

    #[inline]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    #[inline]
    pub fn geometry(&self) -> Option<BarrierGeometry> {
        self.geometry
    }

    /// True once constructed and until destroyed.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.geometry.is_some()
    }

    /// True while the pointer is allowed through.
    #[inline]
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// True if the current release only covers the releasing push.
    #[inline]
    pub fn release_once(&self) -> bool {
        self.release_once
    }

    /// Whether the most recently emitted event opened its push.
    #[inline]
    pub fn is_first_event(&self) -> bool {
        self.last_emitted_first
    }

    #[inline]
    pub fn events_emitted(&self) -> u64 {
        self.events_emitted
    }

    /// Activate with `geometry`, clearing any release and pending window.
    pub fn construct(&mut self, geometry: BarrierGeometry) {
        self.geometry = Some(geometry);
        self.rearm();
        self.discard_window();
        self.current_event_id = None;
    }

    /// Deactivate; pending hits are dropped.
    pub fn destroy(&mut self) {
        self.geometry = None;
        self.released = false;
        self.release_once = false;
        self.released_event_id = None;
        self.discard_window();
    }

    /// Let the push `event_id` through.
    pub fn release(&mut self, event_id: u32, once: bool) {
        self.released = true;
        self.release_once = once;
        self.released_event_id = Some(event_id);
    }

    /// Close the barrier again after a release.
    pub fn rearm(&mut self) {
        self.released = false;
        self.release_once = false;
        self.released_event_id = None;
    }

    /// Event id of the push the barrier was released for.
    #[inline]
    pub fn released_event_id(&self) -> Option<u32> {
        self.released_event_id
    }

    /// Record a raw hit. Returns `false` if the barrier is inactive.
    ///
    /// The first hit of an empty window opens it; its deadline is reported by
    /// [`flush_deadline`](Self::flush_deadline).
    pub fn handle_hit(&mut self, hit: RawHit, now: Instant) -> bool {
        if !self.is_active() {
            return false;
        }
        if self.current_event_id != Some(hit.event_id) {
            self.current_event_id = Some(hit.event_id);
            self.pending_first = true;
        }
        self.velocity_sum += hit.velocity.max(0.0);
        self.hit_count += 1;
        self.last_x = hit.x;
        self.last_y = hit.y;
        if self.window_deadline.is_none() {
            self.window_deadline = Some(now + self.smoothing);
        }
        true
    }

    /// When the open smoothing window closes, if one is open.
    #[inline]
    pub fn flush_deadline(&self) -> Option<Instant> {
        self.window_deadline
    }

    /// Flush if the smoothing window has closed by `now`.
    pub fn poll(&mut self, now: Instant) -> Option<BarrierEvent> {
        match self.window_deadline {
            Some(deadline) if deadline <= now => self.flush(),
            _ => None,
        }
    }

    /// Emit the coalesced event for the open window immediately.
    pub fn flush(&mut self) -> Option<BarrierEvent> {
        self.window_deadline = None;
        if self.hit_count == 0 {
            return None;
        }
        let cap = VELOCITY_CAP * self.max_velocity_multiplier;
        let average = self.velocity_sum / self.hit_count as f32;
        let event = BarrierEvent {
            x: self.last_x,
            y: self.last_y,
            velocity: average.min(cap),
            event_id: self.current_event_id.unwrap_or_default(),
        };
        self.last_emitted_first = self.pending_first;
        self.pending_first = false;
        self.velocity_sum = 0.0;
        self.hit_count = 0;
        self.events_emitted += 1;
        tracing::trace!(
            target: "dock.edge",
            monitor = self.monitor,
            event_id = event.event_id,
            velocity = event.velocity,
            first = self.last_emitted_first,
            "barrier event coalesced"
        );
        Some(event)
    }

    fn discard_window(&mut self) {
        self.velocity_sum = 0.0;
        self.hit_count = 0;
        self.window_deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dock_core::Rect;

    const MS_10: Duration = Duration::from_millis(10);
    const MS_75: Duration = Duration::from_millis(75);

    fn armed() -> PointerBarrier {
        let mut b = PointerBarrier::new(0, Orientation::Vertical);
        b.construct(BarrierGeometry::for_monitor(
            Rect::new(0.0, 0.0, 1920.0, 1080.0),
            Orientation::Vertical,
        ));
        b
    }

    #[test]
    fn inactive_barrier_drops_hits() {
        let mut b = PointerBarrier::new(0, Orientation::Vertical);
        assert!(!b.handle_hit(RawHit::new(0.0, 10.0, 100.0, 1), Instant::now()));
        assert_eq!(b.flush(), None);
    }

    #[test]
    fn window_coalesces_to_average() {
        let mut b = armed();
        let t0 = Instant::now();
        for (i, v) in [100.0, 200.0, 300.0].into_iter().enumerate() {
            b.handle_hit(RawHit::new(0.0, 10.0 + i as f32, v, 7), t0 + MS_10 * i as u32);
        }
        assert_eq!(b.flush_deadline(), Some(t0 + MS_75));
        assert_eq!(b.poll(t0 + MS_10 * 3), None);
        let event = b.poll(t0 + MS_75).unwrap();
        assert_eq!(event.velocity, 200.0);
        assert_eq!(event.y, 12.0);
        assert_eq!(event.event_id, 7);
        assert!(b.is_first_event());
        assert_eq!(b.flush_deadline(), None);
    }

    #[test]
    fn velocity_is_capped_by_multiplier() {
        let mut b = armed().with_max_velocity_multiplier(1.5);
        let t0 = Instant::now();
        b.handle_hit(RawHit::new(0.0, 0.0, 5000.0, 1), t0);
        assert_eq!(b.flush().unwrap().velocity, 900.0);
    }

    #[test]
    fn first_event_flag_tracks_push() {
        let mut b = armed();
        let t0 = Instant::now();
        b.handle_hit(RawHit::new(0.0, 0.0, 10.0, 1), t0);
        b.flush();
        assert!(b.is_first_event());
        b.handle_hit(RawHit::new(0.0, 0.0, 10.0, 1), t0 + MS_75);
        b.flush();
        assert!(!b.is_first_event());
        b.handle_hit(RawHit::new(0.0, 0.0, 10.0, 2), t0 + MS_75 * 2);
        b.flush();
        assert!(b.is_first_event());
    }

    #[test]
    fn release_and_rearm() {
        let mut b = armed();
        b.release(3, true);
        assert!(b.is_released());
        assert!(b.release_once());
        assert_eq!(b.released_event_id(), Some(3));
        b.rearm();
        assert!(!b.is_released());
        assert_eq!(b.released_event_id(), None);
    }

    #[test]
    fn destroy_drops_pending_window() {
        let mut b = armed();
        b.handle_hit(RawHit::new(0.0, 0.0, 10.0, 1), Instant::now());
        b.destroy();
        assert!(!b.is_active());
        assert_eq!(b.flush(), None);
    }

    #[test]
    fn motion_velocity() {
        let hit = RawHit::from_motion(0.0, 0.0, 3.0, 4.0, 10, 1);
        assert_eq!(hit.velocity, 500.0);
        assert_eq!(RawHit::from_motion(0.0, 0.0, 3.0, 4.0, 0, 1).velocity, 1.0);
    }

    #[test]
    fn geometry_follows_edge() {
        let monitor = Rect::new(1920.0, 0.0, 1280.0, 1024.0);
        let v = BarrierGeometry::for_monitor(monitor, Orientation::Vertical);
        assert_eq!((v.x1, v.y1, v.x2, v.y2), (1920.0, 0.0, 1920.0, 1024.0));
        assert_eq!(v.direction, BarrierDirection::Right);
        let h = BarrierGeometry::for_monitor(monitor, Orientation::Horizontal);
        assert_eq!((h.x1, h.y1, h.x2, h.y2), (1920.0, 0.0, 3200.0, 0.0));
        assert_eq!(h.direction, BarrierDirection::Down);
    }
}
