#![forbid(unsafe_code)]

//! Edge reveal coordinator.
//!
//! Owns one [`PointerBarrier`] per (monitor, orientation), routes coalesced
//! barrier events to the subscriber registered on that edge, and decides via
//! a shared [`DecayAccumulator`] when a push has overcome the edge.
//!
//! # State machine (per edge)
//!
//! ```text
//! Inactive ──subscribe──► Armed ──event──► Accumulating ──pressure──► Overcome
//!    ▲                      ▲                   │ decay to 0              │
//!    └──unsubscribe─────────┴───────────────────┘◄──────re-arm timer──────┘
//! ```
//!
//! # Subscriber verdicts
//!
//! | result           | effect |
//! |------------------|--------|
//! | `Handled`        | event counts as reveal pressure |
//! | `AlreadyHandled` | subscriber acted on its own; pressure resets |
//! | `NeedsRelease`   | release now, whatever the pressure |
//! | `Ignored`        | release for this push only, unless edges are sticky |
//!
//! # Invariants
//!
//! 1. The first event of a push never adds pressure.
//! 2. Release resets the accumulator to zero.
//! 3. Each edge has at most one barrier no matter how many subscribers
//!    registered; the most recent subscriber receives events.
//! 4. A released edge re-arms after `passed_disabled` (immediately for a
//!    one-push release), through the task table key `(Rearm, edge)`.

use std::time::Duration;

use dock_core::{EdgeConfig, Rect, TaskTable};
use web_time::Instant;

use crate::barrier::{BarrierEvent, BarrierGeometry, Orientation, PointerBarrier, RawHit};
use crate::decay::DecayAccumulator;

/// Handle identifying one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(pub u64);

/// Token returned by [`EdgeBarrierController::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription {
    pub id: SubscriberId,
    pub monitor: usize,
    pub orientation: Orientation,
}

/// Verdict a subscriber returns for a barrier event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarrierResult {
    Handled,
    AlreadyHandled,
    NeedsRelease,
    Ignored,
}

/// Receives barrier events for the edges it subscribed to.
pub trait EdgeBarrierSubscriber {
    fn handle_barrier_event(
        &mut self,
        subscriber: SubscriberId,
        barrier: &PointerBarrier,
        event: &BarrierEvent,
    ) -> BarrierResult;
}

impl<F> EdgeBarrierSubscriber for F
where
    F: FnMut(SubscriberId, &PointerBarrier, &BarrierEvent) -> BarrierResult,
{
    fn handle_barrier_event(
        &mut self,
        subscriber: SubscriberId,
        barrier: &PointerBarrier,
        event: &BarrierEvent,
    ) -> BarrierResult {
        self(subscriber, barrier, event)
    }
}

/// Host hook for real display-server barriers.
pub trait BarrierBackend {
    fn construct(&mut self, monitor: usize, orientation: Orientation, geometry: BarrierGeometry);
    fn destroy(&mut self, monitor: usize, orientation: Orientation);
    fn release(&mut self, monitor: usize, orientation: Orientation, event_id: u32);
}

/// Backend that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBackend;

impl BarrierBackend for NullBackend {
    fn construct(&mut self, _: usize, _: Orientation, _: BarrierGeometry) {}
    fn destroy(&mut self, _: usize, _: Orientation) {}
    fn release(&mut self, _: usize, _: Orientation, _: u32) {}
}

/// Per-edge reveal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeState {
    #[default]
    Inactive,
    Armed,
    Accumulating,
    Overcome,
}

/// Derived thresholds, recomputed whenever configuration changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeTuning {
    pub resistance: bool,
    pub overcome_pressure: f32,
    pub rate_of_decay: f32,
    pub max_velocity_multiplier: f32,
    pub smoothing: Duration,
    pub passed_disabled: Duration,
    pub sticky_edges: bool,
}

impl Default for EdgeTuning {
    fn default() -> Self {
        Self::from_config(&EdgeConfig::default())
    }
}

impl EdgeTuning {
    /// Apply the responsiveness multiplier to the raw edge settings.
    ///
    /// Higher responsiveness decays faster, needs less pressure and allows
    /// faster pushes to count in full.
    pub fn from_config(config: &EdgeConfig) -> Self {
        let responsiveness = config.responsiveness.max(0.01);
        let decay_mult = (responsiveness - 1.0) * 0.3 + 1.0;
        Self {
            resistance: config.resistance,
            overcome_pressure: config.overcome_pressure / ((responsiveness - 1.0) + 1.0),
            rate_of_decay: (config.decay_rate * decay_mult).max(0.0),
            max_velocity_multiplier: responsiveness,
            smoothing: config.smoothing(),
            passed_disabled: config.passed_disabled(),
            sticky_edges: config.sticky_edges,
        }
    }
}

/// Side effects the runtime must act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOutcome {
    /// Pressure overcame the edge; the launcher should reveal.
    Overcome {
        monitor: usize,
        orientation: Orientation,
        event_id: u32,
    },
    /// Released without a reveal (competing gesture or ignored push).
    Released {
        monitor: usize,
        orientation: Orientation,
        event_id: u32,
    },
    /// Barrier closed again.
    Rearmed {
        monitor: usize,
        orientation: Orientation,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum EdgeTask {
    Smoothing,
    Rearm,
}

type EdgeKey = (usize, Orientation);

#[derive(Debug, Clone)]
struct EdgeSlot {
    barrier: PointerBarrier,
    subscribers: Vec<SubscriberId>,
    state: EdgeState,
}

#[derive(Debug, Clone)]
struct MonitorEdges {
    geometry: Rect,
    slots: [EdgeSlot; 2],
}

impl MonitorEdges {
    fn new(monitor: usize, geometry: Rect, tuning: &EdgeTuning) -> Self {
        let slot = |orientation| EdgeSlot {
            barrier: PointerBarrier::new(monitor, orientation)
                .with_smoothing(tuning.smoothing)
                .with_max_velocity_multiplier(tuning.max_velocity_multiplier),
            subscribers: Vec::new(),
            state: EdgeState::Inactive,
        };
        Self {
            geometry,
            slots: [slot(Orientation::Vertical), slot(Orientation::Horizontal)],
        }
    }
}

/// Coordinates every edge barrier across all monitors.
pub struct EdgeBarrierController {
    tuning: EdgeTuning,
    monitors: Vec<MonitorEdges>,
    decay: DecayAccumulator,
    last_decay_tick: Option<Instant>,
    tasks: TaskTable<EdgeTask, EdgeKey>,
    backend: Box<dyn BarrierBackend>,
    next_subscriber: u64,
}

impl std::fmt::Debug for EdgeBarrierController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdgeBarrierController")
            .field("tuning", &self.tuning)
            .field("monitors", &self.monitors.len())
            .field("pressure", &self.decay.value())
            .field("pending_tasks", &self.tasks.len())
            .finish()
    }
}

impl EdgeBarrierController {
    #[must_use]
    pub fn new(tuning: EdgeTuning, backend: Box<dyn BarrierBackend>) -> Self {
        Self {
            decay: DecayAccumulator::new(tuning.rate_of_decay),
            tuning,
            monitors: Vec::new(),
            last_decay_tick: None,
            tasks: TaskTable::new(),
            backend,
            next_subscriber: 1,
        }
    }

    #[inline]
    pub fn tuning(&self) -> &EdgeTuning {
        &self.tuning
    }

    /// Replace the tuning; barriers pick up the new smoothing and cap.
    pub fn set_tuning(&mut self, tuning: EdgeTuning) {
        self.tuning = tuning;
        self.decay.set_rate_of_decay(tuning.rate_of_decay);
        for edges in &mut self.monitors {
            for slot in &mut edges.slots {
                slot.barrier.set_smoothing(tuning.smoothing);
                slot.barrier
                    .set_max_velocity_multiplier(tuning.max_velocity_multiplier);
            }
        }
    }

    #[inline]
    pub fn monitor_count(&self) -> usize {
        self.monitors.len()
    }

    /// Current accumulated pressure.
    #[inline]
    pub fn pressure(&self) -> f32 {
        self.decay.value()
    }

    pub fn state(&self, monitor: usize, orientation: Orientation) -> EdgeState {
        self.slot(monitor, orientation)
            .map_or(EdgeState::Inactive, |s| s.state)
    }

    pub fn barrier(&self, monitor: usize, orientation: Orientation) -> Option<&PointerBarrier> {
        self.slot(monitor, orientation).map(|s| &s.barrier)
    }

    /// Subscriber currently receiving events for the edge.
    pub fn subscriber(&self, monitor: usize, orientation: Orientation) -> Option<SubscriberId> {
        self.slot(monitor, orientation)
            .and_then(|s| s.subscribers.last().copied())
    }

    /// Number of live subscriptions on the edge.
    pub fn subscriber_count(&self, monitor: usize, orientation: Orientation) -> usize {
        self.slot(monitor, orientation)
            .map_or(0, |s| s.subscribers.len())
    }

    /// Replace the monitor layout.
    ///
    /// Every constructed barrier is destroyed first, geometry is recomputed,
    /// and edges that still have subscribers are constructed and armed again.
    /// Subscriptions on monitors that disappeared are dropped.
    pub fn set_monitors(&mut self, monitors: &[Rect]) {
        for (index, edges) in self.monitors.iter_mut().enumerate() {
            for slot in &mut edges.slots {
                if slot.barrier.is_active() {
                    slot.barrier.destroy();
                    self.backend.destroy(index, slot.barrier.orientation());
                }
                slot.state = EdgeState::Inactive;
            }
            if index >= monitors.len() {
                let dropped: usize = edges.slots.iter().map(|s| s.subscribers.len()).sum();
                if dropped > 0 {
                    tracing::debug!(
                        target: "dock.edge",
                        monitor = index,
                        dropped,
                        "monitor removed, subscriptions dropped"
                    );
                }
            }
        }
        self.tasks.clear();
        self.decay.reset();

        let previous = std::mem::take(&mut self.monitors);
        let mut previous = previous.into_iter();
        for (index, rect) in monitors.iter().enumerate() {
            let mut edges = MonitorEdges::new(index, *rect, &self.tuning);
            if let Some(old) = previous.next() {
                for (slot, old_slot) in edges.slots.iter_mut().zip(old.slots) {
                    slot.subscribers = old_slot.subscribers;
                }
            }
            for slot in &mut edges.slots {
                if !slot.subscribers.is_empty() {
                    construct_slot(slot, *rect, self.backend.as_mut());
                }
            }
            self.monitors.push(edges);
        }
        tracing::debug!(target: "dock.edge", monitors = monitors.len(), "monitor layout applied");
    }

    /// Register interest in an edge. Returns `None` for unknown monitors.
    ///
    /// The barrier is constructed on the first subscription only; a later
    /// subscriber replaces the earlier one as event receiver until it
    /// unsubscribes.
    pub fn subscribe(&mut self, monitor: usize, orientation: Orientation) -> Option<Subscription> {
        let id = SubscriberId(self.next_subscriber);
        let edges = self.monitors.get_mut(monitor)?;
        self.next_subscriber += 1;
        let geometry = edges.geometry;
        let slot = &mut edges.slots[orientation.index()];
        if let Some(previous) = slot.subscribers.last() {
            tracing::debug!(
                target: "dock.edge",
                monitor,
                ?orientation,
                previous = previous.0,
                replacement = id.0,
                "edge subscriber replaced"
            );
        }
        slot.subscribers.push(id);
        if slot.subscribers.len() == 1 {
            construct_slot(slot, geometry, self.backend.as_mut());
        }
        Some(Subscription {
            id,
            monitor,
            orientation,
        })
    }

    /// Drop a subscription. The barrier is destroyed with the last one.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let Some(edges) = self.monitors.get_mut(subscription.monitor) else {
            return false;
        };
        let slot = &mut edges.slots[subscription.orientation.index()];
        let Some(pos) = slot.subscribers.iter().position(|s| *s == subscription.id) else {
            return false;
        };
        slot.subscribers.remove(pos);
        if slot.subscribers.is_empty() {
            slot.barrier.destroy();
            slot.state = EdgeState::Inactive;
            self.backend
                .destroy(subscription.monitor, subscription.orientation);
            let key = (subscription.monitor, subscription.orientation);
            self.tasks.cancel(EdgeTask::Smoothing, key);
            self.tasks.cancel(EdgeTask::Rearm, key);
        }
        true
    }

    /// Feed a raw hit from the display server.
    pub fn handle_hit(
        &mut self,
        monitor: usize,
        orientation: Orientation,
        hit: RawHit,
        now: Instant,
    ) -> bool {
        let Some(slot) = self.slot_mut(monitor, orientation) else {
            return false;
        };
        if !slot.barrier.handle_hit(hit, now) {
            return false;
        }
        let deadline = slot.barrier.flush_deadline();
        if let Some(deadline) = deadline {
            self.tasks
                .schedule(EdgeTask::Smoothing, (monitor, orientation), deadline);
        }
        true
    }

    /// Earliest instant at which [`tick`](Self::tick) has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.tasks.next_deadline()
    }

    /// Advance decay, flush closed smoothing windows, and re-arm released
    /// barriers whose hold time elapsed.
    pub fn tick<H>(&mut self, now: Instant, handler: &mut H) -> Vec<EdgeOutcome>
    where
        H: EdgeBarrierSubscriber + ?Sized,
    {
        self.advance_decay(now);
        let mut outcomes = Vec::new();
        for (task, (monitor, orientation)) in self.tasks.take_due(now) {
            match task {
                EdgeTask::Smoothing => {
                    let event = self
                        .slot_mut(monitor, orientation)
                        .and_then(|slot| slot.barrier.flush());
                    if let Some(event) = event {
                        outcomes.extend(self.process_event(
                            monitor,
                            orientation,
                            event,
                            handler,
                            now,
                        ));
                    }
                }
                EdgeTask::Rearm => {
                    let Some(slot) = self.slot_mut(monitor, orientation) else {
                        continue;
                    };
                    if slot.barrier.is_active() {
                        slot.barrier.rearm();
                        slot.state = EdgeState::Armed;
                        tracing::debug!(target: "dock.edge", monitor, ?orientation, "barrier re-armed");
                        outcomes.push(EdgeOutcome::Rearmed {
                            monitor,
                            orientation,
                        });
                    }
                }
            }
        }
        outcomes
    }

    /// Run one coalesced event through the subscriber and pressure logic.
    pub fn process_event<H>(
        &mut self,
        monitor: usize,
        orientation: Orientation,
        event: BarrierEvent,
        handler: &mut H,
        now: Instant,
    ) -> Option<EdgeOutcome>
    where
        H: EdgeBarrierSubscriber + ?Sized,
    {
        let tuning = self.tuning;
        let slot = &mut self.monitors.get_mut(monitor)?.slots[orientation.index()];
        if !slot.barrier.is_active() {
            return None;
        }
        if slot.barrier.is_released() {
            self.backend.release(monitor, orientation, event.event_id);
            return None;
        }

        let result = match slot.subscribers.last() {
            Some(id) => handler.handle_barrier_event(*id, &slot.barrier, &event),
            None => BarrierResult::Ignored,
        };
        let first = slot.barrier.is_first_event();

        match result {
            BarrierResult::NeedsRelease => {
                Some(self.release(monitor, orientation, event.event_id, false, false, now))
            }
            BarrierResult::Ignored if !tuning.sticky_edges => {
                Some(self.release(monitor, orientation, event.event_id, true, false, now))
            }
            BarrierResult::Ignored | BarrierResult::AlreadyHandled => {
                self.decay.reset();
                slot_state(&mut self.monitors, monitor, orientation, EdgeState::Armed);
                None
            }
            BarrierResult::Handled => {
                if !tuning.resistance {
                    return Some(self.release(monitor, orientation, event.event_id, false, true, now));
                }
                slot_state(&mut self.monitors, monitor, orientation, EdgeState::Accumulating);
                if first {
                    tracing::trace!(target: "dock.edge", monitor, event_id = event.event_id, "first event of push skipped");
                    return None;
                }
                self.decay.add(event.velocity);
                tracing::trace!(
                    target: "dock.edge",
                    monitor,
                    velocity = event.velocity,
                    pressure = self.decay.value(),
                    "edge pressure"
                );
                if self.decay.value() > tuning.overcome_pressure {
                    Some(self.release(monitor, orientation, event.event_id, false, true, now))
                } else {
                    None
                }
            }
        }
    }

    fn release(
        &mut self,
        monitor: usize,
        orientation: Orientation,
        event_id: u32,
        once: bool,
        overcome: bool,
        now: Instant,
    ) -> EdgeOutcome {
        let hold = if once {
            Duration::ZERO
        } else {
            self.tuning.passed_disabled
        };
        if let Some(slot) = self.slot_mut(monitor, orientation) {
            slot.barrier.release(event_id, once);
            slot.state = EdgeState::Overcome;
        }
        self.backend.release(monitor, orientation, event_id);
        self.decay.reset();
        self.tasks
            .schedule_in(EdgeTask::Rearm, (monitor, orientation), now, hold);
        tracing::debug!(
            target: "dock.edge",
            monitor,
            ?orientation,
            event_id,
            once,
            overcome,
            "barrier released"
        );
        if overcome {
            EdgeOutcome::Overcome {
                monitor,
                orientation,
                event_id,
            }
        } else {
            EdgeOutcome::Released {
                monitor,
                orientation,
                event_id,
            }
        }
    }

    fn advance_decay(&mut self, now: Instant) {
        if let Some(last) = self.last_decay_tick {
            self.decay.tick(now.saturating_duration_since(last));
        }
        self.last_decay_tick = Some(now);
        if self.decay.is_empty() {
            for edges in &mut self.monitors {
                for slot in &mut edges.slots {
                    if slot.state == EdgeState::Accumulating {
                        slot.state = EdgeState::Armed;
                    }
                }
            }
        }
    }

    fn slot(&self, monitor: usize, orientation: Orientation) -> Option<&EdgeSlot> {
        self.monitors
            .get(monitor)
            .map(|m| &m.slots[orientation.index()])
    }

    fn slot_mut(&mut self, monitor: usize, orientation: Orientation) -> Option<&mut EdgeSlot> {
        self.monitors
            .get_mut(monitor)
            .map(|m| &mut m.slots[orientation.index()])
    }
}

fn construct_slot(slot: &mut EdgeSlot, monitor_rect: Rect, backend: &mut dyn BarrierBackend) {
    let orientation = slot.barrier.orientation();
    let geometry = BarrierGeometry::for_monitor(monitor_rect, orientation);
    slot.barrier.construct(geometry);
    slot.state = EdgeState::Armed;
    backend.construct(slot.barrier.monitor(), orientation, geometry);
}

fn slot_state(
    monitors: &mut [MonitorEdges],
    monitor: usize,
    orientation: Orientation,
    state: EdgeState,
) {
    if let Some(edges) = monitors.get_mut(monitor) {
        edges.slots[orientation.index()].state = state;
    }
}
