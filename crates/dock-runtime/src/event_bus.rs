#![forbid(unsafe_code)]

//! Launcher event bus.
//!
//! # Design
//!
//! [`EventBus`] keeps subscribers in shared, reference-counted storage
//! (`Rc<RefCell<..>>`). A subscriber is either interested in every event or in
//! the events of one icon. The bus holds callbacks weakly; the strong
//! reference lives in the returned [`BusSubscription`] guard, so dropping the
//! guard unsubscribes.
//!
//! # Performance
//!
//! | Operation     | Complexity                  |
//! |---------------|-----------------------------|
//! | `publish()`   | O(S) where S = subscribers  |
//! | `subscribe()` | O(1) amortized              |
//!
//! # Failure Modes
//!
//! - **Re-entrant publish**: callbacks are collected before they run, so a
//!   callback may publish or subscribe; new subscribers see the next event.
//! - **Subscriber leak**: dead weak references are pruned lazily during
//!   `publish()`.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use dock_edge::EdgeOutcome;
use dock_model::{IconId, ModelEvent};

/// Everything observable about the dock.
#[derive(Debug, Clone, PartialEq)]
pub enum DockEvent {
    IconAdded(IconId),
    IconRemoved(IconId),
    OrderChanged,
    SelectionChanged(usize),
    PositionSaved(IconId),
    PositionForgot(IconId),
    Barrier(EdgeOutcome),
    MouseEnter { icon: IconId, monitor: usize },
    MouseLeave { icon: IconId, monitor: usize },
    MouseDown { icon: IconId, monitor: usize },
    MouseUp { icon: IconId, monitor: usize },
    MouseClick { icon: IconId, monitor: usize },
    /// The icon was dropped on the trash.
    RemoveRequest(IconId),
    /// The icon was activated without running windows.
    LaunchRequest(IconId),
    Revealed { monitor: usize },
    Hidden { monitor: usize },
}

impl DockEvent {
    /// The icon this event concerns, if any.
    pub fn icon(&self) -> Option<IconId> {
        match self {
            Self::IconAdded(id)
            | Self::IconRemoved(id)
            | Self::PositionSaved(id)
            | Self::PositionForgot(id)
            | Self::RemoveRequest(id)
            | Self::LaunchRequest(id) => Some(*id),
            Self::MouseEnter { icon, .. }
            | Self::MouseLeave { icon, .. }
            | Self::MouseDown { icon, .. }
            | Self::MouseUp { icon, .. }
            | Self::MouseClick { icon, .. } => Some(*icon),
            Self::OrderChanged
            | Self::SelectionChanged(_)
            | Self::Barrier(_)
            | Self::Revealed { .. }
            | Self::Hidden { .. } => None,
        }
    }
}

impl From<ModelEvent> for DockEvent {
    fn from(event: ModelEvent) -> Self {
        match event {
            ModelEvent::IconAdded(id) => Self::IconAdded(id),
            ModelEvent::IconRemoved(id) => Self::IconRemoved(id),
            ModelEvent::OrderChanged => Self::OrderChanged,
            ModelEvent::SelectionChanged(index) => Self::SelectionChanged(index),
            ModelEvent::PositionSaved(id) => Self::PositionSaved(id),
            ModelEvent::PositionForgot(id) => Self::PositionForgot(id),
        }
    }
}

type CallbackRc = Rc<dyn Fn(&DockEvent)>;
type CallbackWeak = Weak<dyn Fn(&DockEvent)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Topic {
    All,
    Icon(IconId),
}

impl Topic {
    fn matches(self, event: &DockEvent) -> bool {
        match self {
            Self::All => true,
            Self::Icon(id) => event.icon() == Some(id),
        }
    }
}

struct Entry {
    topic: Topic,
    callback: CallbackWeak,
}

#[derive(Default)]
struct BusInner {
    entries: Vec<Entry>,
    published: u64,
}

/// Shared publish/subscribe hub.
///
/// Cloning an `EventBus` creates a new handle to the same subscribers.
///
/// # Invariants
///
/// 1. Subscribers are called in registration order.
/// 2. A dropped [`BusSubscription`] is never called again.
#[derive(Default)]
pub struct EventBus {
    inner: Rc<RefCell<BusInner>>,
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("EventBus")
            .field("subscriber_count", &inner.entries.len())
            .field("published", &inner.published)
            .finish()
    }
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Receive every event.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&DockEvent) + 'static) -> BusSubscription {
        self.register(Topic::All, callback)
    }

    /// Receive only events about `icon`.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe_icon(
        &self,
        icon: IconId,
        callback: impl Fn(&DockEvent) + 'static,
    ) -> BusSubscription {
        self.register(Topic::Icon(icon), callback)
    }

    fn register(&self, topic: Topic, callback: impl Fn(&DockEvent) + 'static) -> BusSubscription {
        let strong: CallbackRc = Rc::new(callback);
        let weak = Rc::downgrade(&strong);
        self.inner.borrow_mut().entries.push(Entry {
            topic,
            callback: weak,
        });
        BusSubscription { _guard: strong }
    }

    /// Deliver `event`. Returns how many subscribers received it.
    pub fn publish(&self, event: &DockEvent) -> usize {
        let callbacks: Vec<CallbackRc> = {
            let mut inner = self.inner.borrow_mut();
            inner.published += 1;
            inner.entries.retain(|e| e.callback.strong_count() > 0);
            inner
                .entries
                .iter()
                .filter(|e| e.topic.matches(event))
                .filter_map(|e| e.callback.upgrade())
                .collect()
        };
        for callback in &callbacks {
            callback(event);
        }
        tracing::trace!(target: "dock.runtime", ?event, delivered = callbacks.len(), "event published");
        callbacks.len()
    }

    /// Live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .borrow()
            .entries
            .iter()
            .filter(|e| e.callback.strong_count() > 0)
            .count()
    }

    /// Events published since creation.
    pub fn published(&self) -> u64 {
        self.inner.borrow().published
    }
}

/// RAII guard: the callback stays registered while this lives.
pub struct BusSubscription {
    _guard: CallbackRc,
}

impl std::fmt::Debug for BusSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BusSubscription").finish_non_exhaustive()
    }
}
