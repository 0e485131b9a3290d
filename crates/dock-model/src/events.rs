#![forbid(unsafe_code)]

//! Structural events queued by the collection.
//!
//! The collection never calls out. Callers drain the queue with
//! [`IconCollection::take_events`](crate::IconCollection::take_events) and
//! forward it wherever observers live.

use crate::icon::IconId;

/// A structural change to the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelEvent {
    IconAdded(IconId),
    IconRemoved(IconId),
    /// The full display order changed.
    OrderChanged,
    /// Keyboard selection moved to this index of the full order.
    SelectionChanged(usize),
    /// Icon became a favorite.
    PositionSaved(IconId),
    /// Icon stopped being a favorite.
    PositionForgot(IconId),
}

impl ModelEvent {
    /// Icon the event is about, if any.
    pub fn icon(&self) -> Option<IconId> {
        match self {
            Self::IconAdded(id)
            | Self::IconRemoved(id)
            | Self::PositionSaved(id)
            | Self::PositionForgot(id) => Some(*id),
            Self::OrderChanged | Self::SelectionChanged(_) => None,
        }
    }
}
