#![forbid(unsafe_code)]

//! Edge reveal: pointer barriers, pressure decay and the coordinator that
//! decides when a push has overcome a screen edge.
//!
//! # Data flow
//!
//! ```text
//! raw hit ──► PointerBarrier (smoothing window) ──► BarrierEvent
//!                                                      │
//!                     subscriber verdict ◄─────────────┤
//!                                                      ▼
//!                      DecayAccumulator ──► release / reset / re-arm
//! ```
//!
//! Nothing here talks to a display server. Hosts plug real barriers in
//! through [`BarrierBackend`]; tests use [`NullBackend`] or a recorder.

pub mod barrier;
pub mod coordinator;
pub mod decay;

pub use barrier::{
    BarrierDirection, BarrierEvent, BarrierGeometry, Orientation, PointerBarrier, RawHit,
    VELOCITY_CAP,
};
pub use coordinator::{
    BarrierBackend, BarrierResult, EdgeBarrierController, EdgeBarrierSubscriber, EdgeOutcome,
    EdgeState, EdgeTuning, NullBackend, SubscriberId, Subscription,
};
pub use decay::DecayAccumulator;
