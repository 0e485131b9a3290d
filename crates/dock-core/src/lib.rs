#![forbid(unsafe_code)]

//! Core: quirk tables, scheduled tasks, geometry and configuration.
//!
//! # Role in the dock
//! `dock-core` is the leaf layer. It owns the per-monitor quirk storage every
//! icon carries, the scheduled-task table that replaces ad-hoc timers, the
//! small float geometry used by layout and hit testing, and the
//! policy-as-data [`DockConfig`](config::DockConfig).
//!
//! # How it fits in the system
//! `dock-edge` and `dock-model` build on these primitives; `dock-layout`
//! samples quirk timestamps into render arguments; `dock-runtime` owns the
//! shared configuration and pumps every task table from its tick.

pub mod config;
pub mod geometry;
pub mod logging;
pub mod quirk;
pub mod timer;

pub use config::{
    AnimationConfig, AutohideAnimation, BacklightMode, ConfigError, DockConfig, DragConfig,
    EdgeConfig, HideMode, LaunchAnimation, LayoutConfig, ModelConfig, SharedConfig,
    UrgentAnimation,
};
pub use geometry::{Point, Point3, Rect};
pub use quirk::{Quirk, QuirkSet, QuirkTable};
pub use timer::TaskTable;

/// Opaque window handle passed through to the window-state source.
pub type WindowId = u64;

// Re-export tracing macros at crate root for ergonomic use.
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
