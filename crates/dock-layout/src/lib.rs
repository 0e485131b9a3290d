#![forbid(unsafe_code)]

//! Layout: where each icon is drawn, how it animates, and how drags reorder
//! the strip.
//!
//! # Frame pipeline
//!
//! ```text
//! IconCollection ──► LayoutSampler::sample ──► SampledFrame { args, .. }
//!        ▲                                          │
//!        └──── DragController (hit tests args) ◄────┘   one frame later
//! ```
//!
//! Everything takes `now` explicitly. Sampling at the same instant twice
//! yields the same arguments.

pub mod drag;
pub mod render_arg;
pub mod sampler;
pub mod timing;

pub use drag::{DragController, DragEvent, DragPhase, DragProxy, DragSettings};
pub use render_arg::{RenderArg, hit_test};
pub use sampler::{
    DragFrame, FrameParams, LauncherTimes, LayoutSampler, SampledFrame, SamplerConfig,
    icon_visible_progress, shortcut_assignments,
};
