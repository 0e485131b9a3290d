#![forbid(unsafe_code)]

//! Logging facade.
//!
//! Every dock crate logs through `tracing`. Targets follow the crate layout:
//!
//! | target          | emitted by |
//! |-----------------|------------|
//! | `dock.model`    | collection structure changes, favorites sync |
//! | `dock.edge`     | barrier coalescing, pressure, release, re-arm |
//! | `dock.layout`   | per-frame sampling (trace only) |
//! | `dock.drag`     | drag state machine transitions |
//! | `dock.runtime`  | launcher controller, collaborator failures |
//!
//! Installing a subscriber is left to the host (see the `dock` facade's
//! `subscriber` feature).

pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
