#![forbid(unsafe_code)]

//! Launcher runtime.
//!
//! Wires the model, edge and layout crates into a running dock:
//!
//! ```text
//!   host input ──► LauncherController ──► EventBus ──► subscribers
//!                    │   │        │
//!                    │   │        └─► Launcher (per monitor) ──► Renderer
//!                    │   └─► EdgeBarrierController
//!                    └─► IconCollection ◄──► FavoriteStore
//! ```
//!
//! The controller is single-threaded and clock-free: the host drives it
//! with input calls and [`LauncherController::tick`], sleeping until
//! [`LauncherController::next_deadline`] in between.

pub mod collaborators;
pub mod controller;
pub mod event_bus;
pub mod hide;
pub mod launcher;
pub mod redraw;

pub use collaborators::{CollaboratorError, NullRenderer, NullWindowSource, Renderer, WindowSource};
pub use controller::{LauncherController, TickReport};
pub use event_bus::{BusSubscription, DockEvent, EventBus};
pub use hide::{RevealChange, RevealReasons, RevealState};
pub use launcher::Launcher;
pub use redraw::RedrawScheduler;
