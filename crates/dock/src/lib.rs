#![forbid(unsafe_code)]

//! Dock launcher core public facade.
//!
//! Re-exports the types a host needs to embed the launcher and offers a
//! prelude for day-to-day use. The member crates stay available under short
//! names (`dock::model`, `dock::edge`, ...).

use std::path::Path;

pub mod logging;

// --- Core re-exports -------------------------------------------------------

pub use dock_core::{
    ConfigError, DockConfig, HideMode, Point, Point3, Quirk, Rect, SharedConfig, WindowId,
};

// --- Model re-exports ------------------------------------------------------

pub use dock_model::{
    FavoriteStore, FavoritesChange, Icon, IconCollection, IconId, IconKind, IconPosition,
    MemoryFavoriteStore,
};

// --- Edge re-exports -------------------------------------------------------

pub use dock_edge::{BarrierBackend, NullBackend, Orientation, RawHit};

// --- Layout re-exports -----------------------------------------------------

pub use dock_layout::{RenderArg, SampledFrame};

// --- Runtime re-exports ----------------------------------------------------

pub use dock_runtime::{
    BusSubscription, CollaboratorError, DockEvent, EventBus, LauncherController, Renderer,
    TickReport, WindowSource,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for dock hosts.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

/// Standard result type for dock APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Load and validate a configuration file; `.json` files are read as JSON,
/// everything else as TOML.
pub fn load_config(path: impl AsRef<Path>) -> Result<SharedConfig> {
    let path = path.as_ref();
    let config = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => DockConfig::load_validated_json_file(path)?,
        _ => DockConfig::load_validated_toml_file(path)?,
    };
    tracing::info!(target: "dock.runtime", path = %path.display(), "configuration loaded");
    Ok(SharedConfig::new(config))
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        DockConfig, DockEvent, Error, Icon, IconId, IconKind, LauncherController, Point, Rect,
        Result, SharedConfig,
    };

    pub use crate::{core, edge, layout, model, runtime};
}

pub use dock_core as core;
pub use dock_edge as edge;
pub use dock_layout as layout;
pub use dock_model as model;
pub use dock_runtime as runtime;
