#![forbid(unsafe_code)]

//! Policy-as-data configuration for the dock.
//!
//! Every tunable of the launcher (edge pressure, decay, responsiveness,
//! animation styles, hide mode, layout metrics, drag thresholds) lives in a
//! single [`DockConfig`] that can be loaded from TOML or JSON.
//!
//! # Loading
//!
//! ```toml
//! # dock.toml
//! hide_mode = "autohide"
//!
//! [edge]
//! overcome_pressure = 1800.0
//! responsiveness = 1.5
//!
//! [layout]
//! icon_size = 54.0
//! ```
//!
//! ```rust,ignore
//! let config = DockConfig::load_validated_toml_file("dock.toml")?;
//! let shared = SharedConfig::new(config);
//! ```
//!
//! # Observation
//!
//! The core never writes configuration. [`SharedConfig`] publishes snapshots
//! through `arc-swap`; components remember the [`SharedConfig::generation`]
//! they last applied and re-derive their tuning when it moves.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// Whether the launcher hides when not in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HideMode {
    #[default]
    Never,
    Autohide,
}

/// How the launcher leaves the screen when hiding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutohideAnimation {
    FadeOnly,
    SlideOnly,
    #[default]
    FadeAndSlide,
}

/// How an urgent icon draws attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgentAnimation {
    None,
    #[default]
    Wiggle,
    Pulse,
}

/// How the backlight behind running icons behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BacklightMode {
    AlwaysOn,
    #[default]
    NormalToggle,
    AlwaysOff,
    EdgeToggle,
}

impl BacklightMode {
    /// Backlight follows the running state.
    #[inline]
    pub const fn toggles(self) -> bool {
        matches!(self, Self::NormalToggle | Self::EdgeToggle)
    }
}

/// Feedback while an application is starting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaunchAnimation {
    None,
    Blink,
    #[default]
    Pulse,
}

// ---------------------------------------------------------------------------
// Top-level DockConfig
// ---------------------------------------------------------------------------

/// Top-level dock configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DockConfig {
    pub hide_mode: HideMode,
    pub edge: EdgeConfig,
    pub animation: AnimationConfig,
    pub layout: LayoutConfig,
    pub drag: DragConfig,
    pub model: ModelConfig,
}

/// Edge barrier pressure and decay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeConfig {
    /// When false every barrier hit releases immediately.
    pub resistance: bool,
    /// Accumulated velocity needed to push through the edge.
    pub overcome_pressure: f32,
    /// Pressure lost per second between pushes.
    pub decay_rate: f32,
    /// Scales decay, threshold and velocity cap together (1.0 = neutral).
    pub responsiveness: f32,
    /// How long a released barrier stays open before re-arming.
    pub passed_disabled_ms: u64,
    /// Raw hits inside this window coalesce into one barrier event.
    pub smoothing_ms: u64,
    /// Keep the barrier closed even when no subscriber wants the event.
    pub sticky_edges: bool,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            resistance: true,
            overcome_pressure: 2000.0,
            decay_rate: 1500.0,
            responsiveness: 2.0,
            passed_disabled_ms: 1000,
            smoothing_ms: 75,
            sticky_edges: false,
        }
    }
}

impl EdgeConfig {
    #[inline]
    pub fn passed_disabled(&self) -> Duration {
        Duration::from_millis(self.passed_disabled_ms)
    }

    #[inline]
    pub fn smoothing(&self) -> Duration {
        Duration::from_millis(self.smoothing_ms)
    }
}

/// Animation styles and autohide timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub autohide: AutohideAnimation,
    pub urgent: UrgentAnimation,
    pub backlight: BacklightMode,
    pub launch: LaunchAnimation,
    /// Delay between the pointer leaving a revealed launcher and hiding.
    pub hide_delay_ms: u64,
    /// Redraw cadence while animations run.
    pub frame_interval_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            autohide: AutohideAnimation::default(),
            urgent: UrgentAnimation::default(),
            backlight: BacklightMode::default(),
            launch: LaunchAnimation::default(),
            hide_delay_ms: 500,
            frame_interval_ms: 16,
        }
    }
}

impl AnimationConfig {
    #[inline]
    pub fn hide_delay(&self) -> Duration {
        Duration::from_millis(self.hide_delay_ms)
    }

    #[inline]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

/// Tile metrics and fold tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub icon_size: f32,
    pub spacing: f32,
    /// Launcher strip width.
    pub launcher_width: f32,
    /// Multiplier bounding how much one icon may pull the fold threshold up.
    pub fold_march_correction: f32,
    /// Size fraction of a fully folded icon.
    pub folded_constant: f32,
    /// Rotation of a fully folded icon, in radians.
    pub folded_angle: f32,
    /// Depth offset of a fully folded icon.
    pub folded_z_distance: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            icon_size: 48.0,
            spacing: 6.0,
            launcher_width: 64.0,
            fold_march_correction: 1.3,
            folded_constant: 0.25,
            folded_angle: 1.0,
            folded_z_distance: 10.0,
        }
    }
}

/// Drag start and reorder thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// Hold time before a pressed icon starts dragging on its own.
    pub start_delay_ms: u64,
    /// Pointer travel that decides between icon and surface drag.
    pub deadzone: f32,
    /// Travel from the last insertion point before reorders turn smart.
    pub reorder_threshold: f32,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            start_delay_ms: 250,
            deadzone: 15.0,
            reorder_threshold: 24.0,
        }
    }
}

impl DragConfig {
    #[inline]
    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }
}

/// Collection lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Grace period between marking an icon removed and erasing it.
    pub removal_grace_ms: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            removal_grace_ms: 1000,
        }
    }
}

impl ModelConfig {
    #[inline]
    pub fn removal_grace(&self) -> Duration {
        Duration::from_millis(self.removal_grace_ms)
    }
}

impl DockConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Load a TOML file and reject it if [`validate`](Self::validate) finds
    /// problems.
    pub fn load_validated_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)?.validated()
    }

    /// Load a JSON file and reject it if [`validate`](Self::validate) finds
    /// problems.
    pub fn load_validated_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json_file(path)?.validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !(self.edge.overcome_pressure > 0.0) {
            errors.push(format!(
                "edge.overcome_pressure must be > 0, got {}",
                self.edge.overcome_pressure
            ));
        }
        if !(self.edge.decay_rate >= 0.0) {
            errors.push(format!(
                "edge.decay_rate must be >= 0, got {}",
                self.edge.decay_rate
            ));
        }
        if !(self.edge.responsiveness > 0.0) {
            errors.push(format!(
                "edge.responsiveness must be > 0, got {}",
                self.edge.responsiveness
            ));
        }
        if self.edge.smoothing_ms == 0 {
            errors.push("edge.smoothing_ms must be > 0".into());
        }

        if self.animation.frame_interval_ms == 0 {
            errors.push("animation.frame_interval_ms must be > 0".into());
        }

        if !(self.layout.icon_size > 0.0) {
            errors.push(format!(
                "layout.icon_size must be > 0, got {}",
                self.layout.icon_size
            ));
        }
        if !(self.layout.spacing >= 0.0) {
            errors.push(format!(
                "layout.spacing must be >= 0, got {}",
                self.layout.spacing
            ));
        }
        if !(self.layout.fold_march_correction >= 0.0) {
            errors.push(format!(
                "layout.fold_march_correction must be >= 0, got {}",
                self.layout.fold_march_correction
            ));
        }
        if !(0.0..=1.0).contains(&self.layout.folded_constant) {
            errors.push(format!(
                "layout.folded_constant must be in [0, 1], got {}",
                self.layout.folded_constant
            ));
        }

        if !(self.drag.deadzone >= 0.0) {
            errors.push(format!(
                "drag.deadzone must be >= 0, got {}",
                self.drag.deadzone
            ));
        }
        if !(self.drag.reorder_threshold >= 0.0) {
            errors.push(format!(
                "drag.reorder_threshold must be >= 0, got {}",
                self.drag.reorder_threshold
            ));
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// Shared snapshot
// ---------------------------------------------------------------------------

/// Observe-only handle to the live configuration.
///
/// Cloning shares the same underlying snapshot and generation counter.
#[derive(Debug, Clone)]
pub struct SharedConfig {
    current: Arc<ArcSwap<DockConfig>>,
    generation: Arc<AtomicU64>,
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self::new(DockConfig::default())
    }
}

impl SharedConfig {
    #[must_use]
    pub fn new(config: DockConfig) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(config)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn load(&self) -> Arc<DockConfig> {
        self.current.load_full()
    }

    /// Publish a new snapshot and bump the generation.
    pub fn store(&self, config: DockConfig) {
        self.current.store(Arc::new(config));
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::debug!(target: "dock.runtime", generation, "configuration replaced");
    }

    /// Monotonic counter of published snapshots.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
