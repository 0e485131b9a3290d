#![forbid(unsafe_code)]

//! Contracts the host implements: window state and drawing.

use dock_core::WindowId;
use dock_layout::SampledFrame;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("unknown window {0}")]
    UnknownWindow(WindowId),
    #[error("window source unavailable: {0}")]
    WindowSource(String),
    #[error("render failed on monitor {monitor}: {reason}")]
    Render { monitor: usize, reason: String },
}

/// Read and act on application windows.
pub trait WindowSource {
    fn is_mapped(&self, window: WindowId) -> Result<bool, CollaboratorError>;

    fn visible_on_monitor(&self, window: WindowId, monitor: usize)
    -> Result<bool, CollaboratorError>;

    /// Raise and focus `windows`.
    fn focus(&mut self, windows: &[WindowId]) -> Result<(), CollaboratorError>;

    /// Show `windows` side by side so the user can pick one.
    fn request_spread(&mut self, windows: &[WindowId]) -> Result<(), CollaboratorError>;
}

/// Draws sampled frames.
pub trait Renderer {
    fn render(&mut self, monitor: usize, frame: &SampledFrame) -> Result<(), CollaboratorError>;
}

/// Window source with no windows.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullWindowSource;

impl WindowSource for NullWindowSource {
    fn is_mapped(&self, _: WindowId) -> Result<bool, CollaboratorError> {
        Ok(false)
    }

    fn visible_on_monitor(&self, _: WindowId, _: usize) -> Result<bool, CollaboratorError> {
        Ok(false)
    }

    fn focus(&mut self, _: &[WindowId]) -> Result<(), CollaboratorError> {
        Ok(())
    }

    fn request_spread(&mut self, _: &[WindowId]) -> Result<(), CollaboratorError> {
        Ok(())
    }
}

/// Renderer that discards frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _: usize, _: &SampledFrame) -> Result<(), CollaboratorError> {
        Ok(())
    }
}
