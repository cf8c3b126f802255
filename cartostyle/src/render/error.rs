//! Error types for the render bridge.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while rasterizing and encoding a tile.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Width or height is zero, or `width * height * 4` overflows
    #[error("invalid raster size {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The native library could not be loaded or lacks the entry point
    #[error("failed to load render engine from {path}: {message}")]
    EngineLoad { path: PathBuf, message: String },

    /// The engine call itself reported failure
    #[error("render engine '{engine}' failed: {message}")]
    EngineFailure { engine: String, message: String },

    /// The filled buffer could not be encoded
    #[error("failed to encode {format} tile: {message}")]
    Encoding { format: String, message: String },
}

impl RenderError {
    pub fn engine_failure(engine: impl Into<String>, message: impl Into<String>) -> Self {
        RenderError::EngineFailure {
            engine: engine.into(),
            message: message.into(),
        }
    }

    /// True for failures that happen after the engine returned successfully.
    pub fn is_encoding(&self) -> bool {
        matches!(self, RenderError::Encoding { .. })
    }
}
