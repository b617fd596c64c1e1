//! Error type for the render layer.

use thiserror::Error;

/// Errors raised by render stages.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The display state could not be restored after a sweep. The stage
    /// may be showing the wrong camera or shading mode.
    #[error("display state restoration failed: {0}")]
    StateCorruption(String),

    /// The viewport has a zero dimension.
    #[error("viewport is empty: {0}x{1}")]
    EmptyViewport(u32, u32),
}

/// Convenience alias for render results.
pub type Result<T> = std::result::Result<T, RenderError>;
