//! Error type for marker placement and drawing.

use thiserror::Error;

/// Errors raised while placing or drawing markers.
#[derive(Debug, Error)]
pub enum MarkerError {
    /// The screenshot is too small to hold a marker at all.
    #[error("image {width}x{height} cannot hold a {size}px marker")]
    ImageTooSmall {
        /// Marker side length in pixels.
        size: u32,
        /// Image width.
        width: u32,
        /// Image height.
        height: u32,
    },

    /// The label font could not be parsed.
    #[error("marker label font is not a valid font file")]
    BadFont,
}

/// Convenience alias for marker results.
pub type Result<T> = std::result::Result<T, MarkerError>;
