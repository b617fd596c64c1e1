//! Error type for report assembly.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while assembling a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The sweep over a 3D object failed.
    #[error(transparent)]
    Sweep(#[from] cairn_sweep::SweepError),

    /// The render stage could not be built for an object.
    #[error(transparent)]
    Render(#[from] cairn_render::RenderError),

    /// Marker placement or drawing failed.
    #[error(transparent)]
    Marker(#[from] cairn_marker::MarkerError),

    /// A linked illustration could not be decoded.
    #[error("linked image {path} could not be read")]
    BadLinkedImage {
        /// Path of the offending image.
        path: PathBuf,
        /// Decoder error.
        #[source]
        source: image::ImageError,
    },

    /// Encoding an output image failed.
    #[error("failed to encode image {path}")]
    Encode {
        /// Path being written.
        path: PathBuf,
        /// Encoder error.
        #[source]
        source: image::ImageError,
    },

    /// Writing report output failed.
    #[error("failed to write report output to {path}")]
    Write {
        /// Path being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Serializing the report manifest failed.
    #[error("failed to serialize report manifest")]
    Manifest(#[from] serde_json::Error),
}

/// Convenience alias for report results.
pub type Result<T> = std::result::Result<T, ReportError>;
