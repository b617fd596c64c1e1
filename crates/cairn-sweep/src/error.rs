//! Error type for the sweep layer.

use thiserror::Error;

/// Errors that abort a sweep.
///
/// Malformed annotations are not among them; those are skipped and
/// reported in [`crate::SweepReport::skipped`].
#[derive(Debug, Error)]
pub enum SweepError {
    /// The render stage failed. `StateCorruption` from a failed restore
    /// surfaces here and takes precedence over any earlier failure.
    #[error(transparent)]
    Render(#[from] cairn_render::RenderError),

    /// The model mesh could not be queried.
    #[error(transparent)]
    Mesh(#[from] cairn_mesh::MeshError),
}

/// Convenience alias for sweep results.
pub type Result<T> = std::result::Result<T, SweepError>;
