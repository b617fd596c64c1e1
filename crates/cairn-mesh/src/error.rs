//! Error types for mesh construction and queries.

use thiserror::Error;

/// Errors that can occur while building or querying surface geometry.
#[derive(Error, Debug)]
pub enum MeshError {
    /// Mesh has no cells.
    #[error("mesh is empty")]
    EmptyMesh,

    /// A cell references a vertex index past the end of the vertex array.
    #[error("cell {cell} references vertex {vertex} out of {count}")]
    VertexOutOfRange {
        /// Offending cell index.
        cell: u32,
        /// Offending vertex index.
        vertex: u32,
        /// Number of vertices in the mesh.
        count: usize,
    },

    /// An annotation referenced a cell id the mesh does not contain.
    #[error("cell id {0} not present in mesh ({1} cells)")]
    CellOutOfRange(u32, usize),

    /// A cell has fewer than three vertices.
    #[error("cell {0} is degenerate ({1} vertices)")]
    DegenerateCell(u32, usize),

    /// STL input could not be parsed.
    #[error("malformed STL: {0}")]
    MalformedStl(String),

    /// I/O failure while reading geometry.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for mesh operations.
pub type Result<T> = std::result::Result<T, MeshError>;
