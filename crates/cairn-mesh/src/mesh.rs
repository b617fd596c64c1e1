//! Indexed polygonal surface meshes with stable cell ids.

use cairn_math::Point3;

use crate::bbox::Aabb3;
use crate::error::{MeshError, Result};

/// Identifier of a surface cell, stable for the lifetime of a mesh.
pub type CellId = u32;

/// An indexed polygonal surface.
///
/// Cells are convex polygons (triangles in the common case) stored as
/// vertex index lists. Annotations reference cells by [`CellId`], which is
/// the cell's position in `cells`.
#[derive(Debug, Clone)]
pub struct SurfaceMesh {
    vertices: Vec<Point3>,
    cells: Vec<Vec<u32>>,
}

impl SurfaceMesh {
    /// Build a mesh, validating that every cell has at least three vertices
    /// and references only existing vertex indices.
    pub fn new(vertices: Vec<Point3>, cells: Vec<Vec<u32>>) -> Result<Self> {
        if cells.is_empty() {
            return Err(MeshError::EmptyMesh);
        }
        for (ci, cell) in cells.iter().enumerate() {
            if cell.len() < 3 {
                return Err(MeshError::DegenerateCell(ci as u32, cell.len()));
            }
            for &v in cell {
                if v as usize >= vertices.len() {
                    return Err(MeshError::VertexOutOfRange {
                        cell: ci as u32,
                        vertex: v,
                        count: vertices.len(),
                    });
                }
            }
        }
        Ok(Self { vertices, cells })
    }

    /// Build a triangle mesh from a flat triangle soup, merging no vertices.
    pub fn from_triangles(triangles: &[[Point3; 3]]) -> Result<Self> {
        let mut vertices = Vec::with_capacity(triangles.len() * 3);
        let mut cells = Vec::with_capacity(triangles.len());
        for tri in triangles {
            let base = vertices.len() as u32;
            vertices.extend_from_slice(tri);
            cells.push(vec![base, base + 1, base + 2]);
        }
        Self::new(vertices, cells)
    }

    /// Number of cells.
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// All vertex positions.
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    /// Vertex indices of a cell, or an error for an unknown id.
    ///
    /// Unknown ids signal a malformed annotation; the caller skips that
    /// annotation and continues.
    pub fn cell(&self, id: CellId) -> Result<&[u32]> {
        self.cells
            .get(id as usize)
            .map(|c| c.as_slice())
            .ok_or(MeshError::CellOutOfRange(id, self.cells.len()))
    }

    /// Vertex positions of a cell.
    pub fn cell_points(&self, id: CellId) -> Result<Vec<Point3>> {
        Ok(self
            .cell(id)?
            .iter()
            .map(|&v| self.vertices[v as usize])
            .collect())
    }

    /// Collect the vertex positions of a set of cells (with repetition
    /// across shared vertices, matching an unweighted per-corner average).
    pub fn collect_cell_vertices(&self, ids: &[CellId]) -> Result<Vec<Point3>> {
        let mut out = Vec::new();
        for &id in ids {
            out.extend(self.cell_points(id)?);
        }
        Ok(out)
    }

    /// Bounding box of all vertices.
    pub fn bounds(&self) -> Aabb3 {
        let mut bb = Aabb3::empty();
        for v in &self.vertices {
            bb.include_point(v);
        }
        bb
    }

    /// Iterate the mesh as triangles via fan decomposition of each cell.
    ///
    /// Yields `(a, b, c, cell_id)`. Deterministic: cells in id order, fans
    /// anchored at the first cell vertex.
    pub fn triangles(&self) -> impl Iterator<Item = ([Point3; 3], CellId)> + '_ {
        self.cells.iter().enumerate().flat_map(move |(ci, cell)| {
            let a = self.vertices[cell[0] as usize];
            cell[1..].windows(2).map(move |w| {
                (
                    [
                        a,
                        self.vertices[w[0] as usize],
                        self.vertices[w[1] as usize],
                    ],
                    ci as CellId,
                )
            })
        })
    }

    /// Extract the sub-mesh formed by a cell subset.
    ///
    /// Vertices are compacted; original cell ids are retained in the
    /// returned [`SubMesh`] for reporting. An empty subset yields an empty
    /// `SubMesh` (not an error) - downstream visibility degrades to
    /// "not visible".
    pub fn extract_cells(&self, ids: &[CellId]) -> Result<SubMesh> {
        let mut remap = vec![u32::MAX; self.vertices.len()];
        let mut vertices = Vec::new();
        let mut cells = Vec::with_capacity(ids.len());
        for &id in ids {
            let cell = self.cell(id)?;
            let mut mapped = Vec::with_capacity(cell.len());
            for &v in cell {
                if remap[v as usize] == u32::MAX {
                    remap[v as usize] = vertices.len() as u32;
                    vertices.push(self.vertices[v as usize]);
                }
                mapped.push(remap[v as usize]);
            }
            cells.push(mapped);
        }
        Ok(SubMesh {
            source_cells: ids.to_vec(),
            mesh: if cells.is_empty() {
                None
            } else {
                Some(SurfaceMesh { vertices, cells })
            },
        })
    }
}

/// A cell subset extracted from a parent [`SurfaceMesh`].
///
/// Membership-only: the subset is not re-sewn into a watertight surface,
/// only cell membership matters for the downstream centroid computation.
#[derive(Debug, Clone)]
pub struct SubMesh {
    /// Ids of the extracted cells in the parent mesh.
    pub source_cells: Vec<CellId>,
    /// Compacted geometry, `None` when the subset is empty.
    pub mesh: Option<SurfaceMesh>,
}

impl SubMesh {
    /// Whether the subset contains no cells.
    pub fn is_empty(&self) -> bool {
        self.mesh.is_none()
    }

    /// All vertex positions of the subset (empty slice when empty).
    pub fn vertices(&self) -> &[Point3] {
        self.mesh.as_ref().map(|m| m.vertices()).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn unit_cube() -> SurfaceMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        ];
        // Quads, one per face
        let cells = vec![
            vec![0, 3, 2, 1], // z=0
            vec![4, 5, 6, 7], // z=1
            vec![0, 1, 5, 4], // y=0
            vec![2, 3, 7, 6], // y=1
            vec![0, 4, 7, 3], // x=0
            vec![1, 2, 6, 5], // x=1
        ];
        SurfaceMesh::new(vertices, cells).unwrap()
    }

    #[test]
    fn test_empty_mesh_rejected() {
        assert!(matches!(
            SurfaceMesh::new(vec![], vec![]),
            Err(MeshError::EmptyMesh)
        ));
    }

    #[test]
    fn test_bad_vertex_index_rejected() {
        let r = SurfaceMesh::new(vec![Point3::origin()], vec![vec![0, 1, 2]]);
        assert!(matches!(r, Err(MeshError::VertexOutOfRange { .. })));
    }

    #[test]
    fn test_cell_out_of_range() {
        let mesh = unit_cube();
        assert!(matches!(
            mesh.cell(99),
            Err(MeshError::CellOutOfRange(99, 6))
        ));
    }

    #[test]
    fn test_triangle_fan_count() {
        let mesh = unit_cube();
        // 6 quads -> 12 triangles
        assert_eq!(mesh.triangles().count(), 12);
    }

    #[test]
    fn test_extract_cells_compacts_vertices() {
        let mesh = unit_cube();
        let sub = mesh.extract_cells(&[0]).unwrap();
        assert_eq!(sub.source_cells, vec![0]);
        let inner = sub.mesh.as_ref().unwrap();
        assert_eq!(inner.num_vertices(), 4);
        assert_eq!(inner.num_cells(), 1);
    }

    #[test]
    fn test_extract_empty_subset() {
        let mesh = unit_cube();
        let sub = mesh.extract_cells(&[]).unwrap();
        assert!(sub.is_empty());
        assert!(sub.vertices().is_empty());
    }

    #[test]
    fn test_bounds() {
        let mesh = unit_cube();
        let bb = mesh.bounds();
        assert!((bb.diagonal() - 3f64.sqrt()).abs() < 1e-12);
    }
}
