//! Six-plane convex regions and enclosed-cell extraction.
//!
//! A frustum annotation is authored as six sample points with outward
//! normals. The engine needs the subset of the object's surface enclosed by
//! the region; only cell membership matters downstream, so extraction is
//! membership-only (no clipping, no re-sewing).

use cairn_math::{Point3, Vec3};

use crate::error::Result;
use crate::mesh::{CellId, SubMesh, SurfaceMesh};

/// One bounding plane of a frustum: a sample point and the outward normal.
#[derive(Debug, Clone, Copy)]
pub struct FrustumPlane {
    /// A point on the plane.
    pub point: Point3,
    /// Outward normal (pointing away from the enclosed region).
    pub normal: Vec3,
}

impl FrustumPlane {
    /// Create a plane from a sample point and outward normal.
    pub fn new(point: Point3, normal: Vec3) -> Self {
        Self { point, normal }
    }

    /// Signed distance of `p` from the plane; negative is inside.
    #[inline]
    pub fn signed_distance(&self, p: &Point3) -> f64 {
        (p - self.point).dot(&self.normal) / self.normal.norm()
    }
}

/// A convex viewing region bounded by exactly six planes.
#[derive(Debug, Clone)]
pub struct Frustum {
    planes: [FrustumPlane; 6],
}

impl Frustum {
    /// Create a frustum from its six bounding planes.
    pub fn new(planes: [FrustumPlane; 6]) -> Self {
        Self { planes }
    }

    /// The six bounding planes.
    pub fn planes(&self) -> &[FrustumPlane; 6] {
        &self.planes
    }

    /// Whether a point lies inside the region (on-plane counts as inside).
    pub fn contains(&self, p: &Point3) -> bool {
        const SLACK: f64 = 1e-9;
        self.planes.iter().all(|pl| pl.signed_distance(p) <= SLACK)
    }

    /// Extract the cells of `mesh` enclosed by this frustum.
    ///
    /// A cell is enclosed when every one of its vertices is inside all six
    /// planes. Deterministic (cells visited in id order); the result may be
    /// empty, in which case downstream visibility degrades to "not visible".
    pub fn extract_enclosed(&self, mesh: &SurfaceMesh) -> Result<SubMesh> {
        let mut enclosed: Vec<CellId> = Vec::new();
        for id in 0..mesh.num_cells() as CellId {
            let points = mesh.cell_points(id)?;
            if points.iter().all(|p| self.contains(p)) {
                enclosed.push(id);
            }
        }
        mesh.extract_cells(&enclosed)
    }

    /// An axis-aligned box region as a frustum, for tests and authoring.
    pub fn axis_aligned(min: Point3, max: Point3) -> Self {
        Self::new([
            FrustumPlane::new(Point3::new(min.x, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0)),
            FrustumPlane::new(Point3::new(max.x, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)),
            FrustumPlane::new(Point3::new(0.0, min.y, 0.0), Vec3::new(0.0, -1.0, 0.0)),
            FrustumPlane::new(Point3::new(0.0, max.y, 0.0), Vec3::new(0.0, 1.0, 0.0)),
            FrustumPlane::new(Point3::new(0.0, 0.0, min.z), Vec3::new(0.0, 0.0, -1.0)),
            FrustumPlane::new(Point3::new(0.0, 0.0, max.z), Vec3::new(0.0, 0.0, 1.0)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cube() -> SurfaceMesh {
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
        let cells = vec![
            vec![0, 3, 2, 1],
            vec![4, 5, 6, 7],
            vec![0, 1, 5, 4],
            vec![2, 3, 7, 6],
            vec![0, 4, 7, 3],
            vec![1, 2, 6, 5],
        ];
        SurfaceMesh::new(vertices, cells).unwrap()
    }

    #[test]
    fn test_contains() {
        let f = Frustum::axis_aligned(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        assert!(f.contains(&Point3::new(0.5, 0.5, 0.5)));
        assert!(f.contains(&Point3::new(0.0, 0.0, 0.0)));
        assert!(!f.contains(&Point3::new(1.5, 0.5, 0.5)));
    }

    #[test]
    fn test_extract_whole_mesh() {
        let mesh = unit_cube();
        let f = Frustum::axis_aligned(
            Point3::new(-1.0, -1.0, -1.0),
            Point3::new(2.0, 2.0, 2.0),
        );
        let sub = f.extract_enclosed(&mesh).unwrap();
        assert_eq!(sub.source_cells.len(), 6);
    }

    #[test]
    fn test_extract_partial() {
        let mesh = unit_cube();
        // Only the z=0 face lies entirely within z <= 0.5
        let f = Frustum::axis_aligned(
            Point3::new(-1.0, -1.0, -1.0),
            Point3::new(2.0, 2.0, 0.5),
        );
        let sub = f.extract_enclosed(&mesh).unwrap();
        assert_eq!(sub.source_cells, vec![0]);
    }

    #[test]
    fn test_extract_empty() {
        let mesh = unit_cube();
        let f = Frustum::axis_aligned(
            Point3::new(5.0, 5.0, 5.0),
            Point3::new(6.0, 6.0, 6.0),
        );
        let sub = f.extract_enclosed(&mesh).unwrap();
        assert!(sub.is_empty());
    }
}
