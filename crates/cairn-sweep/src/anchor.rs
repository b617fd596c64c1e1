//! Anchor resolution: from an annotation payload to the 3D point whose
//! visibility is tested.

use cairn_anno::Annotation;
use cairn_math::{center_of_mass, Point3};
use cairn_mesh::{SurfaceLocator, SurfaceMesh};

use crate::error::Result;

/// A note's anchor, resolved against the model once per sweep.
#[derive(Debug)]
pub enum ResolvedAnchor {
    /// A fixed world point tested directly from every viewpoint.
    Fixed(Point3),

    /// A fixed point whose CT quad corners are also projected per view.
    CtQuad {
        /// Average of the four corners.
        center: Point3,
        /// The corners, for per-view outline projection.
        corners: [Point3; 4],
    },

    /// A frustum region. The tested point depends on the viewpoint, so
    /// the enclosed sub-mesh keeps its own locator for per-view ray
    /// probes.
    Region {
        /// Vertex centroid of the enclosed sub-mesh, snapped to the
        /// nearest point on the model surface.
        center: Point3,
        /// Locator over the enclosed sub-mesh only.
        locator: SurfaceLocator,
    },

    /// A frustum that encloses no cells. Hidden from every viewpoint.
    Empty,
}

/// Resolves annotations to anchors against one model mesh.
pub struct AnchorResolver<'a> {
    mesh: &'a SurfaceMesh,
    locator: &'a SurfaceLocator,
}

impl<'a> AnchorResolver<'a> {
    /// Creates a resolver over `mesh` and its prebuilt locator.
    pub fn new(mesh: &'a SurfaceMesh, locator: &'a SurfaceLocator) -> Self {
        AnchorResolver { mesh, locator }
    }

    /// Resolves one annotation to its anchor.
    ///
    /// Surface and frustum anchors are a vertex center of mass snapped
    /// to the nearest point on the surface, so the anchor lies on the
    /// model even for concave patches and hollow regions. CT quad
    /// anchors are the plain corner average, no snap; the quad floats on
    /// its slice plane. Fails when a surface annotation references a
    /// cell outside the mesh.
    pub fn resolve(&self, annotation: &Annotation) -> Result<ResolvedAnchor> {
        match annotation {
            Annotation::Point { .. } => {
                // validate() guarantees the accessor succeeds.
                let p = annotation
                    .point_position()
                    .unwrap_or_else(Point3::origin);
                Ok(ResolvedAnchor::Fixed(p))
            }
            Annotation::Surface { cells } => {
                let verts = self.mesh.collect_cell_vertices(cells)?;
                let com = match center_of_mass(&verts) {
                    Some(c) => c,
                    None => return Ok(ResolvedAnchor::Empty),
                };
                let anchor = match self.locator.closest_point(&com) {
                    Some(hit) => hit.point,
                    None => com,
                };
                Ok(ResolvedAnchor::Fixed(anchor))
            }
            Annotation::CtQuad { .. } => {
                let corners = annotation
                    .ct_corners()
                    .unwrap_or([Point3::origin(); 4]);
                let center = center_of_mass(&corners)
                    .unwrap_or_else(Point3::origin);
                Ok(ResolvedAnchor::CtQuad { center, corners })
            }
            Annotation::Frustum { .. } => {
                let frustum = match annotation.frustum() {
                    Some(f) => f,
                    None => return Ok(ResolvedAnchor::Empty),
                };
                let enclosed = frustum.extract_enclosed(self.mesh)?;
                let sub = match enclosed.mesh {
                    Some(m) => m,
                    None => return Ok(ResolvedAnchor::Empty),
                };
                let com = match center_of_mass(sub.vertices()) {
                    Some(c) => c,
                    None => return Ok(ResolvedAnchor::Empty),
                };
                let center = match self.locator.closest_point(&com) {
                    Some(hit) => hit.point,
                    None => com,
                };
                Ok(ResolvedAnchor::Region {
                    center,
                    locator: SurfaceLocator::build(&sub),
                })
            }
        }
    }
}
