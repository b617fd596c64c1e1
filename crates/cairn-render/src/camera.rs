//! Orthographic camera and world-to-display projection.

use cairn_math::{Frame, Point3, Vec3};
use cairn_mesh::Aabb3;

use crate::viewpoint::Viewpoint;

/// Extra parallel scale applied when fitting a model, so the silhouette
/// does not touch the image border.
const FIT_MARGIN: f64 = 1.05;

/// An orthographic camera.
///
/// Display coordinates are measured in pixels with the origin at the
/// bottom-left corner of the viewport and y growing upward. Depth is the
/// distance from the camera plane along the view direction, so smaller
/// values are closer to the camera.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space.
    pub position: Point3,
    /// Point the camera looks at.
    pub focal: Point3,
    /// World-space up direction.
    pub view_up: Vec3,
    /// Half the height of the viewing volume in world units.
    pub parallel_scale: f64,
    /// Near and far clip distances along the view direction.
    pub clip: (f64, f64),
}

impl Camera {
    /// Fits an orthographic camera to `bounds` for the given viewpoint.
    ///
    /// The camera is placed one bounding-box diagonal away from the
    /// center along the viewpoint's outward axis and scaled so the whole
    /// box fits with a small margin. Returns `None` for an invalid or
    /// degenerate bounding box.
    pub fn fit_orthogonal(viewpoint: Viewpoint, bounds: &Aabb3) -> Option<Camera> {
        if !bounds.is_valid() {
            return None;
        }
        let diagonal = bounds.diagonal();
        if diagonal <= 0.0 {
            return None;
        }
        let center = bounds.center();
        let position = center + viewpoint.outward_axis() * diagonal;
        Some(Camera {
            position,
            focal: center,
            view_up: viewpoint.up_vector(),
            parallel_scale: diagonal * 0.5 * FIT_MARGIN,
            clip: (diagonal * 0.5 * 1e-3, 2.0 * diagonal),
        })
    }

    /// The camera's orthonormal frame, or `None` if the view direction
    /// is degenerate or parallel to the up hint.
    pub fn frame(&self) -> Option<Frame> {
        Frame::looking(self.position, self.focal - self.position, self.view_up)
    }

    /// Projects a world point into display coordinates plus depth.
    ///
    /// Returns `(x, y, depth)` where x and y are pixels from the
    /// bottom-left corner (y grows upward) and depth is the distance in
    /// front of the camera. The projection is valid for points outside
    /// the viewport too; callers bound-check as needed.
    pub fn world_to_display(&self, point: &Point3, viewport: (u32, u32)) -> Option<(f64, f64, f64)> {
        let frame = self.frame()?;
        let (w, h) = (viewport.0 as f64, viewport.1 as f64);
        if w <= 0.0 || h <= 0.0 || self.parallel_scale <= 0.0 {
            return None;
        }
        let local = frame.to_local(point);
        let half_h = self.parallel_scale;
        let half_w = half_h * w / h;
        let x = (local.x / half_w * 0.5 + 0.5) * w;
        let y = (local.y / half_h * 0.5 + 0.5) * h;
        Some((x, y, local.z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_bounds() -> Aabb3 {
        Aabb3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn fit_places_camera_on_outward_axis() {
        let cam = Camera::fit_orthogonal(Viewpoint::Front, &unit_bounds()).unwrap();
        let diag = 3.0f64.sqrt();
        assert_relative_eq!(cam.position.x, 0.5);
        assert_relative_eq!(cam.position.y, 0.5);
        assert_relative_eq!(cam.position.z, 0.5 + diag);
        assert_relative_eq!(cam.focal.z, 0.5);
    }

    #[test]
    fn focal_point_projects_to_image_center() {
        for vp in Viewpoint::ALL {
            let cam = Camera::fit_orthogonal(vp, &unit_bounds()).unwrap();
            let (x, y, depth) = cam.world_to_display(&cam.focal, (400, 300)).unwrap();
            assert_relative_eq!(x, 200.0, epsilon = 1e-9);
            assert_relative_eq!(y, 150.0, epsilon = 1e-9);
            assert_relative_eq!(depth, 3.0f64.sqrt(), epsilon = 1e-9);
        }
    }

    #[test]
    fn display_y_grows_upward() {
        let cam = Camera::fit_orthogonal(Viewpoint::Front, &unit_bounds()).unwrap();
        let low = cam
            .world_to_display(&Point3::new(0.5, 0.0, 0.5), (400, 400))
            .unwrap();
        let high = cam
            .world_to_display(&Point3::new(0.5, 1.0, 0.5), (400, 400))
            .unwrap();
        assert!(high.1 > low.1);
    }

    #[test]
    fn fit_rejects_degenerate_bounds() {
        let flat = Aabb3::new(Point3::origin(), Point3::origin());
        assert!(Camera::fit_orthogonal(Viewpoint::Front, &flat).is_none());
        assert!(Camera::fit_orthogonal(Viewpoint::Front, &Aabb3::empty()).is_none());
    }
}
