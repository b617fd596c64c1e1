//! Software z-buffer implementation of [`RenderStage`].
//!
//! Rasterizes the model's fan triangles orthographically into a depth
//! buffer and a flat-shaded gray buffer. Good enough for report
//! screenshots and, more importantly, the exact source of truth for the
//! occlusion queries the sweep runs against those screenshots.

use cairn_math::{Point3, Tolerance};
use cairn_mesh::{Aabb3, SurfaceMesh};
use image::{Rgba, RgbaImage};

use crate::camera::Camera;
use crate::error::{RenderError, Result};
use crate::stage::{DisplaySnapshot, LightRig, RenderMode, RenderStage};
use crate::viewpoint::Viewpoint;

/// Background gray level of captured screenshots.
const BACKGROUND: u8 = 255;

/// Ambient floor so back-lit facets stay distinguishable from background.
const AMBIENT: f64 = 0.15;

/// Brightest lit shade. Kept below the background level so a face-on
/// surface never blends into it.
const LIT_MAX: f64 = 0.85;

/// A plain z-buffer renderer over a single surface mesh.
///
/// The depth and shade buffers are stored bottom-up, matching display
/// coordinates. [`SoftwareStage::capture_screenshot`] flips rows so the
/// returned image is top-down as image files expect.
pub struct SoftwareStage {
    triangles: Vec<[Point3; 3]>,
    bounds: Aabb3,
    viewport: (u32, u32),
    camera: Camera,
    render_mode: RenderMode,
    light: LightRig,
    depth: Vec<f64>,
    shade: Vec<f32>,
    depth_bias: f64,
}

impl SoftwareStage {
    /// Builds a stage over `mesh` with the given viewport and renders
    /// the front view.
    pub fn new(mesh: &SurfaceMesh, viewport: (u32, u32)) -> Result<Self> {
        if viewport.0 == 0 || viewport.1 == 0 {
            return Err(RenderError::EmptyViewport(viewport.0, viewport.1));
        }
        let bounds = mesh.bounds();
        let camera = Camera::fit_orthogonal(Viewpoint::Front, &bounds).unwrap_or(Camera {
            position: Point3::new(0.0, 0.0, 1.0),
            focal: Point3::origin(),
            view_up: cairn_math::Vec3::new(0.0, 1.0, 0.0),
            parallel_scale: 1.0,
            clip: (1e-3, 2.0),
        });
        let pixels = viewport.0 as usize * viewport.1 as usize;
        let mut stage = SoftwareStage {
            triangles: mesh.triangles().map(|(tri, _)| tri).collect(),
            depth_bias: bounds.diagonal() * Tolerance::default().depth,
            bounds,
            viewport,
            camera,
            render_mode: RenderMode::Surface,
            light: LightRig::default(),
            depth: vec![f64::INFINITY; pixels],
            shade: vec![1.0; pixels],
        };
        stage.render();
        Ok(stage)
    }

    /// Model bounds the orthogonal views are fitted to.
    pub fn bounds(&self) -> &Aabb3 {
        &self.bounds
    }

    fn render(&mut self) {
        self.depth.fill(f64::INFINITY);
        self.shade.fill(1.0);
        let frame = match self.camera.frame() {
            Some(f) => f,
            None => return,
        };
        let forward = frame.forward.into_inner();
        let (w, h) = self.viewport;
        for tri in &self.triangles {
            let projected: Option<Vec<_>> = tri
                .iter()
                .map(|p| self.camera.world_to_display(p, self.viewport))
                .collect();
            let pr = match projected {
                Some(p) => [p[0], p[1], p[2]],
                None => return,
            };
            let edge1 = tri[1] - tri[0];
            let edge2 = tri[2] - tri[0];
            let normal = edge1.cross(&edge2);
            let lambert = if normal.norm() > 0.0 {
                normal.normalize().dot(&forward).abs()
            } else {
                continue;
            };
            let lit = self
                .light
                .shade(AMBIENT + (LIT_MAX - AMBIENT) * lambert)
                .min(LIT_MAX);

            // Screen-space edge functions; sign of the doubled area picks
            // the inside half-plane for either winding.
            let (x0, y0, d0) = pr[0];
            let (x1, y1, d1) = pr[1];
            let (x2, y2, d2) = pr[2];
            let area = (x1 - x0) * (y2 - y0) - (y1 - y0) * (x2 - x0);
            if area.abs() < 1e-12 {
                continue;
            }
            let min_x = x0.min(x1).min(x2).floor().max(0.0) as u32;
            let max_x = (x0.max(x1).max(x2).ceil() as i64).clamp(0, w as i64) as u32;
            let min_y = y0.min(y1).min(y2).floor().max(0.0) as u32;
            let max_y = (y0.max(y1).max(y2).ceil() as i64).clamp(0, h as i64) as u32;
            for py in min_y..max_y {
                for px in min_x..max_x {
                    let cx = px as f64 + 0.5;
                    let cy = py as f64 + 0.5;
                    let w0 = ((x1 - x0) * (cy - y0) - (y1 - y0) * (cx - x0)) / area;
                    let w1 = ((x2 - x1) * (cy - y1) - (y2 - y1) * (cx - x1)) / area;
                    let w2 = 1.0 - w0 - w1;
                    if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                        continue;
                    }
                    let d = w1 * d0 + w2 * d1 + w0 * d2;
                    if d <= 0.0 {
                        continue;
                    }
                    let idx = py as usize * w as usize + px as usize;
                    if d < self.depth[idx] {
                        self.depth[idx] = d;
                        self.shade[idx] = lit as f32;
                    }
                }
            }
        }
    }

    /// Smallest buffered depth in the 3x3 neighborhood of a display
    /// position. Pixels off the viewport are skipped.
    fn neighborhood_min_depth(&self, x: f64, y: f64) -> f64 {
        let (w, h) = (self.viewport.0 as i64, self.viewport.1 as i64);
        let px = x.floor() as i64;
        let py = y.floor() as i64;
        let mut best = f64::INFINITY;
        for dy in -1..=1 {
            for dx in -1..=1 {
                let (sx, sy) = (px + dx, py + dy);
                if sx < 0 || sx >= w || sy < 0 || sy >= h {
                    continue;
                }
                let d = self.depth[sy as usize * w as usize + sx as usize];
                if d < best {
                    best = d;
                }
            }
        }
        best
    }
}

impl LightRig {
    /// Applies brightness and contrast to a raw shaded value, clamped
    /// to `[0, 1]`.
    pub fn shade(&self, value: f64) -> f64 {
        (((value - 0.5) * self.contrast + 0.5) * self.brightness).clamp(0.0, 1.0)
    }
}

impl RenderStage for SoftwareStage {
    fn set_orthogonal_view(&mut self, viewpoint: Viewpoint) {
        if let Some(camera) = Camera::fit_orthogonal(viewpoint, &self.bounds) {
            self.camera = camera;
            self.render();
        }
    }

    fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
        self.render();
    }

    fn camera(&self) -> &Camera {
        &self.camera
    }

    fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    fn capture_screenshot(&mut self) -> Result<RgbaImage> {
        let (w, h) = self.viewport;
        let mut img = RgbaImage::new(w, h);
        for row in 0..h {
            let buf_row = (h - 1 - row) as usize;
            for col in 0..w {
                let idx = buf_row * w as usize + col as usize;
                let g = if self.depth[idx].is_finite() {
                    (self.shade[idx] * 255.0).round() as u8
                } else {
                    BACKGROUND
                };
                img.put_pixel(col, row, Rgba([g, g, g, 255]));
            }
        }
        Ok(img)
    }

    fn world_to_display(&self, point: &Point3) -> Option<(f64, f64, f64)> {
        self.camera.world_to_display(point, self.viewport)
    }

    fn select_visible(&self, points: &[Point3]) -> Vec<bool> {
        let (w, h) = (self.viewport.0 as f64, self.viewport.1 as f64);
        points
            .iter()
            .map(|p| {
                let (x, y, d) = match self.world_to_display(p) {
                    Some(v) => v,
                    None => return false,
                };
                if x < 0.0 || x >= w || y < 0.0 || y >= h || d <= 0.0 {
                    return false;
                }
                // Compare against the closest buffered depth nearby so
                // silhouette-adjacent points read as occluded rather
                // than leaking through the edge of the model.
                d <= self.neighborhood_min_depth(x, y) + self.depth_bias
            })
            .collect()
    }

    fn prepare_for_report(&mut self) {
        if self.render_mode != RenderMode::Surface {
            self.render_mode = RenderMode::Surface;
            self.render();
        }
    }

    fn snapshot(&self) -> DisplaySnapshot {
        DisplaySnapshot {
            camera: self.camera.clone(),
            render_mode: self.render_mode,
            texture_on: None,
            interpolation_on: None,
            light: self.light.clone(),
        }
    }

    fn restore(&mut self, snapshot: &DisplaySnapshot) -> Result<()> {
        let cam = &snapshot.camera;
        let finite = cam.position.iter().all(|c| c.is_finite())
            && cam.focal.iter().all(|c| c.is_finite())
            && cam.view_up.iter().all(|c| c.is_finite())
            && cam.parallel_scale.is_finite();
        if !finite || cam.parallel_scale <= 0.0 {
            return Err(RenderError::StateCorruption(format!(
                "snapshot camera is not restorable (parallel scale {})",
                cam.parallel_scale
            )));
        }
        self.render_mode = snapshot.render_mode;
        self.light = snapshot.light.clone();
        self.camera = snapshot.camera.clone();
        self.render();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_mesh::SurfaceMesh;

    fn unit_cube() -> SurfaceMesh {
        let v = vec![
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
        SurfaceMesh::new(v, cells).unwrap()
    }

    fn stage() -> SoftwareStage {
        SoftwareStage::new(&unit_cube(), (200, 200)).unwrap()
    }

    #[test]
    fn rejects_empty_viewport() {
        assert!(matches!(
            SoftwareStage::new(&unit_cube(), (0, 100)),
            Err(RenderError::EmptyViewport(0, 100))
        ));
    }

    #[test]
    fn front_face_center_is_visible_from_front() {
        let mut s = stage();
        s.set_orthogonal_view(Viewpoint::Front);
        let vis = s.select_visible(&[Point3::new(0.5, 0.5, 1.0)]);
        assert_eq!(vis, vec![true]);
    }

    #[test]
    fn back_face_center_is_hidden_from_front() {
        let mut s = stage();
        s.set_orthogonal_view(Viewpoint::Front);
        let vis = s.select_visible(&[Point3::new(0.5, 0.5, 0.0)]);
        assert_eq!(vis, vec![false]);
    }

    #[test]
    fn point_outside_viewport_is_not_visible() {
        let mut s = stage();
        s.set_orthogonal_view(Viewpoint::Front);
        // Far off to the side of the fitted view.
        let vis = s.select_visible(&[Point3::new(100.0, 0.5, 1.0)]);
        assert_eq!(vis, vec![false]);
    }

    #[test]
    fn screenshot_has_model_pixels_and_background() {
        let mut s = stage();
        s.set_orthogonal_view(Viewpoint::Front);
        let img = s.capture_screenshot().unwrap();
        let center = img.get_pixel(100, 100);
        let corner = img.get_pixel(0, 0);
        assert!(center[0] < BACKGROUND);
        assert_eq!(corner[0], BACKGROUND);
    }

    #[test]
    fn boosted_brightness_keeps_model_distinct_from_background() {
        let mut s = stage();
        let mut snap = s.snapshot();
        snap.light.brightness = 2.0;
        s.restore(&snap).unwrap();
        s.set_orthogonal_view(Viewpoint::Front);
        let img = s.capture_screenshot().unwrap();
        assert!(img.get_pixel(100, 100)[0] < BACKGROUND);
    }

    #[test]
    fn restore_round_trips_display_state() {
        let mut s = stage();
        let before = s.snapshot();
        s.set_orthogonal_view(Viewpoint::Top);
        assert_ne!(s.snapshot().camera, before.camera);
        s.restore(&before).unwrap();
        assert_eq!(s.snapshot(), before);
    }

    #[test]
    fn restore_rejects_corrupt_snapshot() {
        let mut s = stage();
        let mut snap = s.snapshot();
        snap.camera.parallel_scale = f64::NAN;
        assert!(matches!(
            s.restore(&snap),
            Err(RenderError::StateCorruption(_))
        ));
    }
}
