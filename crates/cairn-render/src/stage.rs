//! The render-stage boundary and the display state it snapshots.

use cairn_math::Point3;
use image::RgbaImage;

use crate::camera::Camera;
use crate::error::Result;
use crate::viewpoint::Viewpoint;

/// Shading mode of the stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Filled surfaces.
    Surface,
    /// Edges only.
    Wireframe,
    /// Vertices only.
    Points,
}

/// Headlight configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LightRig {
    /// Overall intensity multiplier.
    pub brightness: f64,
    /// Contrast applied to the shaded value.
    pub contrast: f64,
}

impl Default for LightRig {
    fn default() -> Self {
        LightRig {
            brightness: 1.0,
            contrast: 1.0,
        }
    }
}

/// Everything a sweep must put back when it finishes.
///
/// Captured before the first viewpoint and restored unconditionally
/// afterwards, even when the sweep fails partway.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySnapshot {
    /// Camera at capture time.
    pub camera: Camera,
    /// Shading mode at capture time.
    pub render_mode: RenderMode,
    /// Whether texturing was on. `None` when the stage has no texture.
    pub texture_on: Option<bool>,
    /// Whether normal interpolation was on. `None` when not applicable.
    pub interpolation_on: Option<bool>,
    /// Light configuration at capture time.
    pub light: LightRig,
}

/// Abstraction over a renderer driven by the viewpoint sweep.
///
/// Implementations own a viewport of fixed size and a camera. The sweep
/// calls [`RenderStage::snapshot`] once, walks the six viewpoints with
/// [`RenderStage::set_orthogonal_view`], and finishes with
/// [`RenderStage::restore`].
pub trait RenderStage {
    /// Aims the camera at a canonical viewpoint, fitted to the model.
    fn set_orthogonal_view(&mut self, viewpoint: Viewpoint);

    /// Replaces the camera wholesale. Used by [`RenderStage::restore`]
    /// and by callers that need a custom view.
    fn set_camera(&mut self, camera: Camera);

    /// The current camera.
    fn camera(&self) -> &Camera;

    /// Viewport size in pixels as `(width, height)`.
    fn viewport(&self) -> (u32, u32);

    /// Renders the current view into an image. Row 0 of the returned
    /// image is the top of the picture.
    fn capture_screenshot(&mut self) -> Result<RgbaImage>;

    /// Projects a world point into display coordinates, pixels from the
    /// bottom-left corner. Returns `None` when the camera is degenerate.
    fn world_to_display(&self, point: &Point3) -> Option<(f64, f64, f64)>;

    /// Classifies each point as visible (not occluded by the model and
    /// inside the viewport) from the current view.
    fn select_visible(&self, points: &[Point3]) -> Vec<bool>;

    /// Puts the stage into the state report screenshots are taken in:
    /// filled surfaces, no overlays.
    fn prepare_for_report(&mut self);

    /// Captures the restorable display state.
    fn snapshot(&self) -> DisplaySnapshot;

    /// Restores a previously captured display state.
    ///
    /// Fails with [`crate::RenderError::StateCorruption`] when the
    /// snapshot no longer fits the stage.
    fn restore(&mut self, snapshot: &DisplaySnapshot) -> Result<()>;
}
