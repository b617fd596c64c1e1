//! Report inputs.

use cairn_anno::{Category, Note, Note2d};
use cairn_mesh::SurfaceMesh;
use image::RgbaImage;

/// One object in a report batch.
#[derive(Debug)]
pub struct ReportObject {
    /// Display name, also used for output file names.
    pub name: String,
    /// The object's geometry or image, with its notes.
    pub source: ObjectSource,
}

/// What a report object is made of.
#[derive(Debug)]
pub enum ObjectSource {
    /// A 3D surface mesh annotated with spatial notes. Swept through
    /// the six canonical viewpoints.
    Mesh {
        /// The model surface.
        mesh: SurfaceMesh,
        /// Spatial notes attached to the model.
        notes: Vec<Note>,
    },
    /// A plain 2D image annotated with pixel-region notes. No sweep;
    /// markers are burned straight into a copy of the image.
    Image2d {
        /// The source image.
        image: RgbaImage,
        /// Pixel-region notes.
        notes: Vec<Note2d>,
    },
}

/// Options applied to the whole batch.
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Screenshot viewport for 3D objects. `None` uses 800x600.
    pub viewport: Option<(u32, u32)>,
    /// When set, only notes in these categories appear in the report.
    pub categories: Option<Vec<Category>>,
    /// Raw bytes of a TrueType/OpenType font for marker numbers.
    pub font: Option<Vec<u8>>,
}

impl ReportOptions {
    /// Viewport to render 3D objects at.
    pub fn viewport_or_default(&self) -> (u32, u32) {
        self.viewport.unwrap_or((800, 600))
    }
}
