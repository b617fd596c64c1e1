//! Drawing markers into screenshot pixels.

use ab_glyph::{FontVec, PxScale};
use cairn_anno::Category;
use cairn_sweep::{AnchorPlacement, ViewResult};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut, draw_text_mut};
use imageproc::rect::Rect;

use crate::error::{MarkerError, Result};
use crate::geometry::{marker_size, place_marker, BASE_MARKER_SIZE};

/// Marker outline color for a category.
pub fn category_color(category: Category) -> Rgba<u8> {
    let (r, g, b) = match category {
        Category::ObjectWork => (128, 0, 0),
        Category::Measurements => (255, 0, 0),
        Category::Creation => (255, 165, 0),
        Category::Materials => (255, 255, 0),
        Category::StylisticAnalysis => (0, 255, 0),
        Category::Conservation => (0, 128, 0),
        Category::Analyses => (0, 255, 255),
        Category::RelatedWorks => (0, 0, 255),
        Category::Administration => (255, 192, 203),
        Category::Documentation => (128, 0, 128),
        Category::Other => (255, 255, 255),
    };
    Rgba([r, g, b, 255])
}

/// Burns numbered markers into screenshots.
pub struct ImagePainter {
    font: Option<FontVec>,
    base_size: u32,
}

impl ImagePainter {
    /// A painter without a label font. Markers are drawn unnumbered.
    pub fn new() -> Self {
        ImagePainter {
            font: None,
            base_size: BASE_MARKER_SIZE,
        }
    }

    /// A painter labeling markers with the given TrueType/OpenType font.
    pub fn with_font_bytes(bytes: Vec<u8>) -> Result<Self> {
        let font = FontVec::try_from_vec(bytes).map_err(|_| MarkerError::BadFont)?;
        Ok(ImagePainter {
            font: Some(font),
            base_size: BASE_MARKER_SIZE,
        })
    }

    /// Draws one marker per visible placement into `image`.
    ///
    /// `numbers` runs parallel to `placements`; hidden placements keep
    /// their number but draw nothing. CT quad placements additionally
    /// get their projected outline.
    pub fn burn(
        &self,
        image: &mut RgbaImage,
        placements: &[AnchorPlacement],
        numbers: &[u32],
    ) -> Result<()> {
        self.burn_scaled(image, placements, numbers, 1.0)
    }

    /// Like [`ImagePainter::burn`] with the marker side scaled.
    ///
    /// Model-view screenshots pass
    /// [`crate::MODEL_VIEW_MARKER_SCALE`] so their markers
    /// read larger than those on flat 2D annotations.
    pub fn burn_scaled(
        &self,
        image: &mut RgbaImage,
        placements: &[AnchorPlacement],
        numbers: &[u32],
        scale: f64,
    ) -> Result<()> {
        let (width, height) = image.dimensions();
        let size = (marker_size(self.base_size, width) as f64 * scale).round() as u32;
        for (placement, number) in placements.iter().zip(numbers) {
            let (x, y) = match placement.result {
                ViewResult::Visible { x, y } => (x, y),
                ViewResult::NotVisible => continue,
            };
            let color = category_color(placement.category);
            let b = place_marker(x, y, width, height, size)?;
            draw_hollow_rect_mut(
                image,
                Rect::at(b.left as i32, b.top as i32).of_size(b.size, b.size),
                color,
            );
            if let Some(quad) = placement.quad {
                self.outline_quad(image, &quad, height, color);
            }
            if let Some(font) = &self.font {
                let scale = PxScale::from(b.size as f32 * 0.8);
                let text = number.to_string();
                draw_text_mut(
                    image,
                    color,
                    b.left as i32 + 2,
                    b.top as i32 + 2,
                    scale,
                    font,
                    &text,
                );
            }
        }
        Ok(())
    }

    fn outline_quad(
        &self,
        image: &mut RgbaImage,
        quad: &[(f64, f64); 4],
        height: u32,
        color: Rgba<u8>,
    ) {
        // Corners arrive in display coordinates; flip once into rows.
        let pts: Vec<(f32, f32)> = quad
            .iter()
            .map(|(x, y)| (*x as f32, (height as f64 - y) as f32))
            .collect();
        for i in 0..4 {
            let a = pts[i];
            let b = pts[(i + 1) % 4];
            draw_line_segment_mut(image, a, b, color);
        }
    }
}

impl Default for ImagePainter {
    fn default() -> Self {
        Self::new()
    }
}
