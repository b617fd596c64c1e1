//! Marker sizing and placement.

use crate::error::{MarkerError, Result};

/// Base marker size in pixels before scaling with the image width.
pub const BASE_MARKER_SIZE: u32 = 10;

/// Minimum distance in pixels between a marker edge and the image edge.
const MIN_INSET: u32 = 1;

/// Enlargement of markers over model-view screenshots relative to
/// markers drawn on flat 2D annotations.
pub const MODEL_VIEW_MARKER_SCALE: f64 = 1.2;

/// A placed square marker, in image pixel coordinates with the origin
/// at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerBox {
    /// Left edge column.
    pub left: u32,
    /// Top edge row.
    pub top: u32,
    /// Side length.
    pub size: u32,
}

impl MarkerBox {
    /// Center of the box in image coordinates.
    pub fn center(&self) -> (u32, u32) {
        (self.left + self.size / 2, self.top + self.size / 2)
    }
}

/// Marker side length for a screenshot of the given width.
///
/// Grows linearly with the image so markers stay legible when report
/// screenshots are rendered large.
pub fn marker_size(base: u32, image_width: u32) -> u32 {
    (base as f64 * 2.0 + 3.5 * image_width as f64 / 400.0).round() as u32
}

/// Places a marker centered on a display position.
///
/// `x` and `y` are display coordinates, pixels from the bottom-left
/// corner with y growing upward; the y axis is flipped here, exactly
/// once, into image row coordinates. Markers near an edge are shifted
/// inward until they fit with [`MIN_INSET`]; they are never shrunk, so
/// every marker in one report reads at the same scale. Fails when the
/// image cannot hold the marker at all.
pub fn place_marker(x: f64, y: f64, width: u32, height: u32, size: u32) -> Result<MarkerBox> {
    if size + 2 * MIN_INSET > width || size + 2 * MIN_INSET > height {
        return Err(MarkerError::ImageTooSmall {
            size,
            width,
            height,
        });
    }
    let row = height as f64 - y;
    let left = (x - size as f64 / 2.0).round() as i64;
    let top = (row - size as f64 / 2.0).round() as i64;
    let max_left = (width - MIN_INSET - size) as i64;
    let max_top = (height - MIN_INSET - size) as i64;
    Ok(MarkerBox {
        left: left.clamp(MIN_INSET as i64, max_left) as u32,
        top: top.clamp(MIN_INSET as i64, max_top) as u32,
        size,
    })
}
