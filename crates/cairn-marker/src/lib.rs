//! Numbered marker placement and burn-in.
//!
//! Converts sweep placements into square markers sized relative to the
//! screenshot, numbers them stably across all six viewpoints and draws
//! them into the screenshot pixels.

#![warn(missing_docs)]

mod error;
mod geometry;
mod numbering;
mod painter;

pub use error::{MarkerError, Result};
pub use geometry::{marker_size, place_marker, MarkerBox, MODEL_VIEW_MARKER_SCALE};
pub use numbering::assign_numbers;
pub use painter::{category_color, ImagePainter};
