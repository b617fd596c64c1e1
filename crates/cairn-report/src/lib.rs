//! Report assembly.
//!
//! Takes a batch of report objects, runs the six-viewpoint sweep over
//! each 3D object (or places 2D markers directly for image-mode
//! objects), burns numbered markers into the screenshots and hands
//! screenshots, captions and linked illustrations to a
//! [`DocumentSink`]. One broken object never aborts the batch.

#![warn(missing_docs)]

mod caption;
mod error;
mod object;
mod runner;
mod sink;

pub use caption::{caption_for, linked_image_layout, Caption, ImageLayout};
pub use error::{ReportError, Result};
pub use object::{ObjectSource, ReportObject, ReportOptions};
pub use runner::{generate, ReportSummary};
pub use sink::{DocumentSink, JsonSink};
