//! Sweep output types.

use cairn_anno::{AnnotationKind, Category};
use cairn_render::Viewpoint;
use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// Display coordinate pair written for anchors that are not visible
/// from a viewpoint.
pub const NOT_VISIBLE_SENTINEL: (f64, f64) = (-1.0, -1.0);

/// Outcome of projecting one anchor from one viewpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ViewResult {
    /// The anchor is visible; display coordinates in pixels from the
    /// bottom-left corner.
    Visible {
        /// X display coordinate.
        x: f64,
        /// Y display coordinate, measured upward.
        y: f64,
    },
    /// The anchor is occluded or outside the viewport.
    NotVisible,
}

impl ViewResult {
    /// Whether the anchor was visible.
    pub fn is_visible(&self) -> bool {
        matches!(self, ViewResult::Visible { .. })
    }

    /// The display position, with `(-1, -1)` standing in for a hidden
    /// anchor. Matches the convention persisted in legacy note files.
    pub fn sentinel_pair(&self) -> (f64, f64) {
        match *self {
            ViewResult::Visible { x, y } => (x, y),
            ViewResult::NotVisible => NOT_VISIBLE_SENTINEL,
        }
    }
}

/// Per-viewpoint placement of one note's anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorPlacement {
    /// Index of the note in the input list.
    pub note_index: usize,
    /// Annotation kind, used for marker numbering.
    pub kind: AnnotationKind,
    /// Category of the note.
    pub category: Category,
    /// Visibility and projection outcome.
    pub result: ViewResult,
    /// Projected corner outline, present for CT quad annotations only.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub quad: Option<[(f64, f64); 4]>,
}

/// One viewpoint's screenshot and anchor placements.
#[derive(Debug)]
pub struct ViewpointCapture {
    /// The viewpoint this capture was taken from.
    pub viewpoint: Viewpoint,
    /// Screenshot, rows top-down as image files expect.
    pub screenshot: RgbaImage,
    /// Placement of every processed note's anchor, in note order.
    pub anchors: Vec<AnchorPlacement>,
}

/// A note the sweep refused to process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedNote {
    /// Index of the note in the input list.
    pub note_index: usize,
    /// Human-readable reason.
    pub reason: String,
}

/// Full output of a six-viewpoint sweep.
#[derive(Debug)]
pub struct SweepReport {
    /// One capture per viewpoint, in sweep order.
    pub captures: Vec<ViewpointCapture>,
    /// Notes skipped as malformed, with reasons.
    pub skipped: Vec<SkippedNote>,
}
