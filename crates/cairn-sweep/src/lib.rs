//! Six-viewpoint visibility sweep.
//!
//! Walks the canonical orthogonal viewpoints over a render stage,
//! resolves each note's 3D anchor, classifies it as visible or occluded
//! per viewpoint and projects visible anchors to display coordinates.
//! The stage's display state is snapshotted before the sweep and
//! restored afterwards, whether the sweep succeeds or not.

#![warn(missing_docs)]

mod anchor;
mod controller;
mod error;
mod results;
mod visibility;

pub use anchor::{AnchorResolver, ResolvedAnchor};
pub use controller::{sweep, SweepOptions};
pub use error::{SweepError, Result};
pub use results::{AnchorPlacement, SkippedNote, SweepReport, ViewResult, ViewpointCapture};
