//! Orthographic camera model, canonical viewpoints and the render-stage
//! boundary.
//!
//! The sweep layer never talks to a concrete renderer. It drives a
//! [`RenderStage`], which exposes the four capabilities the sweep needs:
//! aim the camera at a canonical viewpoint, capture a screenshot, project
//! world points to display coordinates and classify world points as
//! visible or occluded. [`SoftwareStage`] is the built-in implementation,
//! a plain z-buffer rasterizer.

#![warn(missing_docs)]

mod camera;
mod error;
mod software;
mod stage;
mod viewpoint;

pub use camera::Camera;
pub use error::{RenderError, Result};
pub use software::SoftwareStage;
pub use stage::{DisplaySnapshot, LightRig, RenderMode, RenderStage};
pub use viewpoint::Viewpoint;
