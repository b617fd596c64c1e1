#![warn(missing_docs)]

//! Typed annotation data model for the cairn engine.
//!
//! The authoring layer parses note text into these types once; the engine
//! operates on typed data only and never inspects free text. Everything
//! here is consumed read-only by the sweep and report layers.

mod category;
mod note;

pub use category::Category;
pub use note::{
    Annotation, AnnotationKind, Note, Note2d, NoteError, Region2d, SERIALIZED_PLANE_COUNT,
};
