//! Annotation records.
//!
//! Geometric payloads use plain `[f64; 3]` arrays to keep serde derives
//! free of nalgebra's serde feature; accessors convert to math types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use cairn_math::{Point3, Vec3};
use cairn_mesh::{CellId, Frustum, FrustumPlane};

/// Number of planes a frustum annotation must carry.
pub const SERIALIZED_PLANE_COUNT: usize = 6;

/// Structural problems in an annotation payload.
///
/// A malformed annotation is skipped (with a log line) and never aborts
/// the batch.
#[derive(Error, Debug)]
pub enum NoteError {
    /// Surface annotation with an empty cell list.
    #[error("surface annotation has no cells")]
    NoCells,
    /// Frustum annotation with a zero-length normal.
    #[error("frustum plane {0} has a degenerate normal")]
    DegenerateNormal(usize),
}

/// The geometric payload of a note, one of four kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Annotation {
    /// A single 3D world-space position.
    Point {
        /// World position `[x, y, z]`.
        position: [f64; 3],
    },
    /// A patch of the mesh surface, referenced by cell ids.
    Surface {
        /// Referenced cell ids; at least one.
        cells: Vec<CellId>,
    },
    /// A planar quad on a CT slice, given by its four corners.
    CtQuad {
        /// Corner points `[x, y, z]`, in outline order.
        corners: [[f64; 3]; 4],
    },
    /// A six-plane convex viewing region.
    Frustum {
        /// A sample point on each plane.
        points: [[f64; 3]; SERIALIZED_PLANE_COUNT],
        /// Outward normal of each plane.
        normals: [[f64; 3]; SERIALIZED_PLANE_COUNT],
    },
}

/// The kind of an annotation, in marker-numbering priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationKind {
    /// Point note.
    Point,
    /// Surface note.
    Surface,
    /// Frustum note.
    Frustum,
    /// CT surface note.
    CtQuad,
}

impl AnnotationKind {
    /// Caption prefix ("Point Note", ...).
    pub fn caption_prefix(&self) -> &'static str {
        match self {
            AnnotationKind::Point => "Point Note",
            AnnotationKind::Surface => "Surface Note",
            AnnotationKind::Frustum => "Frustum Note",
            AnnotationKind::CtQuad => "Surface Note",
        }
    }
}

impl Annotation {
    /// The kind tag of this annotation.
    pub fn kind(&self) -> AnnotationKind {
        match self {
            Annotation::Point { .. } => AnnotationKind::Point,
            Annotation::Surface { .. } => AnnotationKind::Surface,
            Annotation::CtQuad { .. } => AnnotationKind::CtQuad,
            Annotation::Frustum { .. } => AnnotationKind::Frustum,
        }
    }

    /// Check structural invariants (cell list non-empty, usable normals).
    pub fn validate(&self) -> Result<(), NoteError> {
        match self {
            Annotation::Surface { cells } if cells.is_empty() => Err(NoteError::NoCells),
            Annotation::Frustum { normals, .. } => {
                for (i, n) in normals.iter().enumerate() {
                    let len2 = n[0] * n[0] + n[1] * n[1] + n[2] * n[2];
                    if len2 < 1e-24 {
                        return Err(NoteError::DegenerateNormal(i));
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// World position of a point annotation, `None` for other kinds.
    pub fn point_position(&self) -> Option<Point3> {
        match self {
            Annotation::Point { position } => Some(point3(position)),
            _ => None,
        }
    }

    /// Corner points of a CT quad annotation, `None` for other kinds.
    pub fn ct_corners(&self) -> Option<[Point3; 4]> {
        match self {
            Annotation::CtQuad { corners } => Some(std::array::from_fn(|i| point3(&corners[i]))),
            _ => None,
        }
    }

    /// Build the convex region of a frustum annotation.
    ///
    /// Returns `None` for other kinds.
    pub fn frustum(&self) -> Option<Frustum> {
        match self {
            Annotation::Frustum { points, normals } => {
                let planes = std::array::from_fn(|i| {
                    FrustumPlane::new(point3(&points[i]), vec3(&normals[i]))
                });
                Some(Frustum::new(planes))
            }
            _ => None,
        }
    }
}

/// Convert a serialized coordinate triple to a [`Point3`].
pub(crate) fn point3(a: &[f64; 3]) -> Point3 {
    Point3::new(a[0], a[1], a[2])
}

/// Convert a serialized coordinate triple to a [`Vec3`].
pub(crate) fn vec3(a: &[f64; 3]) -> Vec3 {
    Vec3::new(a[0], a[1], a[2])
}

/// A complete 3D note: category, text body, linked illustrations, and the
/// geometric payload. Produced by the external authoring layer; consumed
/// read-only here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    /// Category used for grouping and filtering.
    pub category: super::Category,
    /// Free-text body of the note.
    pub body: String,
    /// Linked illustration image paths, relative to the notes directory.
    #[serde(default)]
    pub images: Vec<PathBuf>,
    /// The geometric payload.
    pub annotation: Annotation,
}

/// A 2D region on an image-mode object, in pixel coordinates with the
/// origin at the bottom-left (authoring convention).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Region2d {
    /// A single pixel position.
    Point {
        /// X pixel coordinate.
        x: i32,
        /// Y pixel coordinate (bottom-up).
        y: i32,
    },
    /// An axis-aligned rectangle given by two opposite corners.
    Rect {
        /// First corner X.
        x1: i32,
        /// First corner Y (bottom-up).
        y1: i32,
        /// Second corner X.
        x2: i32,
        /// Second corner Y (bottom-up).
        y2: i32,
    },
}

/// A note on a 2D image-mode object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note2d {
    /// Category used for grouping and filtering.
    pub category: super::Category,
    /// Free-text body of the note.
    pub body: String,
    /// Linked illustration image paths.
    #[serde(default)]
    pub images: Vec<PathBuf>,
    /// The pixel region.
    pub region: Region2d,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Category;

    #[test]
    fn test_surface_requires_cells() {
        let a = Annotation::Surface { cells: vec![] };
        assert!(a.validate().is_err());
        let a = Annotation::Surface { cells: vec![3] };
        assert!(a.validate().is_ok());
    }

    #[test]
    fn test_frustum_degenerate_normal() {
        let a = Annotation::Frustum {
            points: [[0.0; 3]; 6],
            normals: [[0.0; 3]; 6],
        };
        assert!(matches!(a.validate(), Err(NoteError::DegenerateNormal(0))));
    }

    #[test]
    fn test_kind_priority_order() {
        assert!(AnnotationKind::Point < AnnotationKind::Surface);
        assert!(AnnotationKind::Surface < AnnotationKind::Frustum);
    }

    #[test]
    fn test_note_json_roundtrip() {
        let note = Note {
            category: Category::Conservation,
            body: "flaking pigment near the rim".into(),
            images: vec![PathBuf::from("rim_detail.png")],
            annotation: Annotation::Point {
                position: [1.0, 2.0, 3.0],
            },
        };
        let json = serde_json::to_string(&note).unwrap();
        let back: Note = serde_json::from_str(&json).unwrap();
        assert_eq!(back.category, Category::Conservation);
        match back.annotation {
            Annotation::Point { position } => assert_eq!(position, [1.0, 2.0, 3.0]),
            _ => panic!("kind changed in roundtrip"),
        }
    }

    #[test]
    fn test_frustum_region_built_from_arrays() {
        let a = Annotation::Frustum {
            points: [
                [-1.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, -1.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, -1.0],
                [0.0, 0.0, 1.0],
            ],
            normals: [
                [-1.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, -1.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, -1.0],
                [0.0, 0.0, 1.0],
            ],
        };
        let f = a.frustum().unwrap();
        assert!(f.contains(&Point3::origin()));
        assert!(!f.contains(&Point3::new(2.0, 0.0, 0.0)));
    }
}
