//! Stable marker numbering.

use cairn_anno::AnnotationKind;

/// Assigns marker numbers to notes by annotation kind.
///
/// Point notes are numbered first in input order, then surface notes,
/// then frustum and CT notes sharing one block. Numbers are assigned to
/// every note, visible or not, so a note keeps the same number in all
/// six viewpoints and in the report captions even when some views hide
/// it.
pub fn assign_numbers(kinds: &[AnnotationKind]) -> Vec<u32> {
    let points = kinds
        .iter()
        .filter(|k| **k == AnnotationKind::Point)
        .count() as u32;
    let surfaces = kinds
        .iter()
        .filter(|k| **k == AnnotationKind::Surface)
        .count() as u32;

    let mut next_point = 1;
    let mut next_surface = points + 1;
    let mut next_region = points + surfaces + 1;
    kinds
        .iter()
        .map(|kind| match kind {
            AnnotationKind::Point => {
                let n = next_point;
                next_point += 1;
                n
            }
            AnnotationKind::Surface => {
                let n = next_surface;
                next_surface += 1;
                n
            }
            AnnotationKind::Frustum | AnnotationKind::CtQuad => {
                let n = next_region;
                next_region += 1;
                n
            }
        })
        .collect()
}
