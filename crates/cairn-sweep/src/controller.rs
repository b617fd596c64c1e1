//! The sweep driver.

use cairn_anno::{Category, Note};
use cairn_mesh::{SurfaceLocator, SurfaceMesh};
use cairn_render::{RenderStage, Viewpoint};
use tracing::{debug, warn};

use crate::anchor::AnchorResolver;
use crate::error::Result;
use crate::results::{AnchorPlacement, SkippedNote, SweepReport, ViewpointCapture};
use crate::visibility::anchor_view_result;

/// Options controlling a sweep.
#[derive(Debug, Clone, Default)]
pub struct SweepOptions {
    /// When set, only notes in these categories are processed.
    pub categories: Option<Vec<Category>>,
}

impl SweepOptions {
    fn allows(&self, category: Category) -> bool {
        match &self.categories {
            Some(list) => list.contains(&category),
            None => true,
        }
    }
}

/// Runs the six-viewpoint sweep over `notes`.
///
/// The stage's display state is snapshotted first and restored before
/// returning, on both the success and the failure path. A restore
/// failure outranks any sweep failure, because a stage left in the
/// wrong state is worse news than one missed screenshot.
///
/// Malformed notes (bad cell references, degenerate frustum planes) are
/// logged, recorded in [`SweepReport::skipped`] and never abort the
/// sweep.
pub fn sweep<S: RenderStage + ?Sized>(
    stage: &mut S,
    mesh: &SurfaceMesh,
    locator: &SurfaceLocator,
    notes: &[Note],
    options: &SweepOptions,
) -> Result<SweepReport> {
    let snapshot = stage.snapshot();
    let outcome = sweep_views(stage, mesh, locator, notes, options);
    let restored = stage.restore(&snapshot);
    match (outcome, restored) {
        (Ok(report), Ok(())) => Ok(report),
        (_, Err(restore_err)) => Err(restore_err.into()),
        (Err(sweep_err), Ok(())) => Err(sweep_err),
    }
}

fn sweep_views<S: RenderStage + ?Sized>(
    stage: &mut S,
    mesh: &SurfaceMesh,
    locator: &SurfaceLocator,
    notes: &[Note],
    options: &SweepOptions,
) -> Result<SweepReport> {
    let resolver = AnchorResolver::new(mesh, locator);
    let mut skipped = Vec::new();
    let mut resolved = Vec::new();
    for (index, note) in notes.iter().enumerate() {
        if !options.allows(note.category) {
            continue;
        }
        if let Err(err) = note.annotation.validate() {
            warn!(note = index, %err, "skipping malformed annotation");
            skipped.push(SkippedNote {
                note_index: index,
                reason: err.to_string(),
            });
            continue;
        }
        match resolver.resolve(&note.annotation) {
            Ok(anchor) => resolved.push((index, note, anchor)),
            Err(err) => {
                warn!(note = index, %err, "skipping annotation that does not fit the mesh");
                skipped.push(SkippedNote {
                    note_index: index,
                    reason: err.to_string(),
                });
            }
        }
    }

    stage.prepare_for_report();
    let mut captures = Vec::with_capacity(Viewpoint::ALL.len());
    for viewpoint in Viewpoint::ALL {
        stage.set_orthogonal_view(viewpoint);
        let screenshot = stage.capture_screenshot()?;
        let mut anchors = Vec::with_capacity(resolved.len());
        for (index, note, anchor) in &resolved {
            let (result, quad) = anchor_view_result(stage, viewpoint, anchor);
            anchors.push(AnchorPlacement {
                note_index: *index,
                kind: note.annotation.kind(),
                category: note.category,
                result,
                quad,
            });
        }
        debug!(
            %viewpoint,
            visible = anchors.iter().filter(|a| a.result.is_visible()).count(),
            total = anchors.len(),
            "captured viewpoint"
        );
        captures.push(ViewpointCapture {
            viewpoint,
            screenshot,
            anchors,
        });
    }
    Ok(SweepReport { captures, skipped })
}
