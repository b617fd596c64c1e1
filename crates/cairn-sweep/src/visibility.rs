//! Per-viewpoint visibility classification and projection.

use cairn_math::Point3;
use cairn_mesh::{Ray, SurfaceLocator};
use cairn_render::{RenderStage, Viewpoint};

use crate::anchor::ResolvedAnchor;
use crate::results::ViewResult;

/// Distance the frustum probe ray starts outside the region, along the
/// viewpoint's outward axis.
const PROBE_OFFSET: f64 = 100.0;

/// Tolerance when capping the probe at the anchor, so a surface exactly
/// at the anchor still counts.
const PROBE_SLACK: f64 = 1e-9;

/// Classifies a single world point from the current view.
pub fn point_view_result<S: RenderStage + ?Sized>(stage: &S, point: &Point3) -> ViewResult {
    let visible = stage.select_visible(std::slice::from_ref(point));
    if visible.first().copied().unwrap_or(false) {
        match stage.world_to_display(point) {
            Some((x, y, _)) => ViewResult::Visible { x, y },
            None => ViewResult::NotVisible,
        }
    } else {
        ViewResult::NotVisible
    }
}

/// Classifies a frustum region from the current view.
///
/// The tested point is view dependent: a probe segment runs from well
/// outside the region along the viewpoint's outward axis back to the
/// region anchor, and the first surface it meets inside the region is
/// the face a viewer from this side would see. Surfaces past the
/// anchor belong to the far side of the region and do not count. The
/// entry point then goes through ordinary point classification.
pub fn region_view_result<S: RenderStage + ?Sized>(
    stage: &S,
    viewpoint: Viewpoint,
    center: &Point3,
    locator: &SurfaceLocator,
) -> ViewResult {
    let origin = center + viewpoint.outward_axis() * PROBE_OFFSET;
    let ray = Ray::between(origin, *center);
    match locator.intersect_ray(&ray) {
        Some(hit) if hit.t <= PROBE_OFFSET + PROBE_SLACK => point_view_result(stage, &hit.point),
        _ => ViewResult::NotVisible,
    }
}

/// Classifies a CT quad and, when its center is visible, projects the
/// corner outline.
pub fn ct_view_result<S: RenderStage + ?Sized>(
    stage: &S,
    center: &Point3,
    corners: &[Point3; 4],
) -> (ViewResult, Option<[(f64, f64); 4]>) {
    let result = point_view_result(stage, center);
    if !result.is_visible() {
        return (result, None);
    }
    let mut quad = [(0.0, 0.0); 4];
    for (slot, corner) in quad.iter_mut().zip(corners.iter()) {
        match stage.world_to_display(corner) {
            Some((x, y, _)) => *slot = (x, y),
            None => return (result, None),
        }
    }
    (result, Some(quad))
}

/// Classifies any resolved anchor from the current view.
pub fn anchor_view_result<S: RenderStage + ?Sized>(
    stage: &S,
    viewpoint: Viewpoint,
    anchor: &ResolvedAnchor,
) -> (ViewResult, Option<[(f64, f64); 4]>) {
    match anchor {
        ResolvedAnchor::Fixed(p) => (point_view_result(stage, p), None),
        ResolvedAnchor::CtQuad { center, corners } => ct_view_result(stage, center, corners),
        ResolvedAnchor::Region { center, locator } => {
            (region_view_result(stage, viewpoint, center, locator), None)
        }
        ResolvedAnchor::Empty => (ViewResult::NotVisible, None),
    }
}
