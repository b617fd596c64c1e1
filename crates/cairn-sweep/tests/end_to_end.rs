//! End-to-end sweeps over a small scene: a unit cube with an occluder
//! slab in front of it.

use cairn_anno::{Annotation, Category, Note};
use cairn_math::Point3;
use cairn_mesh::{SurfaceLocator, SurfaceMesh};
use cairn_render::{RenderStage, SoftwareStage, Viewpoint};
use cairn_sweep::{sweep, SweepOptions, ViewResult};

fn cube_cells() -> Vec<Vec<u32>> {
    vec![
        vec![0, 3, 2, 1],
        vec![4, 5, 6, 7],
        vec![0, 1, 5, 4],
        vec![2, 3, 7, 6],
        vec![0, 4, 7, 3],
        vec![1, 2, 6, 5],
    ]
}

fn box_vertices(min: Point3, max: Point3) -> Vec<Point3> {
    vec![
        Point3::new(min.x, min.y, min.z),
        Point3::new(max.x, min.y, min.z),
        Point3::new(max.x, max.y, min.z),
        Point3::new(min.x, max.y, min.z),
        Point3::new(min.x, min.y, max.z),
        Point3::new(max.x, min.y, max.z),
        Point3::new(max.x, max.y, max.z),
        Point3::new(min.x, max.y, max.z),
    ]
}

/// A unit cube plus a wide thin slab floating in front of its front face.
fn cube_with_slab() -> SurfaceMesh {
    let mut vertices = box_vertices(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
    let mut cells = cube_cells();
    let slab_vertices = box_vertices(Point3::new(-0.5, -0.5, 1.6), Point3::new(1.5, 1.5, 1.7));
    let offset = vertices.len() as u32;
    vertices.extend(slab_vertices);
    for cell in cube_cells() {
        cells.push(cell.into_iter().map(|v| v + offset).collect());
    }
    SurfaceMesh::new(vertices, cells).unwrap()
}

fn note(annotation: Annotation) -> Note {
    Note {
        category: Category::Conservation,
        body: "integration".to_string(),
        images: Vec::new(),
        annotation,
    }
}

fn run(mesh: &SurfaceMesh, notes: &[Note]) -> cairn_sweep::SweepReport {
    let locator = SurfaceLocator::build(mesh);
    let mut stage = SoftwareStage::new(mesh, (400, 300)).unwrap();
    sweep(&mut stage, mesh, &locator, notes, &SweepOptions::default()).unwrap()
}

fn result_for(report: &cairn_sweep::SweepReport, viewpoint: Viewpoint) -> ViewResult {
    report
        .captures
        .iter()
        .find(|c| c.viewpoint == viewpoint)
        .expect("viewpoint missing from sweep")
        .anchors[0]
        .result
}

#[test]
fn occluded_point_gets_the_sentinel_from_the_front() {
    let mesh = cube_with_slab();
    let notes = [
        // Center of the cube's front face, behind the slab.
        note(Annotation::Point {
            position: [0.5, 0.5, 1.0],
        }),
        // Center of the slab's own front face, nothing in front of it.
        note(Annotation::Point {
            position: [0.5, 0.5, 1.7],
        }),
    ];
    let report = run(&mesh, &notes);
    let capture = report
        .captures
        .iter()
        .find(|c| c.viewpoint == Viewpoint::Front)
        .unwrap();
    assert_eq!(capture.anchors[0].result.sentinel_pair(), (-1.0, -1.0));
    assert!(capture.anchors[1].result.is_visible());
}

#[test]
fn surface_note_projects_near_the_image_center() {
    let v = box_vertices(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
    let mesh = SurfaceMesh::new(v, cube_cells()).unwrap();
    // The front face cell; its anchor is the face center, which sits at
    // the model center in x and y and so projects to the image center.
    let notes = [note(Annotation::Surface { cells: vec![1] })];
    let report = run(&mesh, &notes);
    match result_for(&report, Viewpoint::Front) {
        ViewResult::Visible { x, y } => {
            assert!((x - 200.0).abs() <= 1.0, "x = {x}");
            assert!((y - 150.0).abs() <= 1.0, "y = {y}");
        }
        ViewResult::NotVisible => panic!("front face anchor hidden from the front"),
    }
}

#[test]
fn repeated_sweeps_are_deterministic() {
    let mesh = cube_with_slab();
    let notes = [
        note(Annotation::Point {
            position: [0.5, 0.5, 1.0],
        }),
        note(Annotation::Surface { cells: vec![1] }),
        note(Annotation::CtQuad {
            corners: [
                [0.2, 0.2, 1.0],
                [0.8, 0.2, 1.0],
                [0.8, 0.8, 1.0],
                [0.2, 0.8, 1.0],
            ],
        }),
    ];
    let a = run(&mesh, &notes);
    let b = run(&mesh, &notes);
    for (ca, cb) in a.captures.iter().zip(&b.captures) {
        assert_eq!(ca.viewpoint, cb.viewpoint);
        assert_eq!(ca.anchors, cb.anchors);
    }
}

#[test]
fn frustum_note_tracks_the_seen_face_per_viewpoint() {
    let v = box_vertices(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
    let mesh = SurfaceMesh::new(v, cube_cells()).unwrap();
    // A frustum enclosing the whole cube.
    let region = cairn_mesh::Frustum::axis_aligned(
        Point3::new(-1.0, -1.0, -1.0),
        Point3::new(2.0, 2.0, 2.0),
    );
    let mut points = [[0.0; 3]; 6];
    let mut normals = [[0.0; 3]; 6];
    for (i, plane) in region.planes().iter().enumerate() {
        points[i] = [plane.point.x, plane.point.y, plane.point.z];
        normals[i] = [plane.normal.x, plane.normal.y, plane.normal.z];
    }
    let notes = [note(Annotation::Frustum { points, normals })];
    let report = run(&mesh, &notes);
    // From every viewpoint the probe hits the near face of the cube,
    // which is visible by construction.
    for capture in &report.captures {
        assert!(
            capture.anchors[0].result.is_visible(),
            "region hidden from {}",
            capture.viewpoint
        );
    }
}

#[test]
fn sweep_leaves_the_stage_as_it_found_it() {
    let mesh = cube_with_slab();
    let locator = SurfaceLocator::build(&mesh);
    let mut stage = SoftwareStage::new(&mesh, (400, 300)).unwrap();
    stage.set_orthogonal_view(Viewpoint::Top);
    let before = stage.snapshot();
    sweep(
        &mut stage,
        &mesh,
        &locator,
        &[note(Annotation::Point {
            position: [0.5, 0.5, 1.0],
        })],
        &SweepOptions::default(),
    )
    .unwrap();
    assert_eq!(stage.snapshot(), before);
}
