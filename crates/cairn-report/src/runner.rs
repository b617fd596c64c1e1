//! The batch runner.

use cairn_anno::{AnnotationKind, Note, Note2d};
use cairn_marker::{assign_numbers, ImagePainter, MODEL_VIEW_MARKER_SCALE};
use cairn_mesh::{SurfaceLocator, SurfaceMesh};
use cairn_render::SoftwareStage;
use cairn_sweep::{sweep, AnchorPlacement, SweepOptions, ViewResult};
use image::RgbaImage;
use tracing::{info, warn};

use crate::caption::{caption_for, linked_image_layout};
use crate::error::Result;
use crate::object::{ObjectSource, ReportObject, ReportOptions};
use crate::sink::DocumentSink;

/// Outcome counts for a finished batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSummary {
    /// Objects fully written to the sink.
    pub objects_ok: usize,
    /// Objects skipped after a failure.
    pub objects_failed: usize,
}

/// Assembles the whole report batch into `sink`.
///
/// Each object is processed independently; a failing object is logged,
/// recorded as a sink warning and skipped, and the batch carries on.
/// Only sink-level failures (unwritable output) and a bad label font
/// abort the run.
pub fn generate<S: DocumentSink>(
    objects: &[ReportObject],
    sink: &mut S,
    options: &ReportOptions,
) -> Result<ReportSummary> {
    let painter = match &options.font {
        Some(bytes) => ImagePainter::with_font_bytes(bytes.clone())?,
        None => ImagePainter::new(),
    };
    let mut summary = ReportSummary {
        objects_ok: 0,
        objects_failed: 0,
    };
    for object in objects {
        sink.begin_object(&object.name)?;
        let outcome = match &object.source {
            ObjectSource::Mesh { mesh, notes } => {
                write_mesh_object(mesh, notes, sink, options, &painter)
            }
            ObjectSource::Image2d { image, notes } => {
                write_image_object(image, notes, sink, options, &painter)
            }
        };
        match outcome {
            Ok(()) => {
                info!(object = %object.name, "report object written");
                summary.objects_ok += 1;
            }
            Err(err) => {
                warn!(object = %object.name, %err, "skipping report object");
                sink.warning(&format!("object skipped: {err}"));
                summary.objects_failed += 1;
            }
        }
        sink.end_object()?;
    }
    sink.finish()?;
    Ok(summary)
}

fn write_mesh_object<S: DocumentSink>(
    mesh: &SurfaceMesh,
    notes: &[Note],
    sink: &mut S,
    options: &ReportOptions,
    painter: &ImagePainter,
) -> Result<()> {
    let locator = SurfaceLocator::build(mesh);
    let mut stage = SoftwareStage::new(mesh, options.viewport_or_default())?;
    let sweep_options = SweepOptions {
        categories: options.categories.clone(),
    };
    let report = sweep(&mut stage, mesh, &locator, notes, &sweep_options)?;

    for skipped in &report.skipped {
        sink.warning(&format!(
            "note {} skipped: {}",
            skipped.note_index, skipped.reason
        ));
    }

    // Numbering is derived from the first capture; every capture lists
    // the same notes in the same order.
    let placements = report
        .captures
        .first()
        .map(|c| c.anchors.as_slice())
        .unwrap_or(&[]);
    let kinds: Vec<AnnotationKind> = placements.iter().map(|p| p.kind).collect();
    let numbers = assign_numbers(&kinds);

    for capture in &report.captures {
        let mut marked = capture.screenshot.clone();
        painter.burn_scaled(&mut marked, &capture.anchors, &numbers, MODEL_VIEW_MARKER_SCALE)?;
        sink.screenshot(capture.viewpoint.suffix(), &marked)?;
    }

    for (placement, number) in placements.iter().zip(&numbers) {
        let note = &notes[placement.note_index];
        sink.caption(&caption_for(
            placement.kind,
            *number,
            placement.category,
            &note.body,
        ))?;
        write_linked_images(&note.images, sink)?;
    }
    Ok(())
}

fn write_image_object<S: DocumentSink>(
    image: &RgbaImage,
    notes: &[Note2d],
    sink: &mut S,
    options: &ReportOptions,
    painter: &ImagePainter,
) -> Result<()> {
    let kept: Vec<&Note2d> = notes
        .iter()
        .filter(|n| match &options.categories {
            Some(list) => list.contains(&n.category),
            None => true,
        })
        .collect();
    let placements: Vec<AnchorPlacement> = kept
        .iter()
        .enumerate()
        .map(|(i, note)| region_placement(i, note))
        .collect();
    let kinds: Vec<AnnotationKind> = placements.iter().map(|p| p.kind).collect();
    let numbers = assign_numbers(&kinds);

    let mut marked = image.clone();
    painter.burn(&mut marked, &placements, &numbers)?;
    sink.screenshot("annotated", &marked)?;

    for ((placement, number), note) in placements.iter().zip(&numbers).zip(&kept) {
        sink.caption(&caption_for(
            placement.kind,
            *number,
            placement.category,
            &note.body,
        ))?;
        write_linked_images(&note.images, sink)?;
    }
    Ok(())
}

fn region_placement(index: usize, note: &Note2d) -> AnchorPlacement {
    use cairn_anno::Region2d;
    match note.region {
        Region2d::Point { x, y } => AnchorPlacement {
            note_index: index,
            kind: AnnotationKind::Point,
            category: note.category,
            result: ViewResult::Visible {
                x: x as f64,
                y: y as f64,
            },
            quad: None,
        },
        Region2d::Rect { x1, y1, x2, y2 } => AnchorPlacement {
            note_index: index,
            kind: AnnotationKind::Surface,
            category: note.category,
            result: ViewResult::Visible {
                x: (x1 + x2) as f64 / 2.0,
                y: (y1 + y2) as f64 / 2.0,
            },
            quad: Some([
                (x1 as f64, y1 as f64),
                (x2 as f64, y1 as f64),
                (x2 as f64, y2 as f64),
                (x1 as f64, y2 as f64),
            ]),
        },
    }
}

fn write_linked_images<S: DocumentSink>(
    paths: &[std::path::PathBuf],
    sink: &mut S,
) -> Result<()> {
    for path in paths {
        match image::open(path) {
            Ok(img) => {
                let rgba = img.to_rgba8();
                let layout = linked_image_layout(rgba.width(), rgba.height());
                sink.linked_image(&rgba, layout)?;
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "linked image unreadable");
                sink.warning(&format!("linked image {} unreadable", path.display()));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caption::{Caption, ImageLayout};
    use cairn_anno::{Annotation, Category, Region2d};
    use cairn_math::Point3;

    #[derive(Default)]
    struct MemorySink {
        objects: Vec<String>,
        screenshots: Vec<String>,
        captions: Vec<Caption>,
        warnings: Vec<String>,
        finished: bool,
    }

    impl DocumentSink for MemorySink {
        fn begin_object(&mut self, name: &str) -> Result<()> {
            self.objects.push(name.to_string());
            Ok(())
        }
        fn screenshot(&mut self, label: &str, _image: &RgbaImage) -> Result<()> {
            self.screenshots.push(label.to_string());
            Ok(())
        }
        fn caption(&mut self, caption: &Caption) -> Result<()> {
            self.captions.push(caption.clone());
            Ok(())
        }
        fn linked_image(&mut self, _image: &RgbaImage, _layout: ImageLayout) -> Result<()> {
            Ok(())
        }
        fn warning(&mut self, message: &str) {
            self.warnings.push(message.to_string());
        }
        fn end_object(&mut self) -> Result<()> {
            Ok(())
        }
        fn finish(&mut self) -> Result<()> {
            self.finished = true;
            Ok(())
        }
    }

    fn unit_cube() -> SurfaceMesh {
        let v = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        ];
        let cells = vec![
            vec![0, 3, 2, 1],
            vec![4, 5, 6, 7],
            vec![0, 1, 5, 4],
            vec![2, 3, 7, 6],
            vec![0, 4, 7, 3],
            vec![1, 2, 6, 5],
        ];
        SurfaceMesh::new(v, cells).unwrap()
    }

    fn point_note(position: [f64; 3]) -> Note {
        Note {
            category: Category::Conservation,
            body: "test note".to_string(),
            images: Vec::new(),
            annotation: Annotation::Point { position },
        }
    }

    #[test]
    fn mesh_object_writes_six_screenshots_and_captions() {
        let objects = [ReportObject {
            name: "cube".to_string(),
            source: ObjectSource::Mesh {
                mesh: unit_cube(),
                notes: vec![point_note([0.5, 0.5, 1.0])],
            },
        }];
        let mut sink = MemorySink::default();
        let options = ReportOptions {
            viewport: Some((200, 200)),
            ..Default::default()
        };
        let summary = generate(&objects, &mut sink, &options).unwrap();
        assert_eq!(summary.objects_ok, 1);
        assert_eq!(
            sink.screenshots,
            ["front", "left", "right", "top", "bottom", "back"]
        );
        assert_eq!(sink.captions.len(), 1);
        assert_eq!(sink.captions[0].title, "Point Note 1");
        assert!(sink.finished);
    }

    #[test]
    fn failing_object_does_not_abort_the_batch() {
        let objects = [
            ReportObject {
                name: "too-small".to_string(),
                source: ObjectSource::Mesh {
                    mesh: unit_cube(),
                    notes: vec![point_note([0.5, 0.5, 1.0])],
                },
            },
            ReportObject {
                name: "fine".to_string(),
                source: ObjectSource::Mesh {
                    mesh: unit_cube(),
                    notes: Vec::new(),
                },
            },
        ];
        let mut sink = MemorySink::default();
        // Viewport too small for the marker, so the first object fails.
        let options = ReportOptions {
            viewport: Some((20, 20)),
            ..Default::default()
        };
        let summary = generate(&objects, &mut sink, &options).unwrap();
        assert_eq!(summary.objects_failed, 1);
        assert_eq!(summary.objects_ok, 1);
        assert!(sink.warnings.iter().any(|w| w.contains("object skipped")));
    }

    #[test]
    fn image_object_burns_markers_without_a_sweep() {
        let objects = [ReportObject {
            name: "plate".to_string(),
            source: ObjectSource::Image2d {
                image: RgbaImage::from_pixel(300, 200, image::Rgba([255, 255, 255, 255])),
                notes: vec![Note2d {
                    category: Category::Other,
                    body: "scratch".to_string(),
                    images: Vec::new(),
                    region: Region2d::Rect {
                        x1: 50,
                        y1: 50,
                        x2: 120,
                        y2: 100,
                    },
                }],
            },
        }];
        let mut sink = MemorySink::default();
        let summary = generate(&objects, &mut sink, &ReportOptions::default()).unwrap();
        assert_eq!(summary.objects_ok, 1);
        assert_eq!(sink.screenshots, ["annotated"]);
        assert_eq!(sink.captions[0].title, "Surface Note 1");
    }
}
