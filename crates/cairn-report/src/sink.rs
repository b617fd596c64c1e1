//! Report output sinks.

use std::fs;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use serde::Serialize;

use crate::caption::{Caption, ImageLayout};
use crate::error::{ReportError, Result};

/// Receives the assembled report piece by piece.
///
/// The runner calls `begin_object` / `end_object` around each report
/// object and `finish` once at the end of the batch. Warnings carry
/// non-fatal problems like a missing linked illustration.
pub trait DocumentSink {
    /// Starts a new report object.
    fn begin_object(&mut self, name: &str) -> Result<()>;

    /// Adds a marked screenshot under a label such as a viewpoint name.
    fn screenshot(&mut self, label: &str, image: &RgbaImage) -> Result<()>;

    /// Adds one note's caption.
    fn caption(&mut self, caption: &Caption) -> Result<()>;

    /// Adds a linked illustration with its page layout.
    fn linked_image(&mut self, image: &RgbaImage, layout: ImageLayout) -> Result<()>;

    /// Records a non-fatal problem with the current object.
    fn warning(&mut self, message: &str);

    /// Closes the current report object.
    fn end_object(&mut self) -> Result<()>;

    /// Flushes the whole report.
    fn finish(&mut self) -> Result<()>;
}

#[derive(Debug, Serialize)]
struct LinkedImageRecord {
    file: String,
    layout: ImageLayout,
}

#[derive(Debug, Serialize)]
struct ObjectRecord {
    name: String,
    screenshots: Vec<String>,
    captions: Vec<Caption>,
    linked_images: Vec<LinkedImageRecord>,
    warnings: Vec<String>,
}

/// A sink writing PNG screenshots plus a `manifest.json` into an
/// output directory, one subdirectory per object.
pub struct JsonSink {
    out_dir: PathBuf,
    objects: Vec<ObjectRecord>,
    current: Option<ObjectRecord>,
}

impl JsonSink {
    /// Creates a sink rooted at `out_dir`, creating the directory.
    pub fn create(out_dir: impl Into<PathBuf>) -> Result<Self> {
        let out_dir = out_dir.into();
        fs::create_dir_all(&out_dir).map_err(|source| ReportError::Write {
            path: out_dir.clone(),
            source,
        })?;
        Ok(JsonSink {
            out_dir,
            objects: Vec::new(),
            current: None,
        })
    }

    fn current(&mut self) -> &mut ObjectRecord {
        // begin_object precedes every other call in the runner.
        self.current.get_or_insert_with(|| ObjectRecord {
            name: "unnamed".to_string(),
            screenshots: Vec::new(),
            captions: Vec::new(),
            linked_images: Vec::new(),
            warnings: Vec::new(),
        })
    }

    fn object_dir(&self) -> PathBuf {
        let name = self
            .current
            .as_ref()
            .map(|o| o.name.as_str())
            .unwrap_or("unnamed");
        self.out_dir.join(sanitize(name))
    }

    fn save_png(&self, path: &Path, image: &RgbaImage) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ReportError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        image.save(path).map_err(|source| ReportError::Encode {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' {
            c
        } else {
            '_'
        })
        .collect()
}

impl DocumentSink for JsonSink {
    fn begin_object(&mut self, name: &str) -> Result<()> {
        self.current = Some(ObjectRecord {
            name: name.to_string(),
            screenshots: Vec::new(),
            captions: Vec::new(),
            linked_images: Vec::new(),
            warnings: Vec::new(),
        });
        Ok(())
    }

    fn screenshot(&mut self, label: &str, image: &RgbaImage) -> Result<()> {
        let file = format!("{}.png", sanitize(label));
        let path = self.object_dir().join(&file);
        self.save_png(&path, image)?;
        self.current().screenshots.push(file);
        Ok(())
    }

    fn caption(&mut self, caption: &Caption) -> Result<()> {
        self.current().captions.push(caption.clone());
        Ok(())
    }

    fn linked_image(&mut self, image: &RgbaImage, layout: ImageLayout) -> Result<()> {
        let index = self.current().linked_images.len();
        let file = format!("linked_{index}.png");
        let path = self.object_dir().join(&file);
        self.save_png(&path, image)?;
        self.current()
            .linked_images
            .push(LinkedImageRecord { file, layout });
        Ok(())
    }

    fn warning(&mut self, message: &str) {
        self.current().warnings.push(message.to_string());
    }

    fn end_object(&mut self) -> Result<()> {
        if let Some(record) = self.current.take() {
            self.objects.push(record);
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let path = self.out_dir.join("manifest.json");
        let json = serde_json::to_string_pretty(&self.objects)?;
        fs::write(&path, json).map_err(|source| ReportError::Write { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("cairn-sink-{}-{tag}", std::process::id()))
    }

    #[test]
    fn json_sink_writes_screenshots_and_manifest() {
        let dir = scratch_dir("basic");
        let mut sink = JsonSink::create(&dir).unwrap();
        sink.begin_object("amphora").unwrap();
        let img = RgbaImage::new(8, 8);
        sink.screenshot("front", &img).unwrap();
        sink.caption(&Caption {
            number: 1,
            title: "Point Note 1".to_string(),
            category: "Other".to_string(),
            body: "rim chip".to_string(),
        })
        .unwrap();
        sink.warning("linked image missing");
        sink.end_object().unwrap();
        sink.finish().unwrap();

        assert!(dir.join("amphora/front.png").is_file());
        let manifest = std::fs::read_to_string(dir.join("manifest.json")).unwrap();
        assert!(manifest.contains("Point Note 1"));
        assert!(manifest.contains("linked image missing"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn object_names_are_sanitized_for_paths() {
        assert_eq!(sanitize("vessel #2 (side)"), "vessel__2__side_");
    }
}
