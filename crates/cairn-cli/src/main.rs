//! cairn CLI - report generation for annotated 3D models
//!
//! Sweeps annotated models through the six canonical viewpoints, burns
//! numbered markers into the screenshots and writes a report manifest.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cairn_anno::{Category, Note, Note2d};
use cairn_mesh::stl::read_binary_stl;
use cairn_report::{generate, JsonSink, ObjectSource, ReportObject, ReportOptions};

#[derive(Parser)]
#[command(name = "cairn")]
#[command(about = "Report generator for annotated 3D models", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sweep an annotated mesh and write marked screenshots plus a manifest
    Report {
        /// Model surface as binary STL
        #[arg(long)]
        mesh: PathBuf,
        /// Notes file (JSON array)
        #[arg(long)]
        notes: PathBuf,
        /// Output directory
        #[arg(long)]
        out: PathBuf,
        /// Screenshot width in pixels
        #[arg(long, default_value_t = 800)]
        width: u32,
        /// Screenshot height in pixels
        #[arg(long, default_value_t = 600)]
        height: u32,
        /// TrueType/OpenType font for marker numbers
        #[arg(long)]
        font: Option<PathBuf>,
        /// Only include notes in these categories (repeatable)
        #[arg(long = "category")]
        categories: Vec<String>,
    },
    /// Burn 2D region markers into an annotated image
    AnnotateImage {
        /// Source image
        #[arg(long)]
        image: PathBuf,
        /// Notes file (JSON array of 2D notes)
        #[arg(long)]
        notes: PathBuf,
        /// Output directory
        #[arg(long)]
        out: PathBuf,
        /// TrueType/OpenType font for marker numbers
        #[arg(long)]
        font: Option<PathBuf>,
    },
    /// Display note counts for a notes file
    Info {
        /// Notes file (JSON array)
        notes: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match Cli::parse().command {
        Commands::Report {
            mesh,
            notes,
            out,
            width,
            height,
            font,
            categories,
        } => run_report(mesh, notes, out, (width, height), font, categories),
        Commands::AnnotateImage {
            image,
            notes,
            out,
            font,
        } => run_annotate_image(image, notes, out, font),
        Commands::Info { notes } => show_info(&notes),
    }
}

fn run_report(
    mesh_path: PathBuf,
    notes_path: PathBuf,
    out: PathBuf,
    viewport: (u32, u32),
    font: Option<PathBuf>,
    categories: Vec<String>,
) -> Result<()> {
    let mesh = read_binary_stl(&mesh_path)
        .with_context(|| format!("reading mesh {}", mesh_path.display()))?;
    let notes: Vec<Note> = load_json(&notes_path)?;
    let name = object_name(&mesh_path);

    let options = ReportOptions {
        viewport: Some(viewport),
        categories: parse_categories(&categories)?,
        font: load_font(font)?,
    };
    let objects = [ReportObject {
        name,
        source: ObjectSource::Mesh { mesh, notes },
    }];
    let mut sink = JsonSink::create(&out)?;
    let summary = generate(&objects, &mut sink, &options)?;
    anyhow::ensure!(
        summary.objects_failed == 0,
        "{} of {} objects failed; see warnings in {}",
        summary.objects_failed,
        summary.objects_failed + summary.objects_ok,
        out.join("manifest.json").display()
    );
    println!("report written to {}", out.display());
    Ok(())
}

fn run_annotate_image(
    image_path: PathBuf,
    notes_path: PathBuf,
    out: PathBuf,
    font: Option<PathBuf>,
) -> Result<()> {
    let image = image::open(&image_path)
        .with_context(|| format!("reading image {}", image_path.display()))?
        .to_rgba8();
    let notes: Vec<Note2d> = load_json(&notes_path)?;
    let name = object_name(&image_path);

    let options = ReportOptions {
        font: load_font(font)?,
        ..Default::default()
    };
    let objects = [ReportObject {
        name,
        source: ObjectSource::Image2d { image, notes },
    }];
    let mut sink = JsonSink::create(&out)?;
    let summary = generate(&objects, &mut sink, &options)?;
    anyhow::ensure!(summary.objects_failed == 0, "annotation failed");
    println!("annotated image written to {}", out.display());
    Ok(())
}

fn show_info(notes_path: &PathBuf) -> Result<()> {
    let notes: Vec<Note> = load_json(notes_path)?;
    println!("{}: {} notes", notes_path.display(), notes.len());
    for category in Category::ALL {
        let count = notes.iter().filter(|n| n.category == category).count();
        if count > 0 {
            println!("  {:40} {}", category.full_name(), count);
        }
    }
    Ok(())
}

fn load_json<T: serde::de::DeserializeOwned>(path: &PathBuf) -> Result<T> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn load_font(path: Option<PathBuf>) -> Result<Option<Vec<u8>>> {
    match path {
        Some(p) => {
            let bytes =
                fs::read(&p).with_context(|| format!("reading font {}", p.display()))?;
            Ok(Some(bytes))
        }
        None => Ok(None),
    }
}

fn parse_categories(names: &[String]) -> Result<Option<Vec<Category>>> {
    if names.is_empty() {
        return Ok(None);
    }
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        let category: Category =
            serde_json::from_value(serde_json::Value::String(name.clone()))
                .with_context(|| format!("unknown category {name:?}"))?;
        out.push(category);
    }
    Ok(Some(out))
}

fn object_name(path: &PathBuf) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "object".to_string())
}
