use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use seatmap_core::legacy::{to_compressed, to_legacy_bundle};
use seatmap_core::{Canvas, export_seat_map};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// `venue_{id}.json`, the submission format
    #[default]
    Seatmap,
    /// Venue, seat markup, images, and mapping in one bundle
    Legacy,
    /// Circle seats only, flattened
    Compressed,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Saved editor document (JSON)
    pub document: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub out_dir: PathBuf,

    #[arg(short, long, value_enum, default_value_t = ExportFormat::Seatmap)]
    pub format: ExportFormat,

    /// Print to stdout instead of writing a file
    #[arg(long)]
    pub stdout: bool,
}

pub fn export(args: ExportArgs) -> Result<()> {
    let (file_name, json) = export_document(&args.document, args.format)?;
    if args.stdout {
        println!("{json}");
        return Ok(());
    }

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("cannot create {}", args.out_dir.display()))?;
    let out = args.out_dir.join(file_name);
    fs::write(&out, json).with_context(|| format!("cannot write {}", out.display()))?;
    log::info!("wrote {}", out.display());
    println!("  ✓ {} → {}", args.document.display(), out.display());
    Ok(())
}

/// Output file name and contents for a document.
fn export_document(document: &Path, format: ExportFormat) -> Result<(String, String)> {
    let source = fs::read_to_string(document)
        .with_context(|| format!("cannot read document {}", document.display()))?;
    let canvas = Canvas::from_json(&source)?;
    let map = export_seat_map(&canvas)?;
    log::debug!(
        "exported {} sector(s), {} seat(s)",
        map.sectors.len(),
        map.seat_count()
    );

    let stem = format!("venue_{}", map.venue_id);
    Ok(match format {
        ExportFormat::Seatmap => (map.file_name(), map.to_pretty_json()?),
        ExportFormat::Legacy => (
            format!("{stem}.legacy.json"),
            serde_json::to_string_pretty(&to_legacy_bundle(&map))?,
        ),
        ExportFormat::Compressed => (
            format!("{stem}.compressed.json"),
            serde_json::to_string_pretty(&to_compressed(&map))?,
        ),
    })
}
