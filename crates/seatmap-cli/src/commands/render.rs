use super::read_seat_map;
use anyhow::{Context, Result};
use clap::Args;
use seatmap_core::{html_preview, render_seat_map};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Seat-map file produced by `export`
    pub seat_map: PathBuf,

    /// Also write a standalone HTML preview here
    #[arg(long)]
    pub html: Option<PathBuf>,
}

pub fn render(args: RenderArgs) -> Result<()> {
    let map = read_seat_map(&args.seat_map)?;
    let rendered = render_seat_map(&map);
    println!("{}", serde_json::to_string_pretty(&rendered)?);

    if let Some(path) = &args.html {
        fs::write(path, html_preview(&rendered))
            .with_context(|| format!("cannot write {}", path.display()))?;
        log::info!(
            "preview with {} seat(s) written to {}",
            rendered.seats.len(),
            path.display()
        );
    }
    Ok(())
}
