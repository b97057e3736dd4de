mod export;
mod render;
mod submit;

pub use export::{ExportArgs, export};
pub use render::{RenderArgs, render};
pub use submit::{SubmitArgs, submit};

use anyhow::{Context, Result};
use seatmap_core::{EditorConfig, SeatMap};
use std::fs;
use std::path::Path;

pub fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    let Some(path) = path else {
        return Ok(EditorConfig::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("cannot read config {}", path.display()))?;
    EditorConfig::from_json(&json).with_context(|| format!("invalid config {}", path.display()))
}

/// Read a seat-map file produced by `export`.
pub fn read_seat_map(path: &Path) -> Result<SeatMap> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("cannot read seat map {}", path.display()))?;
    SeatMap::from_json(&json).with_context(|| format!("invalid seat map {}", path.display()))
}
