//! Editor configuration.
//!
//! Every field has a default, so an empty JSON object (or no file at all)
//! yields the stock editor.

use crate::error::Result;
use crate::model::Color;
use serde::{Deserialize, Serialize};

/// Fill given to new sectors and their seats.
pub fn default_fill() -> Color {
    Color::rgba(131.0 / 255.0, 195.0 / 255.0, 184.0 / 255.0, 1.0)
}

/// Canvas background while a sector is decomposed.
pub const EDITING_BACKGROUND: &str = "#D9D9D9";
/// Canvas background otherwise.
pub const DEFAULT_BACKGROUND: &str = "#F2F2F2";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Fill for newly drawn sectors.
    pub default_fill: Color,
    /// Opacity of the objects dimmed while a sector is being edited.
    pub editing_dim_opacity: f64,
    /// Upper bound (exclusive) of the random offset applied to each paste.
    pub paste_jitter: f64,
    /// Venue size as a fraction of the initial viewport.
    pub venue_width_ratio: f64,
    pub venue_height_ratio: f64,
    /// Smallest sector the drawing tool accepts, in seats.
    pub min_sector_rows: u32,
    pub min_sector_cols: u32,
    /// Largest sector the drawing tool accepts, in seats.
    pub max_sector_rows: u32,
    pub max_sector_cols: u32,
    pub submission: SubmissionConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_fill: default_fill(),
            editing_dim_opacity: 0.35,
            paste_jitter: 20.0,
            venue_width_ratio: 0.7,
            venue_height_ratio: 0.8,
            min_sector_rows: 1,
            min_sector_cols: 1,
            max_sector_rows: 200,
            max_sector_cols: 200,
            submission: SubmissionConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct SubmissionConfig {
    /// Seat-map ingestion endpoint receiving the POSTed `SeatMap`.
    pub endpoint: String,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/seatmap".to_string(),
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
