//! Stage 1 of the export pipeline: the live canvas becomes a portable,
//! venue-relative `SeatMap`.
//!
//! The walk only reads the canvas. Geometry is baked on copies, so the
//! document is left exactly as it was, and a failure yields no output.

use crate::canvas::{Canvas, CanvasObject};
use crate::error::{InvariantViolation, Result, violation};
use crate::model::SeatMapObject;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatMap {
    pub venue_id: String,
    pub width: f64,
    pub height: f64,
    pub sectors: Vec<SectorExport>,
    pub images: Vec<ImageExport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorExport {
    pub sector_id: String,
    pub seats: Vec<SeatExport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatExport {
    pub seat_id: String,
    pub seat_row: u32,
    pub seat_col: u32,
    pub seat_shape: SeatShape,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SeatShape {
    Circle {
        fill: String,
        cx: f64,
        cy: f64,
        r: f64,
    },
    Rectangle {
        fill: String,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rx: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ry: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        angle: Option<f64>,
    },
}

impl SeatShape {
    pub fn fill(&self) -> &str {
        match self {
            SeatShape::Circle { fill, .. } | SeatShape::Rectangle { fill, .. } => fill,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageExport {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    pub base64_jpeg: String,
}

/// Walk the canvas once and produce its `SeatMap`.
///
/// A top-level seat or a decorative shape aborts the export: finished
/// documents only hold sectors and background images.
pub fn export_seat_map(canvas: &Canvas) -> Result<SeatMap> {
    let venue = canvas.venue();
    let reference = venue.origin();
    let mut sectors = Vec::new();
    let mut images = Vec::new();

    for object in canvas.objects() {
        match object {
            CanvasObject::Sector(sector) => sectors.push(sector.export(reference)),
            CanvasObject::Image(image) => images.push(image.export(reference)),
            CanvasObject::Seat(seat) => {
                return Err(violation(InvariantViolation::LooseSeat(seat.id())));
            }
            CanvasObject::Shape(shape) => {
                return Err(violation(InvariantViolation::UnsupportedObject {
                    id: shape.id(),
                    kind: shape.kind().as_str(),
                }));
            }
        }
    }

    log::info!(
        "exported venue `{}`: {} sector(s), {} image(s)",
        venue.venue_id(),
        sectors.len(),
        images.len()
    );
    Ok(SeatMap {
        venue_id: venue.venue_id().to_string(),
        width: venue.width(),
        height: venue.height(),
        sectors,
        images,
    })
}

impl SeatMap {
    /// Download name for this map.
    pub fn file_name(&self) -> String {
        format!("venue_{}.json", self.venue_id)
    }

    /// Four-space indented JSON, as submitted and saved.
    pub fn to_pretty_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        // serde_json only ever writes UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn seat_count(&self) -> usize {
        self.sectors.iter().map(|s| s.seats.len()).sum()
    }
}
