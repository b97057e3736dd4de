//! Superseded export formats, derived from the canonical `SeatMap` for
//! consumers that still read them.
//!
//! The field sets follow what older consumers expect and are not guaranteed
//! to evolve with the canonical pipeline.

use crate::export::{SeatMap, SeatShape};
use crate::render::{image_tag, seat_tag};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyVenue {
    pub id: String,
    pub width: f64,
    pub height: f64,
}

/// Tags plus a mapping table with the fill inlined per row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyBundle {
    pub venue: LegacyVenue,
    pub seats: Vec<String>,
    pub images: Vec<String>,
    pub mapping: Vec<LegacyMapping>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyMapping {
    pub id: String,
    pub row: u32,
    pub col: u32,
    pub fill: String,
    pub sector_id: String,
}

/// Geometry only, no tags. Circle seats only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressedSeatMap {
    pub venue: LegacyVenue,
    pub seats: Vec<CompressedSeat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressedSeat {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub fill: String,
    pub seat_id: String,
    pub seat_row: u32,
    pub seat_col: u32,
    pub sector_id: String,
}

fn legacy_venue(map: &SeatMap) -> LegacyVenue {
    LegacyVenue {
        id: map.venue_id.clone(),
        width: map.width,
        height: map.height,
    }
}

pub fn to_legacy_bundle(map: &SeatMap) -> LegacyBundle {
    let mut seats = Vec::with_capacity(map.seat_count());
    let mut mapping = Vec::with_capacity(map.seat_count());
    for sector in &map.sectors {
        for seat in &sector.seats {
            seats.push(seat_tag(seat));
            mapping.push(LegacyMapping {
                id: seat.seat_id.clone(),
                row: seat.seat_row,
                col: seat.seat_col,
                fill: seat.seat_shape.fill().to_string(),
                sector_id: sector.sector_id.clone(),
            });
        }
    }
    LegacyBundle {
        venue: legacy_venue(map),
        seats,
        images: map.images.iter().map(image_tag).collect(),
        mapping,
    }
}

pub fn to_compressed(map: &SeatMap) -> CompressedSeatMap {
    let mut seats = Vec::new();
    for sector in &map.sectors {
        for seat in &sector.seats {
            match &seat.seat_shape {
                SeatShape::Circle { fill, cx, cy, r } => seats.push(CompressedSeat {
                    cx: *cx,
                    cy: *cy,
                    r: *r,
                    fill: fill.clone(),
                    seat_id: seat.seat_id.clone(),
                    seat_row: seat.seat_row,
                    seat_col: seat.seat_col,
                    sector_id: sector.sector_id.clone(),
                }),
                SeatShape::Rectangle { .. } => {
                    log::warn!(
                        "compressed export skips rectangle seat {} in sector `{}`",
                        seat.seat_id,
                        sector.sector_id
                    );
                }
            }
        }
    }
    CompressedSeatMap {
        venue: legacy_venue(map),
        seats,
    }
}

/// The preview markup older consumers produced from the compressed form.
pub fn compressed_preview(map: &CompressedSeatMap) -> String {
    let mut html = format!(
        "<svg style=\"width:{}px; height:{}px; border: 2px dashed;\">\n",
        map.venue.width, map.venue.height
    );
    for seat in &map.seats {
        html.push_str(&format!(
            "<circle id=\"{}\" r=\"{}\" cx=\"{}\" cy=\"{}\" fill=\"{}\" />\n",
            seat.seat_id, seat.r, seat.cx, seat.cy, seat.fill
        ));
    }
    html.push_str("</svg>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{SeatExport, SectorExport};
    use pretty_assertions::assert_eq;

    fn map() -> SeatMap {
        let seat = |id: &str, shape| SeatExport {
            seat_id: id.into(),
            seat_row: 1,
            seat_col: 1,
            seat_shape: shape,
        };
        SeatMap {
            venue_id: "v".into(),
            width: 100.0,
            height: 50.0,
            sectors: vec![SectorExport {
                sector_id: "B".into(),
                seats: vec![
                    seat(
                        "c",
                        SeatShape::Circle {
                            fill: "#111111".into(),
                            cx: 5.0,
                            cy: 6.0,
                            r: 20.0,
                        },
                    ),
                    seat(
                        "r",
                        SeatShape::Rectangle {
                            fill: "#222222".into(),
                            x: 0.0,
                            y: 0.0,
                            width: 40.0,
                            height: 40.0,
                            rx: None,
                            ry: None,
                            angle: None,
                        },
                    ),
                ],
            }],
            images: vec![],
        }
    }

    #[test]
    fn bundle_inlines_fill() {
        let bundle = to_legacy_bundle(&map());
        assert_eq!(bundle.seats.len(), 2);
        assert_eq!(bundle.mapping[1].fill, "#222222");
        assert_eq!(bundle.mapping[1].id, "r");
        let json = serde_json::to_value(&bundle).unwrap();
        assert_eq!(json["mapping"][0]["sectorId"], "B");
        assert_eq!(json["venue"]["id"], "v");
    }

    #[test]
    fn compressed_keeps_circles_only() {
        let compressed = to_compressed(&map());
        assert_eq!(compressed.seats.len(), 1);
        assert_eq!(compressed.seats[0].seat_id, "c");
        assert_eq!(compressed.seats[0].sector_id, "B");

        let html = compressed_preview(&compressed);
        assert!(html.contains(r##"<circle id="c" r="20" cx="5" cy="6" fill="#111111" />"##));
    }
}
