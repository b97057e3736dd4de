//! Stage 2 of the export pipeline: `SeatMap` → markup tags + mapping table.
//!
//! Every seat becomes one SVG tag whose `id` is the seat id, and one mapping
//! row under the same id. Interactive previews look up
//! `element id → mapping row`, so both are produced in the same pass.
//! Output is a pure function of the input map.

use crate::export::{ImageExport, SeatExport, SeatMap, SeatShape};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedSeatMap {
    pub venue: RenderedVenue,
    pub seats: Vec<String>,
    pub images: Vec<String>,
    pub mapping: Vec<SeatMapping>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedVenue {
    pub venue_id: String,
    pub div_element_width: f64,
    pub div_element_height: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatMapping {
    pub seat_id: String,
    pub seat_row: u32,
    pub seat_col: u32,
    pub sector_id: String,
}

pub fn render_seat_map(map: &SeatMap) -> RenderedSeatMap {
    let mut seats = Vec::with_capacity(map.seat_count());
    let mut mapping = Vec::with_capacity(map.seat_count());

    for sector in &map.sectors {
        for seat in &sector.seats {
            seats.push(seat_tag(seat));
            mapping.push(SeatMapping {
                seat_id: seat.seat_id.clone(),
                seat_row: seat.seat_row,
                seat_col: seat.seat_col,
                sector_id: sector.sector_id.clone(),
            });
        }
    }

    RenderedSeatMap {
        venue: RenderedVenue {
            venue_id: map.venue_id.clone(),
            div_element_width: map.width,
            div_element_height: map.height,
        },
        seats,
        images: map.images.iter().map(image_tag).collect(),
        mapping,
    }
}

/// One `<circle>` or `<rect>` addressed by the seat id.
pub fn seat_tag(seat: &SeatExport) -> String {
    let id = escape_attr(&seat.seat_id);
    match &seat.seat_shape {
        SeatShape::Circle { fill, cx, cy, r } => {
            format!(
                r#"<circle id="{id}" cx="{cx}" cy="{cy}" r="{r}" fill="{}"/>"#,
                escape_attr(fill)
            )
        }
        SeatShape::Rectangle {
            fill,
            x,
            y,
            width,
            height,
            rx,
            ry,
            angle,
        } => {
            let mut tag =
                format!(r#"<rect id="{id}" x="{x}" y="{y}" width="{width}" height="{height}""#);
            if let Some(rx) = rx {
                let _ = write!(tag, r#" rx="{rx}""#);
            }
            if let Some(ry) = ry {
                let _ = write!(tag, r#" ry="{ry}""#);
            }
            let _ = write!(tag, r#" fill="{}""#, escape_attr(fill));
            if let Some(a) = angle {
                let _ = write!(tag, r#" transform="rotate({a} {x} {y})""#);
            }
            tag.push_str("/>");
            tag
        }
    }
}

pub fn image_tag(image: &ImageExport) -> String {
    let ImageExport {
        x,
        y,
        width,
        height,
        angle,
        base64_jpeg,
    } = image;
    let mut tag = format!(r#"<image x="{x}" y="{y}" width="{width}" height="{height}""#);
    if let Some(a) = angle {
        let _ = write!(tag, r#" transform="rotate({a} {x} {y})""#);
    }
    let _ = write!(
        tag,
        r#" href="data:image/jpeg;base64,{}"/>"#,
        escape_attr(base64_jpeg)
    );
    tag
}

/// Standalone `<svg>` preview sized to the venue: images first, seats on top.
pub fn html_preview(rendered: &RenderedSeatMap) -> String {
    let mut out = String::with_capacity(256 + rendered.seats.len() * 96);
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" data-venue-id="{}" style="width:{}px; height:{}px; border: 2px dashed;">"#,
        escape_attr(&rendered.venue.venue_id),
        rendered.venue.div_element_width,
        rendered.venue.div_element_height
    );
    for tag in rendered.images.iter().chain(&rendered.seats) {
        out.push_str("  ");
        out.push_str(tag);
        out.push('\n');
    }
    out.push_str("</svg>\n");
    out
}

fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
