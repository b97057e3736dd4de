//! Copy and paste.
//!
//! Copy snapshots the selected top-level objects into a MessagePack payload.
//! Paste rebuilds each object per kind, gives every pasted object (and
//! every nested seat or shape) a fresh id, and shifts the whole paste by one
//! random offset so it does not cover its source.

use crate::canvas::{Canvas, CanvasObject};
use crate::error::{InvariantViolation, Result, violation};
use crate::id::ObjectId;
use crate::model::SeatMapObject;
use crate::sector::Sector;
use kurbo::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClipboardPayload {
    objects: Vec<CanvasObject>,
}

impl ClipboardPayload {
    pub fn objects(&self) -> &[CanvasObject] {
        &self.objects
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(rmp_serde::to_vec_named(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(rmp_serde::from_slice(bytes)?)
    }
}

/// Snapshot `ids` in canvas order. The venue id is skipped; it is never
/// copyable.
pub fn copy(canvas: &Canvas, ids: &[ObjectId]) -> Result<ClipboardPayload> {
    if let Some(missing) = ids
        .iter()
        .find(|id| !canvas.is_venue(**id) && !canvas.contains(**id))
    {
        return Err(violation(InvariantViolation::UnknownObject(*missing)));
    }
    let objects: Vec<CanvasObject> = canvas
        .objects()
        .iter()
        .filter(|o| ids.contains(&o.id()))
        .cloned()
        .collect();
    log::debug!("clipboard: copied {} object(s)", objects.len());
    Ok(ClipboardPayload { objects })
}

/// One offset per paste, uniform in `[0, max)` on both axes.
pub fn paste_offset<R: Rng>(rng: &mut R, max: f64) -> Vec2 {
    if max > 0.0 {
        let d = rng.gen_range(0.0..max);
        Vec2::new(d, d)
    } else {
        Vec2::ZERO
    }
}

/// Fresh objects for a paste, shifted by `offset`.
pub fn paste(payload: &ClipboardPayload, offset: Vec2) -> Result<Vec<CanvasObject>> {
    payload
        .objects
        .iter()
        .map(|o| reconstruct(o, offset))
        .collect()
}

fn reconstruct(object: &CanvasObject, offset: Vec2) -> Result<CanvasObject> {
    let pasted = match object {
        CanvasObject::Sector(sector) => CanvasObject::Sector(rebuild_sector(sector, offset)?),
        CanvasObject::Seat(seat) => {
            let mut copy = seat.detached_copy();
            copy.translate(offset);
            CanvasObject::Seat(copy)
        }
        CanvasObject::Image(image) => {
            let mut copy = image.clone().with_fresh_id();
            copy.move_by(offset);
            CanvasObject::Image(copy)
        }
        CanvasObject::Shape(shape) => {
            let mut copy = shape.with_fresh_ids();
            copy.move_by(offset);
            CanvasObject::Shape(copy)
        }
    };
    Ok(pasted)
}

/// Rebuild through the constructor. A grid-authoritative sector regenerates
/// its seats; a hand-edited one gets fresh copies of its current seats.
fn rebuild_sector(source: &Sector, offset: Vec2) -> Result<Sector> {
    let mut spec = source.spec();
    spec.left += offset.x;
    spec.top += offset.y;

    let mut sector = Sector::new(spec)?;
    if !source.is_grid_authoritative() {
        sector.adopt_frame_seats(source.seats().iter().map(|s| {
            let mut seat = s.detached_copy();
            seat.translate(offset);
            seat
        }));
    }
    Ok(sector)
}
