//! Editing mode: a sector temporarily decomposed into loose seats.
//!
//! Entering takes the single selected sector off the canvas and puts an
//! independent copy of each of its seats in its place, dimming and locking
//! everything else. Leaving gathers the surviving seats back into a fresh
//! sector. The session is an explicit value; there is no ambient state.
//!
//! ```text
//!   Viewing ──toggle (one sector selected)──▶ Editing(session)
//!      ▲                                          │
//!      └──────────────toggle─────────────────────┘
//! ```

use seatmap_core::error::{InvariantViolation, Result, violation};
use seatmap_core::{
    Appearance, Canvas, CanvasObject, EditorConfig, ObjectId, SeatMapObject, Sector, SectorSpec,
};

/// Bookkeeping while a sector is decomposed.
#[derive(Debug, Clone, PartialEq)]
pub struct EditingSession {
    /// The sector as it was before entering.
    original: Sector,
    /// Seats to gather on exit, in insertion order.
    seats: Vec<ObjectId>,
}

impl EditingSession {
    pub fn original(&self) -> &Sector {
        &self.original
    }

    pub fn seat_ids(&self) -> &[ObjectId] {
        &self.seats
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.seats.contains(&id)
    }

    /// A seat added mid-edit (e.g. pasted) that should join the sector.
    pub fn register_seat(&mut self, id: ObjectId) {
        if !self.contains(id) {
            self.seats.push(id);
        }
    }

    /// Must run for every removal while editing, before the session ends.
    pub fn on_object_removed(&mut self, id: ObjectId) -> bool {
        let before = self.seats.len();
        self.seats.retain(|s| *s != id);
        before != self.seats.len()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditMode {
    #[default]
    Viewing,
    Editing(EditingSession),
}

/// What a toggle did.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Now editing; these seat copies replaced the sector.
    Entered { seats: Vec<ObjectId> },
    /// Back to viewing; this sector holds the surviving seats.
    Exited { sector: ObjectId },
}

impl EditMode {
    pub fn is_editing(&self) -> bool {
        matches!(self, EditMode::Editing(_))
    }

    pub fn session(&self) -> Option<&EditingSession> {
        match self {
            EditMode::Editing(s) => Some(s),
            EditMode::Viewing => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut EditingSession> {
        match self {
            EditMode::Editing(s) => Some(s),
            EditMode::Viewing => None,
        }
    }

    /// Switch state. On error nothing on the canvas has changed.
    pub fn toggle(
        &mut self,
        canvas: &mut Canvas,
        selection: &[ObjectId],
        config: &EditorConfig,
    ) -> Result<Transition> {
        let (next, transition) = match self {
            EditMode::Viewing => {
                let session = enter(canvas, selection, config)?;
                let seats = session.seats.clone();
                (EditMode::Editing(session), Transition::Entered { seats })
            }
            EditMode::Editing(session) => {
                let sector = exit(session, canvas)?;
                (EditMode::Viewing, Transition::Exited { sector })
            }
        };
        *self = next;
        Ok(transition)
    }

    /// Leave editing mode. Fails when not editing.
    pub fn exit(&mut self, canvas: &mut Canvas) -> Result<ObjectId> {
        let EditMode::Editing(session) = self else {
            return Err(violation(InvariantViolation::NotEditing));
        };
        let sector = exit(session, canvas)?;
        *self = EditMode::Viewing;
        Ok(sector)
    }
}

/// Decompose the one selected sector into loose seats.
pub fn enter(
    canvas: &mut Canvas,
    selection: &[ObjectId],
    config: &EditorConfig,
) -> Result<EditingSession> {
    let &[id] = selection else {
        return Err(violation(InvariantViolation::NoSectorSelected {
            selected: selection.len(),
        }));
    };
    let original = match canvas.get(id) {
        Some(CanvasObject::Sector(sector)) => sector.clone(),
        Some(_) => return Err(violation(InvariantViolation::NotASector(id))),
        None => return Err(violation(InvariantViolation::NoSectorSelected { selected: 0 })),
    };
    canvas.remove(id);

    let dimmed = Appearance::dimmed(config.editing_dim_opacity);
    for object in canvas.objects_mut() {
        object.base_mut().appearance = dimmed;
    }
    let venue = &mut canvas.venue_mut().base_mut().appearance;
    venue.visible = false;
    venue.selectable = false;
    venue.evented = false;

    let mut seats = Vec::with_capacity(original.seats().len());
    for baked in original.baked_seats() {
        let copy = baked.detached_copy();
        seats.push(canvas.add(copy));
    }

    log::info!(
        "editing sector `{}`: {} seat(s) decomposed",
        original.sector_id(),
        seats.len()
    );
    Ok(EditingSession { original, seats })
}

/// Gather the session's seats into a new, hand-edited sector and restore
/// the rest of the canvas.
pub fn exit(session: &EditingSession, canvas: &mut Canvas) -> Result<ObjectId> {
    if let Some(missing) = session
        .seats
        .iter()
        .find(|id| !matches!(canvas.get(**id), Some(CanvasObject::Seat(_))))
    {
        return Err(violation(InvariantViolation::MissingEditingSeat(*missing)));
    }

    let original = session.original.spec();
    let mut sector = Sector::new(SectorSpec {
        rows: 0,
        cols: 0,
        angle: 0.0,
        ..original
    })?;

    for id in &session.seats {
        if let Some(CanvasObject::Seat(seat)) = canvas.remove(*id) {
            sector.add_seat_with_update(seat);
        }
    }

    for object in canvas.objects_mut() {
        object.base_mut().appearance = Appearance::default();
    }
    canvas.venue_mut().base_mut().appearance = Appearance::default();

    log::info!(
        "editing done: sector `{}` recomposed with {} seat(s)",
        sector.sector_id(),
        sector.seats().len()
    );
    Ok(canvas.add(sector))
}
