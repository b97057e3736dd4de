//! The live document: one venue plus an ordered list of top-level objects.
//!
//! List order is z-order (first = back). The venue lives outside the list,
//! so walks over `objects` (copy, delete, export) never see it.

use crate::error::{InvariantViolation, Result, violation};
use crate::id::ObjectId;
use crate::model::{ObjectBase, ObjectKind, SeatMapObject};
use crate::seat::Seat;
use crate::sector::Sector;
use crate::shapes::{BackgroundImage, Shape};
use crate::venue::Venue;
use kurbo::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CanvasObject {
    Sector(Sector),
    Seat(Seat),
    Image(BackgroundImage),
    Shape(Shape),
}

impl CanvasObject {
    pub fn as_object(&self) -> &dyn SeatMapObject {
        match self {
            CanvasObject::Sector(s) => s,
            CanvasObject::Seat(s) => s,
            CanvasObject::Image(i) => i,
            CanvasObject::Shape(s) => s,
        }
    }

    pub fn as_object_mut(&mut self) -> &mut dyn SeatMapObject {
        match self {
            CanvasObject::Sector(s) => s,
            CanvasObject::Seat(s) => s,
            CanvasObject::Image(i) => i,
            CanvasObject::Shape(s) => s,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.as_object().id()
    }

    pub fn kind(&self) -> ObjectKind {
        self.as_object().kind()
    }

    pub fn base(&self) -> &ObjectBase {
        self.as_object().base()
    }

    pub fn base_mut(&mut self) -> &mut ObjectBase {
        self.as_object_mut().base_mut()
    }

    pub fn move_by(&mut self, delta: Vec2) {
        self.as_object_mut().move_by(delta);
    }

    pub fn as_sector(&self) -> Option<&Sector> {
        match self {
            CanvasObject::Sector(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_seat(&self) -> Option<&Seat> {
        match self {
            CanvasObject::Seat(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Sector> for CanvasObject {
    fn from(s: Sector) -> Self {
        CanvasObject::Sector(s)
    }
}

impl From<Seat> for CanvasObject {
    fn from(s: Seat) -> Self {
        CanvasObject::Seat(s)
    }
}

impl From<BackgroundImage> for CanvasObject {
    fn from(i: BackgroundImage) -> Self {
        CanvasObject::Image(i)
    }
}

impl From<Shape> for CanvasObject {
    fn from(s: Shape) -> Self {
        CanvasObject::Shape(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    venue: Venue,
    objects: Vec<CanvasObject>,
}

impl Canvas {
    pub fn new(venue: Venue) -> Self {
        Self {
            venue,
            objects: Vec::new(),
        }
    }

    pub fn venue(&self) -> &Venue {
        &self.venue
    }

    pub fn venue_mut(&mut self) -> &mut Venue {
        &mut self.venue
    }

    pub fn objects(&self) -> &[CanvasObject] {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> impl Iterator<Item = &mut CanvasObject> {
        self.objects.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Add on top of the z-order.
    pub fn add(&mut self, object: impl Into<CanvasObject>) -> ObjectId {
        let object = object.into();
        let id = object.id();
        log::debug!("canvas: add {} {id}", object.kind().as_str());
        self.objects.push(object);
        id
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<CanvasObject> {
        let pos = self.position(id)?;
        Some(self.objects.remove(pos))
    }

    pub fn position(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id() == id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.position(id).is_some()
    }

    pub fn is_venue(&self, id: ObjectId) -> bool {
        self.venue.id() == id
    }

    pub fn get(&self, id: ObjectId) -> Option<&CanvasObject> {
        self.objects.iter().find(|o| o.id() == id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut CanvasObject> {
        self.objects.iter_mut().find(|o| o.id() == id)
    }

    /// Shared access to any object on the surface, venue included.
    pub fn object(&self, id: ObjectId) -> Option<&dyn SeatMapObject> {
        if self.is_venue(id) {
            return Some(&self.venue);
        }
        self.get(id).map(CanvasObject::as_object)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut dyn SeatMapObject> {
        if self.is_venue(id) {
            return Some(&mut self.venue);
        }
        self.get_mut(id).map(CanvasObject::as_object_mut)
    }

    pub fn sector(&self, id: ObjectId) -> Result<&Sector> {
        match self.get(id) {
            Some(CanvasObject::Sector(s)) => Ok(s),
            Some(_) => Err(violation(InvariantViolation::NotASector(id))),
            None => Err(violation(InvariantViolation::UnknownObject(id))),
        }
    }

    pub fn sector_mut(&mut self, id: ObjectId) -> Result<&mut Sector> {
        match self.get_mut(id) {
            Some(CanvasObject::Sector(s)) => Ok(s),
            Some(_) => Err(violation(InvariantViolation::NotASector(id))),
            None => Err(violation(InvariantViolation::UnknownObject(id))),
        }
    }

    /// Edit a seat on the canvas, loose or inside a sector. A seat inside a
    /// sector keeps its position under the sector's current gaps. `None` if
    /// no such seat exists.
    pub fn edit_seat<R>(
        &mut self,
        id: ObjectId,
        edit: impl FnOnce(&mut Seat) -> Result<R>,
    ) -> Option<Result<R>> {
        let owner = self.objects.iter_mut().find(|o| match o {
            CanvasObject::Seat(s) => s.id() == id,
            CanvasObject::Sector(sector) => sector.seats().iter().any(|s| s.id() == id),
            _ => false,
        })?;
        match owner {
            CanvasObject::Seat(seat) => Some(edit(seat)),
            CanvasObject::Sector(sector) => sector.edit_seat(id, edit),
            _ => None,
        }
    }

    // ─── Z-order ─────────────────────────────────────────────────────────

    /// Move one step backward. Returns true if the order changed.
    pub fn send_backward(&mut self, id: ObjectId) -> bool {
        match self.position(id) {
            Some(pos) if pos > 0 => self.reorder(pos, pos - 1),
            _ => false,
        }
    }

    /// Move one step forward. Returns true if the order changed.
    pub fn bring_forward(&mut self, id: ObjectId) -> bool {
        match self.position(id) {
            Some(pos) if pos + 1 < self.objects.len() => self.reorder(pos, pos + 1),
            _ => false,
        }
    }

    pub fn send_to_back(&mut self, id: ObjectId) -> bool {
        match self.position(id) {
            Some(pos) if pos > 0 => self.reorder(pos, 0),
            _ => false,
        }
    }

    pub fn bring_to_front(&mut self, id: ObjectId) -> bool {
        let last = self.objects.len().saturating_sub(1);
        match self.position(id) {
            Some(pos) if pos < last => self.reorder(pos, last),
            _ => false,
        }
    }

    fn reorder(&mut self, from: usize, to: usize) -> bool {
        let object = self.objects.remove(from);
        self.objects.insert(to, object);
        true
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Color, ShapeKind};
    use crate::sector::SectorSpec;
    use pretty_assertions::assert_eq;

    fn canvas() -> Canvas {
        Canvas::new(Venue::new("v", 500.0, 400.0).unwrap())
    }

    fn sector(rows: u32) -> Sector {
        Sector::new(SectorSpec {
            rows,
            cols: 1,
            ..SectorSpec::default()
        })
        .unwrap()
    }

    #[test]
    fn add_get_remove() {
        let mut c = canvas();
        let id = c.add(sector(2));
        assert!(c.contains(id));
        assert_eq!(c.sector(id).unwrap().seats().len(), 2);
        assert!(c.remove(id).is_some());
        assert!(c.is_empty());
        assert!(c.sector(id).unwrap_err().is_fatal());
    }

    #[test]
    fn venue_is_not_an_object() {
        let c = canvas();
        let venue_id = c.venue().id();
        assert!(!c.contains(venue_id));
        assert!(c.object(venue_id).is_some());
    }

    #[test]
    fn sector_lookup_checks_kind() {
        let mut c = canvas();
        let seat = Seat::new(ShapeKind::Circle, 1, 1, 0.0, 0.0, Color::rgba(0.0, 0.0, 0.0, 1.0));
        let id = c.add(seat);
        assert!(matches!(
            c.sector(id),
            Err(crate::SeatMapError::Invariant(InvariantViolation::NotASector(_)))
        ));
    }

    #[test]
    fn seat_lookup_reaches_into_sectors() {
        let mut c = canvas();
        let s = sector(3);
        let seat_id = s.seats()[2].id();
        c.add(s);
        let row = c.edit_seat(seat_id, |s| Ok(s.row()));
        assert!(matches!(row, Some(Ok(3))));
        assert!(c.edit_seat(ObjectId::new(), |s| Ok(s.row())).is_none());
    }

    #[test]
    fn z_order() {
        let mut c = canvas();
        let a = c.add(sector(1));
        let b = c.add(sector(1));
        let d = c.add(sector(1));
        let order = |c: &Canvas| c.objects().iter().map(|o| o.id()).collect::<Vec<_>>();

        assert!(c.bring_to_front(a));
        assert_eq!(order(&c), vec![b, d, a]);
        assert!(!c.bring_forward(a));
        assert!(c.send_to_back(a));
        assert_eq!(order(&c), vec![a, b, d]);
        assert!(c.bring_forward(a));
        assert_eq!(order(&c), vec![b, a, d]);
        assert!(c.send_backward(d));
        assert_eq!(order(&c), vec![b, d, a]);
        assert!(!c.send_backward(b));
    }

    #[test]
    fn document_roundtrip() {
        let mut c = canvas();
        c.add(sector(2));
        c.add(BackgroundImage::new(vec![9, 9], 1.0, 2.0, 3.0, 4.0));
        let back = Canvas::from_json(&c.to_json().unwrap()).unwrap();
        assert_eq!(back, c);
    }
}
