//! Sectors: named grids of seats.
//!
//! Seats are stored with absolute coordinates in the sector's unrotated
//! frame. The sector's rotation pivots on its origin (`left`, `top`) and is
//! applied on top of that frame when the sector is baked for export or
//! decomposed for editing. Each seat also remembers its gap-free grid
//! position; `left`/`top` are derived from it and the current gaps.
//!
//! `rows == 0 || cols == 0` marks a sector whose seats were placed by hand
//! (see [`Sector::is_grid_authoritative`]). Such a sector is never
//! regenerated procedurally.

use crate::error::{InvariantViolation, Rejection, Result, rejection, violation};
use crate::export::SectorExport;
use crate::id::ObjectId;
use crate::model::{
    Color, Label, ObjectBase, ObjectKind, SeatMapObject, ShapeKind, Transform, normalize_angle,
};
use crate::seat::{SEAT_SIZE, Seat};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Sector id used until the user names the sector.
pub const UNNAMED_SECTOR: &str = "NULL";

/// Constructor inputs. Everything a paste needs to rebuild a sector.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorSpec {
    pub shape: ShapeKind,
    pub sector_id: String,
    pub rows: u32,
    pub cols: u32,
    pub gap_x: f64,
    pub gap_y: f64,
    pub fill: Color,
    pub left: f64,
    pub top: f64,
    pub angle: f64,
}

impl Default for SectorSpec {
    fn default() -> Self {
        Self {
            shape: ShapeKind::Circle,
            sector_id: UNNAMED_SECTOR.to_string(),
            rows: 0,
            cols: 0,
            gap_x: 0.0,
            gap_y: 0.0,
            fill: crate::config::default_fill(),
            left: 0.0,
            top: 0.0,
            angle: 0.0,
        }
    }
}

/// One cell of a generated grid. `grid_x`/`grid_y` is the placement with
/// zero gaps; `x`/`y` adds `(col - 1) * gap_x` and `(row - 1) * gap_y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCell {
    pub row: u32,
    pub col: u32,
    pub grid_x: f64,
    pub grid_y: f64,
    pub x: f64,
    pub y: f64,
}

/// Seat placements for a `rows × cols` grid anchored at `origin`.
/// Pure: equal inputs always give equal cells, in row-major order.
pub fn grid_cells(rows: u32, cols: u32, gap_x: f64, gap_y: f64, origin: Point) -> Vec<GridCell> {
    let capacity = (rows as usize).saturating_mul(cols as usize);
    let mut cells = Vec::with_capacity(capacity);
    for row in 0..rows {
        for col in 0..cols {
            let grid_x = origin.x + f64::from(col) * SEAT_SIZE;
            let grid_y = origin.y + f64::from(row) * SEAT_SIZE;
            cells.push(GridCell {
                row: row + 1,
                col: col + 1,
                grid_x,
                grid_y,
                x: grid_x + f64::from(col) * gap_x,
                y: grid_y + f64::from(row) * gap_y,
            });
        }
    }
    cells
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    base: ObjectBase,
    sector_id: String,
    rows: u32,
    cols: u32,
    gap_x: f64,
    gap_y: f64,
    fill: Color,
    seats: Vec<Seat>,
}

impl Sector {
    /// Build a sector, generating its grid when both `rows` and `cols` are
    /// positive.
    pub fn new(spec: SectorSpec) -> Result<Self> {
        for gap in [spec.gap_x, spec.gap_y] {
            if !(gap >= 0.0) {
                return Err(rejection(Rejection::NegativeGap(gap)));
            }
        }

        let origin = Point::new(spec.left, spec.top);
        let seats: Vec<Seat> = if spec.rows > 0 && spec.cols > 0 {
            grid_cells(spec.rows, spec.cols, spec.gap_x, spec.gap_y, origin)
                .into_iter()
                .map(|c| {
                    let mut seat =
                        Seat::new(spec.shape, c.row, c.col, c.grid_x, c.grid_y, spec.fill);
                    seat.place(spec.gap_x, spec.gap_y);
                    seat
                })
                .collect()
        } else {
            Vec::new()
        };
        log::debug!(
            "sector `{}`: generated {} seat(s) for {}x{}",
            spec.sector_id,
            seats.len(),
            spec.rows,
            spec.cols
        );

        let base = ObjectBase::new(
            ObjectKind::Sector,
            spec.shape,
            Transform::new(spec.left, spec.top, 0.0, 0.0),
        )
        .with_label(Label::new(spec.sector_id.clone(), 16.0));

        let mut sector = Self {
            base,
            sector_id: spec.sector_id,
            rows: spec.rows,
            cols: spec.cols,
            gap_x: spec.gap_x,
            gap_y: spec.gap_y,
            fill: spec.fill,
            seats,
        };
        sector.recompute_bounds();
        sector.base.transform.set_angle(spec.angle);
        sector.on_modified();
        Ok(sector)
    }

    /// The constructor inputs that would rebuild this sector's parameters.
    pub fn spec(&self) -> SectorSpec {
        SectorSpec {
            shape: self.base.shape,
            sector_id: self.sector_id.clone(),
            rows: self.rows,
            cols: self.cols,
            gap_x: self.gap_x,
            gap_y: self.gap_y,
            fill: self.fill,
            left: self.base.transform.left,
            top: self.base.transform.top,
            angle: self.base.transform.angle,
        }
    }

    pub fn sector_id(&self) -> &str {
        &self.sector_id
    }

    pub fn set_sector_id(&mut self, sector_id: impl Into<String>) {
        self.sector_id = sector_id.into();
        if let Some(label) = self.base.label.as_mut() {
            label.text = self.sector_id.clone();
        }
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn gap_x(&self) -> f64 {
        self.gap_x
    }

    pub fn gap_y(&self) -> f64 {
        self.gap_y
    }

    pub fn fill(&self) -> Color {
        self.fill
    }

    pub fn shape(&self) -> ShapeKind {
        self.base.shape
    }

    pub fn angle(&self) -> f64 {
        self.base.transform.angle
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    /// Run `edit` on one seat, keeping the seat where it is on screen.
    /// `None` if the seat is not in this sector.
    pub fn edit_seat<R>(
        &mut self,
        id: ObjectId,
        edit: impl FnOnce(&mut Seat) -> Result<R>,
    ) -> Option<Result<R>> {
        let (gap_x, gap_y) = (self.gap_x, self.gap_y);
        let seat = self.seats.iter_mut().find(|s| s.id() == id)?;
        let out = edit(seat);
        seat.rebase(gap_x, gap_y);
        Some(out)
    }

    /// Whether the seat set can be regenerated from `(rows, cols, gaps)`.
    pub fn is_grid_authoritative(&self) -> bool {
        self.rows > 0 && self.cols > 0
    }

    /// Write `fill` through to every current seat.
    pub fn set_fill(&mut self, fill: Color) {
        self.fill = fill;
        for seat in &mut self.seats {
            seat.set_fill(fill);
        }
    }

    pub fn set_corner_radius(&mut self, radius: f64) {
        for seat in &mut self.seats {
            seat.set_corner_radius(radius);
        }
    }

    pub fn set_gap_x(&mut self, gap: f64) -> Result<()> {
        self.apply_gap(Axis::X, gap)
    }

    pub fn set_gap_y(&mut self, gap: f64) -> Result<()> {
        self.apply_gap(Axis::Y, gap)
    }

    /// Reposition every seat for a new gap. Row/column 1 is the anchor and
    /// never moves. Positions depend only on the current gaps, so returning
    /// to an earlier gap lands every seat on its earlier place exactly.
    /// Runs in the unrotated frame; the rotation is restored afterwards.
    fn apply_gap(&mut self, axis: Axis, gap: f64) -> Result<()> {
        if !(gap >= 0.0) {
            return Err(rejection(Rejection::NegativeGap(gap)));
        }
        if let Some(bad) = self.seats.iter().find(|s| !s.has_valid_grid_coordinates()) {
            return Err(violation(InvariantViolation::InvalidGridCoordinates {
                id: bad.id(),
                row: bad.row(),
                col: bad.col(),
            }));
        }

        let saved_angle = self.base.transform.angle;
        self.base.transform.angle = 0.0;

        let old = match axis {
            Axis::X => std::mem::replace(&mut self.gap_x, gap),
            Axis::Y => std::mem::replace(&mut self.gap_y, gap),
        };
        for seat in &mut self.seats {
            seat.place(self.gap_x, self.gap_y);
        }
        log::debug!(
            "sector `{}`: gap {:?} {old} -> {gap} over {} seat(s)",
            self.sector_id,
            axis,
            self.seats.len()
        );

        self.recompute_bounds();
        self.base.transform.angle = saved_angle;
        Ok(())
    }

    /// Adopt a seat placed outside the grid loop. The sector stops being
    /// grid-authoritative. `seat` is given in canvas coordinates.
    pub fn add_seat_with_update(&mut self, mut seat: Seat) {
        let saved_angle = self.base.transform.angle;
        if saved_angle != 0.0 {
            let inverse = self.base.transform.affine().inverse();
            let origin = inverse * Point::new(seat.left(), seat.top());
            seat.translate(origin - Point::new(seat.left(), seat.top()));
            let own = seat.transform().angle;
            seat.base_mut().transform.set_angle(own - saved_angle);
        }
        self.base.transform.angle = 0.0;

        seat.base_mut().appearance = Default::default();
        seat.refresh_label(saved_angle);
        seat.rebase(self.gap_x, self.gap_y);
        self.seats.push(seat);
        self.rows = 0;
        self.cols = 0;

        self.recompute_bounds();
        self.base.transform.angle = saved_angle;
    }

    /// Append seats already expressed in this sector's frame.
    pub(crate) fn adopt_frame_seats(&mut self, seats: impl IntoIterator<Item = Seat>) {
        let saved_angle = self.base.transform.angle;
        self.base.transform.angle = 0.0;
        let (gap_x, gap_y) = (self.gap_x, self.gap_y);
        self.seats.extend(seats.into_iter().map(|mut seat| {
            seat.rebase(gap_x, gap_y);
            seat
        }));
        self.rows = 0;
        self.cols = 0;
        self.recompute_bounds();
        self.base.transform.angle = saved_angle;
    }

    /// Remove one seat, returning it in the sector frame.
    pub fn remove_seat(&mut self, id: ObjectId) -> Option<Seat> {
        let pos = self.seats.iter().position(|s| s.id() == id)?;
        let seat = self.seats.remove(pos);
        self.rows = 0;
        self.cols = 0;
        Some(seat)
    }

    /// Bounds of the seats in the unrotated frame. Only valid while the
    /// sector's angle is zero; an empty sector keeps its origin.
    fn recompute_bounds(&mut self) {
        let t = &mut self.base.transform;
        let Some(bounds) = self
            .seats
            .iter()
            .map(|s| s.transform().bounding_box())
            .reduce(|a: Rect, b| a.union(b))
        else {
            t.width = 0.0;
            t.height = 0.0;
            return;
        };
        t.left = bounds.x0;
        t.top = bounds.y0;
        t.width = bounds.width();
        t.height = bounds.height();
    }

    /// Axis-aligned bounds on the canvas, rotation included.
    pub fn bounding_box(&self) -> Rect {
        self.base.transform.bounding_box()
    }

    /// Copies of the seats with the sector rotation folded in, in canvas
    /// coordinates. Identities are kept.
    pub fn baked_seats(&self) -> Vec<Seat> {
        let affine = self.base.transform.affine();
        let angle = self.base.transform.angle;
        self.seats.iter().map(|s| s.baked(affine, angle)).collect()
    }

    /// Stage-1 export: venue-relative seat geometry.
    pub fn export(&self, reference: Point) -> SectorExport {
        SectorExport {
            sector_id: self.sector_id.clone(),
            seats: self
                .baked_seats()
                .iter()
                .map(|s| s.export(reference))
                .collect(),
        }
    }
}

impl SeatMapObject for Sector {
    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn on_modified(&mut self) {
        let angle = self.base.transform.angle;
        if let Some(label) = self.base.label.as_mut() {
            label.keep_upright(angle);
        }
        for seat in &mut self.seats {
            seat.refresh_label(angle);
        }
    }

    fn rotate_to(&mut self, deg: f64) {
        self.base.transform.angle = normalize_angle(deg);
        self.on_modified();
    }

    fn move_by(&mut self, delta: Vec2) {
        self.base.transform.translate(delta);
        for seat in &mut self.seats {
            seat.translate(delta);
            seat.place(self.gap_x, self.gap_y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn spec(rows: u32, cols: u32) -> SectorSpec {
        SectorSpec {
            sector_id: "A".into(),
            rows,
            cols,
            ..SectorSpec::default()
        }
    }

    fn coords(sector: &Sector) -> Vec<(u32, u32, f64, f64)> {
        sector
            .seats()
            .iter()
            .map(|s| (s.row(), s.col(), s.left(), s.top()))
            .collect()
    }

    #[test]
    fn two_by_three_grid() {
        let sector = Sector::new(spec(2, 3)).unwrap();
        assert_eq!(
            coords(&sector),
            vec![
                (1, 1, 0.0, 0.0),
                (1, 2, 40.0, 0.0),
                (1, 3, 80.0, 0.0),
                (2, 1, 0.0, 40.0),
                (2, 2, 40.0, 40.0),
                (2, 3, 80.0, 40.0),
            ]
        );
        assert!(sector.is_grid_authoritative());
        let t = sector.transform();
        assert_eq!((t.width, t.height), (120.0, 80.0));
    }

    #[test]
    fn gaps_in_constructor() {
        let sector = Sector::new(SectorSpec {
            gap_x: 10.0,
            gap_y: 5.0,
            left: 100.0,
            top: 200.0,
            ..spec(2, 2)
        })
        .unwrap();
        assert_eq!(
            coords(&sector),
            vec![
                (1, 1, 100.0, 200.0),
                (1, 2, 150.0, 200.0),
                (2, 1, 100.0, 245.0),
                (2, 2, 150.0, 245.0),
            ]
        );
    }

    #[test]
    fn zero_rows_generates_nothing() {
        let sector = Sector::new(spec(0, 4)).unwrap();
        assert!(sector.seats().is_empty());
        assert!(!sector.is_grid_authoritative());
        assert_eq!(sector.transform().width, 0.0);
    }

    #[test]
    fn negative_gap_is_rejected() {
        assert!(Sector::new(SectorSpec { gap_x: -1.0, ..spec(1, 1) }).is_err());

        let mut sector = Sector::new(spec(1, 2)).unwrap();
        let before = coords(&sector);
        let err = sector.set_gap_x(-5.0).unwrap_err();
        assert!(!err.is_fatal());
        assert_eq!(coords(&sector), before);
    }

    #[test]
    fn gap_change_moves_by_column() {
        let mut sector = Sector::new(spec(1, 3)).unwrap();
        sector.set_gap_x(10.0).unwrap();
        let lefts: Vec<f64> = sector.seats().iter().map(|s| s.left()).collect();
        assert_eq!(lefts, vec![0.0, 50.0, 100.0]);
        assert_eq!(sector.gap_x(), 10.0);
        assert_eq!(sector.transform().width, 140.0);

        sector.set_gap_y(3.0).unwrap();
        assert!(sector.seats().iter().all(|s| s.top() == 0.0));
    }

    #[test]
    fn decimal_gap_round_trip_is_exact() {
        let mut sector = Sector::new(SectorSpec {
            left: 13.3,
            ..spec(1, 12)
        })
        .unwrap();
        sector.set_gap_x(0.3).unwrap();
        let before = coords(&sector);

        sector.set_gap_x(12.7).unwrap();
        sector.set_gap_x(0.3).unwrap();
        assert_eq!(coords(&sector), before);
    }

    #[test]
    fn gap_after_move_matches_fresh_grid() {
        let mut sector = Sector::new(SectorSpec {
            gap_x: 0.1,
            ..spec(1, 5)
        })
        .unwrap();
        sector.move_by(Vec2::new(0.7, 0.0));
        sector.set_gap_x(2.9).unwrap();
        sector.set_gap_x(0.1).unwrap();

        let fresh = Sector::new(SectorSpec {
            gap_x: 0.1,
            left: sector.transform().left,
            ..spec(1, 5)
        })
        .unwrap();
        let lefts = |s: &Sector| s.seats().iter().map(|s| s.left()).collect::<Vec<_>>();
        assert_eq!(lefts(&sector), lefts(&fresh));
    }

    #[test]
    fn renumbered_seat_stays_put_until_the_gap_changes() {
        let mut sector = Sector::new(SectorSpec {
            gap_x: 10.0,
            ..spec(1, 3)
        })
        .unwrap();
        let id = sector.seats()[2].id();
        sector.edit_seat(id, |seat| seat.set_col(5)).unwrap().unwrap();
        assert_eq!(sector.seats()[2].left(), 100.0);

        // column 5 now carries four gaps instead of two
        sector.set_gap_x(20.0).unwrap();
        assert_eq!(sector.seats()[2].left(), 140.0);
    }

    #[test]
    fn gap_change_preserves_rotation() {
        let mut sector = Sector::new(SectorSpec {
            angle: 45.0,
            ..spec(2, 2)
        })
        .unwrap();
        sector.set_gap_y(20.0).unwrap();
        assert_eq!(sector.angle(), 45.0);
        assert_eq!(sector.seats()[2].top(), 60.0);
    }

    #[test]
    fn gap_change_rejects_seat_without_coordinates() {
        let json = serde_json::to_value(Sector::new(spec(1, 2)).unwrap()).unwrap();
        let mut json = json;
        json["seats"][1]["col"] = 0.into();
        let mut sector: Sector = serde_json::from_value(json).unwrap();
        let err = sector.set_gap_x(10.0).unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(sector.gap_x(), 0.0);
    }

    #[test]
    fn fill_writes_through() {
        let mut sector = Sector::new(spec(2, 2)).unwrap();
        let red = Color::from_hex("#FF0000").unwrap();
        sector.set_fill(red);
        assert!(sector.seats().iter().all(|s| s.fill() == red));
        assert_eq!(sector.fill(), red);
    }

    #[test]
    fn adding_a_seat_marks_hand_edited() {
        let mut sector = Sector::new(spec(1, 1)).unwrap();
        let extra = Seat::new(ShapeKind::Circle, 1, 2, 60.0, 0.0, sector.fill());
        sector.add_seat_with_update(extra);
        assert_eq!(sector.seats().len(), 2);
        assert_eq!((sector.rows(), sector.cols()), (0, 0));
        assert_eq!(sector.transform().width, 100.0);
    }

    #[test]
    fn move_carries_seats() {
        let mut sector = Sector::new(spec(1, 2)).unwrap();
        sector.move_by(Vec2::new(10.0, 20.0));
        assert_eq!(sector.transform().left, 10.0);
        assert_eq!(coords(&sector)[1], (1, 2, 50.0, 20.0));
    }

    #[test]
    fn baked_seats_rotate_about_origin() {
        let mut sector = Sector::new(SectorSpec {
            left: 100.0,
            top: 100.0,
            ..spec(1, 2)
        })
        .unwrap();
        sector.rotate_to(90.0);
        let baked = sector.baked_seats();
        assert_eq!(baked[0].id(), sector.seats()[0].id());
        assert!((baked[1].left() - 100.0).abs() < 1e-9);
        assert!((baked[1].top() - 140.0).abs() < 1e-9);
        assert_eq!(baked[1].transform().angle, 90.0);
        // unrotated frame untouched
        assert_eq!(sector.seats()[1].left(), 140.0);
    }

    #[test]
    fn rotation_keeps_seat_labels_upright() {
        let mut sector = Sector::new(spec(1, 1)).unwrap();
        sector.rotate_to(-45.0);
        assert_eq!(sector.angle(), 315.0);
        let label = sector.seats()[0].base().label.as_ref().unwrap();
        assert_eq!(label.angle, 45.0);
    }

    #[test]
    fn rename_updates_label() {
        let mut sector = Sector::new(spec(1, 1)).unwrap();
        sector.set_sector_id("VIP");
        assert_eq!(sector.sector_id(), "VIP");
        assert_eq!(sector.base().label.as_ref().unwrap().text, "VIP");
    }
}
