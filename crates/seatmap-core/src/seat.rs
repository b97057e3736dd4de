//! The leaf reservation unit.

use crate::error::{Rejection, Result, rejection};
use crate::export::{SeatExport, SeatShape};
use crate::id::ObjectId;
use crate::model::{
    Color, Label, ObjectBase, ObjectKind, SeatMapObject, ShapeKind, Transform, normalize_angle,
};
use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Edge length of every seat's bounding box.
pub const SEAT_SIZE: f64 = 40.0;

const LABEL_FONT_SIZE: f64 = 12.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seat {
    base: ObjectBase,
    row: u32,
    col: u32,
    fill: Color,
    #[serde(default)]
    corner_radius: f64,
    /// Where the seat sits with both sector gaps at zero. Inside a sector,
    /// `left`/`top` are always derived from this and the current gaps.
    grid_left: f64,
    grid_top: f64,
}

/// Number of gaps between the anchor row/column and `index`.
fn gap_steps(index: u32) -> f64 {
    f64::from(index.saturating_sub(1))
}

impl Seat {
    /// A seat whose top-left corner sits at `(left, top)`.
    pub fn new(shape: ShapeKind, row: u32, col: u32, left: f64, top: f64, fill: Color) -> Self {
        let base = ObjectBase::new(
            ObjectKind::Seat,
            shape,
            Transform::new(left, top, SEAT_SIZE, SEAT_SIZE),
        )
        .with_label(Label::new(format!("{row}-{col}"), LABEL_FONT_SIZE));
        Self {
            base,
            row,
            col,
            fill,
            corner_radius: 0.0,
            grid_left: left,
            grid_top: top,
        }
    }

    pub fn row(&self) -> u32 {
        self.row
    }

    pub fn col(&self) -> u32 {
        self.col
    }

    pub fn fill(&self) -> Color {
        self.fill
    }

    pub fn shape(&self) -> ShapeKind {
        self.base.shape
    }

    pub fn corner_radius(&self) -> f64 {
        self.corner_radius
    }

    pub fn left(&self) -> f64 {
        self.base.transform.left
    }

    pub fn top(&self) -> f64 {
        self.base.transform.top
    }

    pub fn label_text(&self) -> Option<&str> {
        self.base.label.as_ref().map(|l| l.text.as_str())
    }

    pub fn set_fill(&mut self, fill: Color) {
        self.fill = fill;
    }

    pub fn set_corner_radius(&mut self, radius: f64) {
        self.corner_radius = radius.max(0.0);
    }

    pub fn set_row(&mut self, row: u32) -> Result<()> {
        if row == 0 {
            return Err(rejection(Rejection::ZeroGridCoordinate));
        }
        self.row = row;
        self.refresh_label_text();
        Ok(())
    }

    pub fn set_col(&mut self, col: u32) -> Result<()> {
        if col == 0 {
            return Err(rejection(Rejection::ZeroGridCoordinate));
        }
        self.col = col;
        self.refresh_label_text();
        Ok(())
    }

    pub fn has_valid_grid_coordinates(&self) -> bool {
        self.row >= 1 && self.col >= 1
    }

    fn refresh_label_text(&mut self) {
        let text = format!("{}-{}", self.row, self.col);
        if let Some(label) = self.base.label.as_mut() {
            label.text = text;
        }
    }

    /// Keep the label upright given the rotation of the containing sector
    /// (zero for a loose seat).
    pub fn refresh_label(&mut self, parent_angle: f64) {
        let world = self.base.transform.angle + parent_angle;
        if let Some(label) = self.base.label.as_mut() {
            label.keep_upright(world);
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.base.transform.translate(delta);
        self.grid_left += delta.x;
        self.grid_top += delta.y;
    }

    /// Derive `left`/`top` from the grid position and the sector gaps.
    pub(crate) fn place(&mut self, gap_x: f64, gap_y: f64) {
        let t = &mut self.base.transform;
        t.left = self.grid_left + gap_steps(self.col) * gap_x;
        t.top = self.grid_top + gap_steps(self.row) * gap_y;
    }

    /// Take the current `left`/`top` as given and recover the grid position
    /// under `gap_x`/`gap_y`.
    pub(crate) fn rebase(&mut self, gap_x: f64, gap_y: f64) {
        self.grid_left = self.left() - gap_steps(self.col) * gap_x;
        self.grid_top = self.top() - gap_steps(self.row) * gap_y;
        self.place(gap_x, gap_y);
    }

    /// Same geometry and attributes under a new identity.
    pub fn detached_copy(&self) -> Seat {
        let mut copy = self.clone();
        copy.base.id = ObjectId::new();
        copy
    }

    /// This seat with the parent rotation `parent` folded into its own
    /// origin and angle. Identity is preserved.
    pub(crate) fn baked(&self, parent: Affine, parent_angle: f64) -> Seat {
        let mut out = self.clone();
        let origin = parent * Point::new(self.left(), self.top());
        out.base.transform.left = origin.x;
        out.base.transform.top = origin.y;
        out.grid_left = origin.x;
        out.grid_top = origin.y;
        out.base.transform.angle = normalize_angle(self.base.transform.angle + parent_angle);
        out.refresh_label(0.0);
        out
    }

    /// Geometry of this (already baked) seat relative to `reference`.
    pub fn export(&self, reference: Point) -> SeatExport {
        let t = &self.base.transform;
        let seat_shape = match self.base.shape {
            ShapeKind::Circle => {
                let c = t.center() - reference.to_vec2();
                SeatShape::Circle {
                    fill: self.fill.to_hex(),
                    cx: c.x,
                    cy: c.y,
                    r: SEAT_SIZE / 2.0,
                }
            }
            ShapeKind::Rectangle => {
                let radius = (self.corner_radius > 0.0).then_some(self.corner_radius);
                SeatShape::Rectangle {
                    fill: self.fill.to_hex(),
                    x: t.left - reference.x,
                    y: t.top - reference.y,
                    width: t.width,
                    height: t.height,
                    rx: radius,
                    ry: radius,
                    angle: (t.angle != 0.0).then_some(t.angle),
                }
            }
        };
        SeatExport {
            seat_id: self.base.id.to_string(),
            seat_row: self.row,
            seat_col: self.col,
            seat_shape,
        }
    }
}

impl SeatMapObject for Seat {
    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn on_modified(&mut self) {
        self.refresh_label(0.0);
    }
}
