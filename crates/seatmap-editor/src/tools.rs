//! Mouse tools.
//!
//! The surface owns hit-testing and dragging of existing objects, so the
//! select tool is passive. The sector tools turn a dragged rectangle into a
//! new sector sized to the seats that fit in it.

use crate::input::InputEvent;
use crate::sync::Mutation;
use seatmap_core::error::{Rejection, Result, rejection};
use seatmap_core::{Color, EditorConfig, SEAT_SIZE, SectorSpec, ShapeKind};
use serde::{Deserialize, Serialize};

/// Opacity of the ghost rectangle shown while drawing.
pub const PREVIEW_OPACITY: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToolKind {
    #[default]
    Select,
    CircleSector,
    RectSector,
}

impl ToolKind {
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::CircleSector => "circleSector",
            ToolKind::RectSector => "rectSector",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "select" => Some(ToolKind::Select),
            "circleSector" => Some(ToolKind::CircleSector),
            "rectSector" => Some(ToolKind::RectSector),
            _ => None,
        }
    }
}

/// Trait for tools that handle input and produce mutations.
pub trait Tool {
    fn kind(&self) -> ToolKind;

    /// Handle an input event. A rejection cancels the gesture; the caller
    /// reverts to the select tool.
    fn handle(&mut self, event: &InputEvent) -> Result<Vec<Mutation>>;

    /// Rectangle to draw as feedback, `(x, y, w, h)`.
    fn preview(&self) -> Option<(f64, f64, f64, f64)> {
        None
    }
}

pub fn make_tool(kind: ToolKind, config: &EditorConfig) -> Box<dyn Tool> {
    match kind {
        ToolKind::Select => Box::new(SelectTool),
        ToolKind::CircleSector => Box::new(SectorTool::new(ShapeKind::Circle, config)),
        ToolKind::RectSector => Box::new(SectorTool::new(ShapeKind::Rectangle, config)),
    }
}

// ─── Select Tool ─────────────────────────────────────────────────────────

pub struct SelectTool;

impl Tool for SelectTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Select
    }

    fn handle(&mut self, _event: &InputEvent) -> Result<Vec<Mutation>> {
        Ok(Vec::new())
    }
}

// ─── Sector Tool ─────────────────────────────────────────────────────────

pub struct SectorTool {
    shape: ShapeKind,
    fill: Color,
    min_rows: u32,
    min_cols: u32,
    max_rows: u32,
    max_cols: u32,
    start: Option<(f64, f64)>,
    current: Option<(f64, f64)>,
}

impl SectorTool {
    pub fn new(shape: ShapeKind, config: &EditorConfig) -> Self {
        Self {
            shape,
            fill: config.default_fill,
            min_rows: config.min_sector_rows,
            min_cols: config.min_sector_cols,
            max_rows: config.max_sector_rows,
            max_cols: config.max_sector_cols,
            start: None,
            current: None,
        }
    }

    /// Normalize a drag rectangle from start + current positions.
    fn normalize_rect(x1: f64, y1: f64, x2: f64, y2: f64) -> (f64, f64, f64, f64) {
        (x1.min(x2), y1.min(y2), (x2 - x1).abs(), (y2 - y1).abs())
    }

    /// Seats that fit in a `w × h` drag, as `(rows, cols)`. Saturates at
    /// `u32::MAX`.
    pub fn grid_size(w: f64, h: f64) -> (u32, u32) {
        ((h / SEAT_SIZE).ceil() as u32, (w / SEAT_SIZE).ceil() as u32)
    }

    fn finish(&mut self, x: f64, y: f64) -> Result<Vec<Mutation>> {
        let Some((sx, sy)) = self.start.take() else {
            return Ok(Vec::new());
        };
        self.current = None;

        let (left, top, w, h) = Self::normalize_rect(sx, sy, x, y);
        let (rows, cols) = Self::grid_size(w, h);
        if rows < self.min_rows || cols < self.min_cols {
            return Err(rejection(Rejection::SectorTooSmall {
                rows,
                cols,
                min_rows: self.min_rows,
                min_cols: self.min_cols,
            }));
        }
        if rows > self.max_rows || cols > self.max_cols {
            return Err(rejection(Rejection::SectorTooLarge {
                rows,
                cols,
                max_rows: self.max_rows,
                max_cols: self.max_cols,
            }));
        }

        log::debug!("sector tool: {rows}x{cols} at ({left}, {top})");
        Ok(vec![Mutation::AddSector(SectorSpec {
            shape: self.shape,
            rows,
            cols,
            fill: self.fill,
            left,
            top,
            ..SectorSpec::default()
        })])
    }
}

impl Tool for SectorTool {
    fn kind(&self) -> ToolKind {
        match self.shape {
            ShapeKind::Circle => ToolKind::CircleSector,
            ShapeKind::Rectangle => ToolKind::RectSector,
        }
    }

    fn handle(&mut self, event: &InputEvent) -> Result<Vec<Mutation>> {
        match event {
            InputEvent::PointerDown { x, y } => {
                self.start = Some((*x, *y));
                self.current = Some((*x, *y));
                Ok(Vec::new())
            }
            InputEvent::PointerMove { x, y } => {
                if self.start.is_some() {
                    self.current = Some((*x, *y));
                }
                Ok(Vec::new())
            }
            InputEvent::PointerUp { x, y } => self.finish(*x, *y),
            InputEvent::Key { .. } => Ok(Vec::new()),
        }
    }

    fn preview(&self) -> Option<(f64, f64, f64, f64)> {
        let (sx, sy) = self.start?;
        let (cx, cy) = self.current?;
        Some(Self::normalize_rect(sx, sy, cx, cy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn drag(tool: &mut dyn Tool, from: (f64, f64), to: (f64, f64)) -> Result<Vec<Mutation>> {
        tool.handle(&InputEvent::PointerDown { x: from.0, y: from.1 })?;
        tool.handle(&InputEvent::PointerMove { x: to.0, y: to.1 })?;
        tool.handle(&InputEvent::PointerUp { x: to.0, y: to.1 })
    }

    #[test]
    fn drag_sizes_the_grid() {
        let mut tool = SectorTool::new(ShapeKind::Circle, &EditorConfig::default());
        let out = drag(&mut tool, (200.0, 150.0), (100.0, 50.0)).unwrap();
        match &out[..] {
            [Mutation::AddSector(spec)] => {
                assert_eq!((spec.rows, spec.cols), (3, 3));
                assert_eq!((spec.left, spec.top), (100.0, 50.0));
                assert_eq!(spec.shape, ShapeKind::Circle);
                assert_eq!(spec.sector_id, "NULL");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(tool.preview().is_none());
    }

    #[test]
    fn partial_seats_round_up() {
        assert_eq!(SectorTool::grid_size(41.0, 1.0), (1, 2));
        assert_eq!(SectorTool::grid_size(80.0, 80.0), (2, 2));
    }

    #[test]
    fn click_without_drag_is_rejected() {
        let mut tool = SectorTool::new(ShapeKind::Rectangle, &EditorConfig::default());
        let err = drag(&mut tool, (10.0, 10.0), (10.0, 10.0)).unwrap_err();
        assert!(matches!(
            err.rejection(),
            Some(Rejection::SectorTooSmall { rows: 0, cols: 0, .. })
        ));
    }

    #[test]
    fn oversized_drag_is_rejected() {
        let mut tool = SectorTool::new(ShapeKind::Circle, &EditorConfig::default());
        let err = drag(&mut tool, (0.0, 0.0), (1e12, 80.0)).unwrap_err();
        assert!(matches!(
            err.rejection(),
            Some(Rejection::SectorTooLarge { rows: 2, cols: u32::MAX, .. })
        ));
        assert!(tool.preview().is_none());

        let config = EditorConfig {
            max_sector_cols: 3,
            ..EditorConfig::default()
        };
        let mut tool = SectorTool::new(ShapeKind::Circle, &config);
        assert!(drag(&mut tool, (0.0, 0.0), (120.0, 40.0)).is_ok());
        assert!(drag(&mut tool, (0.0, 0.0), (121.0, 40.0)).is_err());
    }

    #[test]
    fn preview_follows_pointer() {
        let mut tool = SectorTool::new(ShapeKind::Circle, &EditorConfig::default());
        tool.handle(&InputEvent::PointerDown { x: 50.0, y: 50.0 }).unwrap();
        tool.handle(&InputEvent::PointerMove { x: 10.0, y: 90.0 }).unwrap();
        assert_eq!(tool.preview(), Some((10.0, 50.0, 40.0, 40.0)));
    }

    #[test]
    fn tool_names_roundtrip() {
        for kind in [ToolKind::Select, ToolKind::CircleSector, ToolKind::RectSector] {
            assert_eq!(ToolKind::from_name(kind.name()), Some(kind));
            assert_eq!(make_tool(kind, &EditorConfig::default()).kind(), kind);
        }
    }
}
