use crate::config::EditorConfig;
use crate::error::{Rejection, Result, rejection};
use crate::model::{Label, ObjectBase, ObjectKind, SeatMapObject, ShapeKind, Transform};
use kurbo::Point;
use serde::{Deserialize, Serialize};

const LABEL_FONT_SIZE: f64 = 20.0;

/// The performance space. One per document, never copied or deleted; its
/// top-left corner is the origin of every exported coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    base: ObjectBase,
    venue_id: String,
}

fn label_text(venue_id: &str) -> String {
    format!("Venue: {venue_id}")
}

impl Venue {
    pub fn new(venue_id: impl Into<String>, width: f64, height: f64) -> Result<Self> {
        check_size(width, height)?;
        let venue_id = venue_id.into();
        let mut base = ObjectBase::new(
            ObjectKind::Venue,
            ShapeKind::Rectangle,
            Transform::new(0.0, 0.0, width, height),
        )
        .with_label(Label::new(label_text(&venue_id), LABEL_FONT_SIZE));
        base.lock_rotation = true;
        Ok(Self { base, venue_id })
    }

    /// A venue sized from the configured ratios and centred in the viewport.
    pub fn for_viewport(
        venue_id: impl Into<String>,
        viewport_width: f64,
        viewport_height: f64,
        config: &EditorConfig,
    ) -> Result<Self> {
        let width = viewport_width * config.venue_width_ratio;
        let height = viewport_height * config.venue_height_ratio;
        let mut venue = Self::new(venue_id, width, height)?;
        venue.base.transform.left = (viewport_width - width) / 2.0;
        venue.base.transform.top = (viewport_height - height) / 2.0;
        Ok(venue)
    }

    pub fn venue_id(&self) -> &str {
        &self.venue_id
    }

    pub fn set_venue_id(&mut self, venue_id: impl Into<String>) {
        self.venue_id = venue_id.into();
        let text = label_text(&self.venue_id);
        if let Some(label) = self.base.label.as_mut() {
            label.text = text;
        }
    }

    pub fn width(&self) -> f64 {
        self.base.transform.width
    }

    pub fn height(&self) -> f64 {
        self.base.transform.height
    }

    /// Top-left corner; the export reference point.
    pub fn origin(&self) -> Point {
        self.base.transform.origin()
    }

    pub fn move_to(&mut self, left: f64, top: f64) {
        self.base.transform.left = left;
        self.base.transform.top = top;
    }

    pub fn resize(&mut self, width: f64, height: f64) -> Result<()> {
        check_size(width, height)?;
        self.base.transform.width = width;
        self.base.transform.height = height;
        Ok(())
    }

    pub fn label_visible(&self) -> bool {
        self.base.label.as_ref().is_some_and(|l| l.visible)
    }
}

fn check_size(width: f64, height: f64) -> Result<()> {
    if width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(rejection(Rejection::InvalidVenueSize { width, height }))
    }
}

impl SeatMapObject for Venue {
    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    /// The label is rebuilt against the final size once scaling ends.
    fn on_modified(&mut self) {
        let text = label_text(&self.venue_id);
        if let Some(label) = self.base.label.as_mut() {
            label.text = text;
            label.angle = 0.0;
            label.visible = true;
        }
    }

    fn on_scaling(&mut self) {
        if let Some(label) = self.base.label.as_mut() {
            label.visible = false;
        }
    }
}
