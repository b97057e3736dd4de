//! Shared building blocks for every seat-map entity.
//!
//! Entities are plain values. Each carries an [`ObjectBase`] with its
//! identity, semantic kind, primitive shape, transform, optional label and
//! display state. The rendering surface projects these onto its own
//! primitives; nothing here knows about pixels.
//!
//! Transforms pivot on the entity's top-left origin. Angles are degrees in
//! `[0, 360)`.

use crate::id::ObjectId;
use kurbo::{Affine, Point, Rect, Vec2};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0], serialized as a hex string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Helper to parse a single hex digit.
pub fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA`. The `#` is optional.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();
        let short = |i: usize| hex_val(bytes[i]).map(|v| (v * 17) as f32 / 255.0);
        let long = |i: usize| -> Option<f32> {
            Some((hex_val(bytes[i])? << 4 | hex_val(bytes[i + 1])?) as f32 / 255.0)
        };

        match bytes.len() {
            3 => Some(Self::rgba(short(0)?, short(1)?, short(2)?, 1.0)),
            4 => Some(Self::rgba(short(0)?, short(1)?, short(2)?, short(3)?)),
            6 => Some(Self::rgba(long(0)?, long(2)?, long(4)?, 1.0)),
            8 => Some(Self::rgba(long(0)?, long(2)?, long(4)?, long(6)?)),
            _ => None,
        }
    }

    /// `#RRGGBB` when opaque, `#RRGGBBAA` otherwise.
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = [self.r, self.g, self.b, self.a].map(|c| (c * 255.0).round() as u8);
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid color `{s}`")))
    }
}

// ─── Kinds ───────────────────────────────────────────────────────────────

/// Semantic discriminator, decided once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Seat,
    Sector,
    Venue,
    Image,
    Shape,
}

impl ObjectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::Seat => "seat",
            ObjectKind::Sector => "sector",
            ObjectKind::Venue => "venue",
            ObjectKind::Image => "image",
            ObjectKind::Shape => "shape",
        }
    }
}

/// Primitive used to draw an entity's body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Circle,
    Rectangle,
}

// ─── Transform ───────────────────────────────────────────────────────────

/// Fold any angle into `[0, 360)`.
pub fn normalize_angle(deg: f64) -> f64 {
    let a = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if a >= 360.0 { 0.0 } else { a }
}

/// Angle that keeps text upright inside a parent rotated by `deg`.
pub fn upright_angle(deg: f64) -> f64 {
    normalize_angle(360.0 - deg)
}

/// Position, rotation and box of an entity. Scaling is never stored:
/// entities only move, rotate, or change content.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Transform {
    pub left: f64,
    pub top: f64,
    #[serde(default)]
    pub angle: f64,
    pub width: f64,
    pub height: f64,
}

impl Transform {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            angle: 0.0,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Unrotated box.
    pub fn local_rect(&self) -> Rect {
        Rect::new(
            self.left,
            self.top,
            self.left + self.width,
            self.top + self.height,
        )
    }

    /// Rotation about the origin.
    pub fn affine(&self) -> Affine {
        Affine::rotate_about(self.angle.to_radians(), self.origin())
    }

    /// Axis-aligned bounds of the rotated box.
    pub fn bounding_box(&self) -> Rect {
        self.affine().transform_rect_bbox(self.local_rect())
    }

    /// Center of the rotated box.
    pub fn center(&self) -> Point {
        self.affine() * self.local_rect().center()
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.left += delta.x;
        self.top += delta.y;
    }

    pub fn set_angle(&mut self, deg: f64) {
        self.angle = normalize_angle(deg);
    }
}

// ─── Label & Display ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    pub font_size: f64,
    /// Rotation relative to the canvas, kept at `upright_angle(parent)`.
    pub angle: f64,
    pub visible: bool,
}

impl Label {
    pub fn new(text: impl Into<String>, font_size: f64) -> Self {
        Self {
            text: text.into(),
            font_size,
            angle: 0.0,
            visible: true,
        }
    }

    pub fn keep_upright(&mut self, parent_angle: f64) {
        self.angle = upright_angle(parent_angle);
    }
}

/// Interaction state the rendering surface mirrors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    pub opacity: f64,
    pub selectable: bool,
    pub evented: bool,
    pub visible: bool,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            selectable: true,
            evented: true,
            visible: true,
        }
    }
}

impl Appearance {
    /// Faded and non-interactive.
    pub fn dimmed(opacity: f64) -> Self {
        Self {
            opacity,
            selectable: false,
            evented: false,
            visible: true,
        }
    }
}

// ─── Base ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectBase {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub shape: ShapeKind,
    pub transform: Transform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
    /// Interaction state only; never persisted.
    #[serde(skip)]
    pub appearance: Appearance,
    #[serde(default)]
    pub lock_rotation: bool,
}

impl ObjectBase {
    pub fn new(kind: ObjectKind, shape: ShapeKind, transform: Transform) -> Self {
        Self {
            id: ObjectId::new(),
            kind,
            shape,
            transform,
            label: None,
            appearance: Appearance::default(),
            lock_rotation: false,
        }
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.label = Some(label);
        self
    }
}

/// Common behaviour of venue, sector and seat.
///
/// The `on_*` hooks mirror the rendering surface's notifications and keep
/// derived state (label orientation, label visibility) consistent.
pub trait SeatMapObject {
    fn base(&self) -> &ObjectBase;
    fn base_mut(&mut self) -> &mut ObjectBase;

    fn id(&self) -> ObjectId {
        self.base().id
    }

    fn kind(&self) -> ObjectKind {
        self.base().kind
    }

    fn transform(&self) -> &Transform {
        &self.base().transform
    }

    fn on_modified(&mut self) {
        let angle = self.base().transform.angle;
        if let Some(label) = self.base_mut().label.as_mut() {
            label.keep_upright(angle);
        }
    }

    fn on_rotating(&mut self) {
        self.on_modified();
    }

    fn on_scaling(&mut self) {}

    /// Rotate to an absolute angle. Ignored when rotation is locked.
    fn rotate_to(&mut self, deg: f64) {
        if self.base().lock_rotation {
            return;
        }
        self.base_mut().transform.set_angle(deg);
        self.on_modified();
    }

    fn move_by(&mut self, delta: Vec2) {
        self.base_mut().transform.translate(delta);
    }
}
