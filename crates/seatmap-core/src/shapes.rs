//! Non seat-map objects that can sit on the canvas: background images and
//! plain decorative shapes.

use crate::export::ImageExport;
use crate::id::ObjectId;
use crate::model::{Color, ObjectBase, ObjectKind, SeatMapObject, ShapeKind, Transform};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use kurbo::Point;
use serde::{Deserialize, Serialize};

// ─── Background image ────────────────────────────────────────────────────

/// A JPEG placed under the seats, typically a floor plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundImage {
    base: ObjectBase,
    #[serde(with = "base64_bytes")]
    jpeg: Vec<u8>,
}

impl BackgroundImage {
    pub fn new(jpeg: Vec<u8>, left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            base: ObjectBase::new(
                ObjectKind::Image,
                ShapeKind::Rectangle,
                Transform::new(left, top, width, height),
            ),
            jpeg,
        }
    }

    pub fn jpeg(&self) -> &[u8] {
        &self.jpeg
    }

    pub fn with_fresh_id(mut self) -> Self {
        self.base.id = ObjectId::new();
        self
    }

    pub fn export(&self, reference: Point) -> ImageExport {
        let t = &self.base.transform;
        ImageExport {
            x: t.left - reference.x,
            y: t.top - reference.y,
            width: t.width,
            height: t.height,
            angle: (t.angle != 0.0).then_some(t.angle),
            base64_jpeg: STANDARD.encode(&self.jpeg),
        }
    }
}

impl SeatMapObject for BackgroundImage {
    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }
}

mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        STANDARD.decode(s).map_err(serde::de::Error::custom)
    }
}

// ─── Plain shapes ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Primitive {
    Text { text: String, font_size: f64 },
    Circle,
    Rect {
        #[serde(default)]
        corner_radius: f64,
    },
    Group { children: Vec<Shape> },
}

/// Decorative drawing (text, circles, rectangles, groups of those).
/// Copyable, but not part of the exported seat map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    base: ObjectBase,
    primitive: Primitive,
    fill: Color,
}

impl Shape {
    pub fn new(primitive: Primitive, transform: Transform, fill: Color) -> Self {
        let shape = match primitive {
            Primitive::Circle => ShapeKind::Circle,
            _ => ShapeKind::Rectangle,
        };
        Self {
            base: ObjectBase::new(ObjectKind::Shape, shape, transform),
            primitive,
            fill,
        }
    }

    pub fn group(children: Vec<Shape>, transform: Transform) -> Self {
        Self::new(
            Primitive::Group { children },
            transform,
            Color::rgba(0.0, 0.0, 0.0, 0.0),
        )
    }

    pub fn primitive(&self) -> &Primitive {
        &self.primitive
    }

    pub fn fill(&self) -> Color {
        self.fill
    }

    /// Clone with a new id on this shape and, independently, on every
    /// descendant.
    pub fn with_fresh_ids(&self) -> Shape {
        let mut out = self.clone();
        out.refresh_ids();
        out
    }

    fn refresh_ids(&mut self) {
        self.base.id = ObjectId::new();
        if let Primitive::Group { children } = &mut self.primitive {
            for child in children {
                child.refresh_ids();
            }
        }
    }

    /// Every id in this shape's tree, depth first.
    pub fn ids(&self) -> Vec<ObjectId> {
        let mut out = vec![self.base.id];
        if let Primitive::Group { children } = &self.primitive {
            out.extend(children.iter().flat_map(Shape::ids));
        }
        out
    }
}

impl SeatMapObject for Shape {
    fn base(&self) -> &ObjectBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }

    fn move_by(&mut self, delta: kurbo::Vec2) {
        self.base.transform.translate(delta);
        if let Primitive::Group { children } = &mut self.primitive {
            for child in children {
                child.move_by(delta);
            }
        }
    }
}
