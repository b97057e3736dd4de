//! Input events forwarded by the rendering surface.
//!
//! Coordinates are canvas coordinates; the surface has already undone its
//! own zoom and pan.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InputEvent {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp { x: f64, y: f64 },
    Key {
        key: String,
        #[serde(default)]
        ctrl: bool,
        #[serde(default)]
        shift: bool,
        #[serde(default)]
        alt: bool,
        #[serde(default)]
        meta: bool,
    },
}

impl InputEvent {
    /// Extract position if this is a pointer event.
    pub fn position(&self) -> Option<(f64, f64)> {
        match self {
            Self::PointerDown { x, y } | Self::PointerMove { x, y } | Self::PointerUp { x, y } => {
                Some((*x, *y))
            }
            Self::Key { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_position() {
        assert_eq!(
            InputEvent::PointerUp { x: 1.0, y: 2.0 }.position(),
            Some((1.0, 2.0))
        );
        let key: InputEvent = serde_json::from_str(r#"{"type":"key","key":"c","ctrl":true}"#).unwrap();
        assert_eq!(key.position(), None);
        assert!(matches!(key, InputEvent::Key { ctrl: true, meta: false, .. }));
    }
}
