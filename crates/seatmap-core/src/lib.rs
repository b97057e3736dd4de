pub mod canvas;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod export;
pub mod id;
pub mod legacy;
pub mod model;
pub mod render;
pub mod seat;
pub mod sector;
pub mod shapes;
pub mod venue;

pub use canvas::{Canvas, CanvasObject};
pub use clipboard::ClipboardPayload;
pub use config::EditorConfig;
pub use error::{InvariantViolation, Rejection, Result, SeatMapError};
pub use export::{SeatMap, export_seat_map};
pub use id::ObjectId;
pub use model::*;
pub use render::{RenderedSeatMap, html_preview, render_seat_map};
pub use seat::{SEAT_SIZE, Seat};
pub use sector::{Sector, SectorSpec};
pub use shapes::{BackgroundImage, Primitive, Shape};
pub use venue::Venue;

// Re-export kurbo so downstream crates don't need a direct dependency
pub use kurbo::{Point, Vec2};
