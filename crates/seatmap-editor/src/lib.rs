//! Interactive layer of the seat-map editor.
//!
//! The rendering surface reports gestures and the property panel reports
//! edits; [`SyncEngine`] applies both to the [`seatmap_core::Canvas`].
//! Editing mode, drawing tools and keyboard shortcuts live here too.

pub mod editing;
pub mod input;
pub mod shortcuts;
pub mod sync;
pub mod tools;

pub use editing::{EditMode, EditingSession, Transition};
pub use input::InputEvent;
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use sync::{Mutation, PropertyEdit, Selection, SyncEngine};
pub use tools::{Tool, ToolKind};
