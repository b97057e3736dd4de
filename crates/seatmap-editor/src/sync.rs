//! Sync engine: rendering surface ↔ seat-map model.
//!
//! The rendering surface raises notifications (object moved, rotated,
//! scaled, modified, removed; selection changed) and the property panel
//! raises edits. Both arrive here as [`Mutation`]s and are applied to the
//! [`Canvas`], which stays the single source of truth. Everything runs to
//! completion on the caller's thread, in call order.

use crate::editing::{EditMode, Transition};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::tools::{Tool, ToolKind, make_tool};
use crate::input::InputEvent;
use rand::SeedableRng;
use rand::rngs::StdRng;
use seatmap_core::clipboard::{self, ClipboardPayload};
use seatmap_core::config::{DEFAULT_BACKGROUND, EDITING_BACKGROUND};
use seatmap_core::error::{InvariantViolation, Result, violation};
use seatmap_core::{
    Canvas, CanvasObject, Color, EditorConfig, ObjectId, RenderedSeatMap, SeatMap, SeatMapObject,
    Sector, SectorSpec, Vec2, export_seat_map, render_seat_map,
};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

pub type Selection = SmallVec<[ObjectId; 8]>;

/// Property-panel edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "property", content = "value", rename_all = "camelCase")]
pub enum PropertyEdit {
    SectorId(String),
    GapX(f64),
    GapY(f64),
    Fill(Color),
    SeatRow(u32),
    SeatCol(u32),
    /// Rounded corners for rectangle seats. On a sector, applies to every
    /// seat it holds.
    CornerRadius(f64),
    VenueId(String),
    VenueSize { width: f64, height: f64 },
}

/// A change to apply to the canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// A sector drawn with a sector tool.
    AddSector(SectorSpec),
    /// The surface dragged an object.
    Move { id: ObjectId, dx: f64, dy: f64 },
    /// The surface is rotating an object to an absolute angle.
    Rotate { id: ObjectId, angle: f64 },
    /// The surface is scaling an object.
    Scaling { id: ObjectId },
    /// A surface gesture on the object finished.
    Modified { id: ObjectId },
    /// The object left the canvas.
    Remove { id: ObjectId },
    SetProperty { id: ObjectId, edit: PropertyEdit },
    SelectionChanged { ids: Vec<ObjectId> },
    SelectionCleared,
}

pub struct SyncEngine {
    pub canvas: Canvas,
    selection: Selection,
    mode: EditMode,
    config: EditorConfig,
    tool: Box<dyn Tool>,
    /// MessagePack bytes of the last copy.
    clipboard: Option<Vec<u8>>,
    rng: StdRng,
}

impl SyncEngine {
    pub fn new(canvas: Canvas, config: EditorConfig) -> Self {
        let seed = ObjectId::new().as_uuid().as_u64_pair().0;
        Self::with_seed(canvas, config, seed)
    }

    /// Engine with a fixed paste-jitter seed.
    pub fn with_seed(canvas: Canvas, config: EditorConfig, seed: u64) -> Self {
        let tool = make_tool(ToolKind::Select, &config);
        Self {
            canvas,
            selection: Selection::new(),
            mode: EditMode::Viewing,
            config,
            tool,
            clipboard: None,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn selection(&self) -> &[ObjectId] {
        &self.selection
    }

    pub fn mode(&self) -> &EditMode {
        &self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.mode.is_editing()
    }

    /// Canvas background for the current mode.
    pub fn background(&self) -> &'static str {
        if self.is_editing() {
            EDITING_BACKGROUND
        } else {
            DEFAULT_BACKGROUND
        }
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    pub fn apply_mutation(&mut self, mutation: Mutation) -> Result<()> {
        match mutation {
            Mutation::AddSector(spec) => {
                let id = self.canvas.add(Sector::new(spec)?);
                self.selection = Selection::from_slice(&[id]);
            }
            Mutation::Move { id, dx, dy } => {
                let object = self.object_mut(id)?;
                object.move_by(Vec2::new(dx, dy));
                object.on_modified();
            }
            Mutation::Rotate { id, angle } => {
                self.object_mut(id)?.rotate_to(angle);
            }
            Mutation::Scaling { id } => {
                self.object_mut(id)?.on_scaling();
            }
            Mutation::Modified { id } => {
                self.object_mut(id)?.on_modified();
            }
            Mutation::Remove { id } => {
                self.remove(id);
            }
            Mutation::SetProperty { id, edit } => self.set_property(id, edit)?,
            Mutation::SelectionChanged { ids } => {
                self.selection = ids.into_iter().collect();
            }
            Mutation::SelectionCleared => self.selection.clear(),
        }
        Ok(())
    }

    fn object_mut(&mut self, id: ObjectId) -> Result<&mut dyn SeatMapObject> {
        self.canvas
            .object_mut(id)
            .ok_or_else(|| violation(InvariantViolation::UnknownObject(id)))
    }

    /// Remove from the canvas and keep the editing session in step.
    /// The venue and unknown ids are ignored.
    fn remove(&mut self, id: ObjectId) -> Option<CanvasObject> {
        if let Some(session) = self.mode.session_mut()
            && session.on_object_removed(id)
        {
            log::debug!("editing: seat {id} dropped from session");
        }
        self.selection.retain(|s| *s != id);
        self.canvas.remove(id)
    }

    fn set_property(&mut self, id: ObjectId, edit: PropertyEdit) -> Result<()> {
        if self.canvas.is_venue(id) {
            let venue = self.canvas.venue_mut();
            return match edit {
                PropertyEdit::VenueId(venue_id) => {
                    venue.set_venue_id(venue_id);
                    Ok(())
                }
                PropertyEdit::VenueSize { width, height } => {
                    venue.resize(width, height)?;
                    venue.on_modified();
                    Ok(())
                }
                _ => Err(unsupported(id, "venue")),
            };
        }

        if let Some(CanvasObject::Sector(sector)) = self.canvas.get_mut(id) {
            return match edit {
                PropertyEdit::SectorId(sector_id) => {
                    sector.set_sector_id(sector_id);
                    Ok(())
                }
                PropertyEdit::GapX(gap) => sector.set_gap_x(gap),
                PropertyEdit::GapY(gap) => sector.set_gap_y(gap),
                PropertyEdit::Fill(fill) => {
                    sector.set_fill(fill);
                    Ok(())
                }
                PropertyEdit::CornerRadius(radius) => {
                    sector.set_corner_radius(radius);
                    Ok(())
                }
                _ => Err(unsupported(id, "sector")),
            };
        }

        let edited = self.canvas.edit_seat(id, |seat| match edit {
            PropertyEdit::SeatRow(row) => seat.set_row(row),
            PropertyEdit::SeatCol(col) => seat.set_col(col),
            PropertyEdit::Fill(fill) => {
                seat.set_fill(fill);
                Ok(())
            }
            PropertyEdit::CornerRadius(radius) => {
                seat.set_corner_radius(radius);
                Ok(())
            }
            _ => Err(unsupported(id, "seat")),
        });
        edited.unwrap_or_else(|| Err(violation(InvariantViolation::UnknownObject(id))))
    }

    // ─── Tools ───────────────────────────────────────────────────────────

    pub fn tool(&self) -> ToolKind {
        self.tool.kind()
    }

    pub fn set_tool(&mut self, kind: ToolKind) {
        if self.tool.kind() != kind {
            self.tool = make_tool(kind, &self.config);
        }
    }

    pub fn tool_preview(&self) -> Option<(f64, f64, f64, f64)> {
        self.tool.preview()
    }

    /// Feed a pointer event to the active tool. A rejected gesture reverts
    /// to the select tool before the error is returned.
    pub fn handle_input(&mut self, event: &InputEvent) -> Result<()> {
        let mutations = match self.tool.handle(event) {
            Ok(m) => m,
            Err(e) => {
                log::warn!("{} cancelled: {e}", self.tool.kind().name());
                self.set_tool(ToolKind::Select);
                return Err(e);
            }
        };
        let drew = !mutations.is_empty();
        for m in mutations {
            self.apply_mutation(m)?;
        }
        if drew {
            self.set_tool(ToolKind::Select);
        }
        Ok(())
    }

    /// Resolve and run a keyboard shortcut. Returns the action taken.
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> Result<Option<ShortcutAction>> {
        let Some(action) = ShortcutMap::resolve(key, ctrl, shift, alt, meta) else {
            return Ok(None);
        };
        self.run_action(action)?;
        Ok(Some(action))
    }

    pub fn run_action(&mut self, action: ShortcutAction) -> Result<()> {
        match action {
            ShortcutAction::Copy => {
                self.copy()?;
            }
            ShortcutAction::Cut => {
                self.cut()?;
            }
            ShortcutAction::Paste => {
                self.paste()?;
            }
            ShortcutAction::Delete => {
                self.delete_selected();
            }
            ShortcutAction::SelectAll => {
                self.select_all();
            }
            ShortcutAction::SendBackward => self.reorder(Canvas::send_backward),
            ShortcutAction::BringForward => self.reorder(Canvas::bring_forward),
            ShortcutAction::SendToBack => self.reorder(Canvas::send_to_back),
            ShortcutAction::BringToFront => self.reorder(Canvas::bring_to_front),
            ShortcutAction::ToggleEditing => {
                self.toggle_editing()?;
            }
            ShortcutAction::ResetTool => self.set_tool(ToolKind::Select),
        }
        Ok(())
    }

    // ─── Actions ─────────────────────────────────────────────────────────

    /// Copy the selection. Returns how many objects were copied.
    pub fn copy(&mut self) -> Result<usize> {
        let payload = clipboard::copy(&self.canvas, &self.selection)?;
        let n = payload.objects().len();
        if n > 0 {
            self.clipboard = Some(payload.to_bytes()?);
        }
        Ok(n)
    }

    pub fn cut(&mut self) -> Result<usize> {
        let n = self.copy()?;
        self.delete_selected();
        Ok(n)
    }

    /// Paste the last copy with one random offset; the pasted objects
    /// become the selection.
    pub fn paste(&mut self) -> Result<Vec<ObjectId>> {
        let Some(bytes) = self.clipboard.as_deref() else {
            return Ok(Vec::new());
        };
        let payload = ClipboardPayload::from_bytes(bytes)?;
        let offset = clipboard::paste_offset(&mut self.rng, self.config.paste_jitter);
        let objects = clipboard::paste(&payload, offset)?;

        let mut ids = Vec::with_capacity(objects.len());
        for object in objects {
            let is_seat = matches!(object, CanvasObject::Seat(_));
            let id = self.canvas.add(object);
            if is_seat && let Some(session) = self.mode.session_mut() {
                session.register_seat(id);
            }
            ids.push(id);
        }
        log::debug!("pasted {} object(s) at offset {:.1}", ids.len(), offset.x);
        self.selection = ids.iter().copied().collect();
        Ok(ids)
    }

    /// Remove every selected object. The venue is never removed.
    pub fn delete_selected(&mut self) -> Vec<ObjectId> {
        let targets: Vec<ObjectId> = self.selection.iter().copied().collect();
        targets
            .into_iter()
            .filter(|id| self.remove(*id).is_some())
            .collect()
    }

    /// Select every interactive object.
    pub fn select_all(&mut self) -> &[ObjectId] {
        self.selection = self
            .canvas
            .objects()
            .iter()
            .filter(|o| o.base().appearance.selectable)
            .map(CanvasObject::id)
            .collect();
        &self.selection
    }

    fn reorder(&mut self, op: fn(&mut Canvas, ObjectId) -> bool) {
        for id in self.selection.clone() {
            op(&mut self.canvas, id);
        }
    }

    /// Enter or leave editing mode on the selected sector.
    pub fn toggle_editing(&mut self) -> Result<Transition> {
        let transition = self
            .mode
            .toggle(&mut self.canvas, &self.selection, &self.config)?;
        self.selection = match &transition {
            Transition::Entered { seats } => seats.iter().copied().collect(),
            Transition::Exited { sector } => Selection::from_slice(&[*sector]),
        };
        Ok(transition)
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// The document as JSON. Refused while a sector is being edited, since
    /// the canvas then holds the sector's seats loose.
    pub fn save_document(&self) -> Result<String> {
        self.ensure_viewing()?;
        self.canvas.to_json()
    }

    /// Replace the document. The selection is dropped and the select tool
    /// restored; the clipboard survives.
    pub fn load_document(&mut self, json: &str) -> Result<()> {
        self.ensure_viewing()?;
        self.canvas = Canvas::from_json(json)?;
        self.selection.clear();
        self.tool = make_tool(ToolKind::Select, &self.config);
        log::info!("loaded document with {} object(s)", self.canvas.len());
        Ok(())
    }

    fn ensure_viewing(&self) -> Result<()> {
        if self.is_editing() {
            return Err(violation(InvariantViolation::EditingInProgress));
        }
        Ok(())
    }

    // ─── Export ──────────────────────────────────────────────────────────

    pub fn export(&self) -> Result<SeatMap> {
        export_seat_map(&self.canvas)
    }

    pub fn render(&self) -> Result<RenderedSeatMap> {
        Ok(render_seat_map(&self.export()?))
    }
}

fn unsupported(id: ObjectId, kind: &'static str) -> seatmap_core::SeatMapError {
    violation(InvariantViolation::UnsupportedObject { id, kind })
}
