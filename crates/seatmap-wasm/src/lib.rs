//! WASM bridge for the seat-map editor: exposes the sync engine to the
//! browser rendering surface.
//!
//! Compiled via `wasm-pack build --target web`. The surface (a canvas
//! library on the JS side) owns drawing and hit-testing and forwards its
//! notifications here; every call returns plain values or a JSON string.

use seatmap_core::error::{Rejection, rejection};
use seatmap_core::{
    BackgroundImage, Canvas, CanvasObject, Color, EditorConfig, ObjectId, SeatMapError,
    SeatMapObject, Venue, html_preview,
};
use seatmap_editor::{InputEvent, Mutation, PropertyEdit, SyncEngine, ToolKind, Transition};
use wasm_bindgen::prelude::*;

/// The main WASM-facing editor controller.
#[wasm_bindgen]
pub struct SeatMapEditor {
    engine: SyncEngine,
}

#[wasm_bindgen]
impl SeatMapEditor {
    /// A fresh document with a venue centred in a `width × height` viewport.
    #[wasm_bindgen(constructor)]
    pub fn new(venue_id: &str, width: f64, height: f64) -> Result<SeatMapEditor, JsError> {
        Self::build(venue_id, width, height, EditorConfig::default())
    }

    /// Like the constructor, with an `EditorConfig` JSON object.
    pub fn with_config(
        venue_id: &str,
        width: f64,
        height: f64,
        config: &str,
    ) -> Result<SeatMapEditor, JsError> {
        let config = EditorConfig::from_json(config).map_err(|e| JsError::new(&e.to_string()))?;
        Self::build(venue_id, width, height, config)
    }

    /// Replace the document with a saved one. Returns `true` on success;
    /// refused while a sector is being edited.
    pub fn load_document(&mut self, json: &str) -> bool {
        match self.engine.load_document(json) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("load failed: {e}");
                false
            }
        }
    }

    /// The document as JSON, or `undefined` while a sector is being edited.
    pub fn save_document(&self) -> Option<String> {
        match self.engine.save_document() {
            Ok(json) => Some(json),
            Err(e) => {
                log::warn!("save failed: {e}");
                None
            }
        }
    }

    /// `"#F2F2F2"` normally, grey while editing a sector.
    pub fn background(&self) -> String {
        self.engine.background().to_string()
    }

    pub fn is_editing(&self) -> bool {
        self.engine.is_editing()
    }

    // ─── Pointer & Tools ─────────────────────────────────────────────────

    pub fn handle_pointer_down(&mut self, x: f64, y: f64) -> String {
        self.input(InputEvent::PointerDown { x, y })
    }

    pub fn handle_pointer_move(&mut self, x: f64, y: f64) -> String {
        self.input(InputEvent::PointerMove { x, y })
    }

    /// Returns `{"ok":true,"tool":...}` or an error object with a user
    /// notice when the drawn sector was too small.
    pub fn handle_pointer_up(&mut self, x: f64, y: f64) -> String {
        self.input(InputEvent::PointerUp { x, y })
    }

    pub fn set_tool(&mut self, name: &str) {
        if let Some(kind) = ToolKind::from_name(name) {
            self.engine.set_tool(kind);
        }
    }

    pub fn get_tool_name(&self) -> String {
        self.engine.tool().name().to_string()
    }

    /// Ghost rectangle for the drawing tool, `{"x","y","width","height"}`
    /// or `null`.
    pub fn get_tool_preview(&self) -> String {
        match self.engine.tool_preview() {
            Some((x, y, width, height)) => serde_json::json!({
                "x": x,
                "y": y,
                "width": width,
                "height": height,
                "opacity": seatmap_editor::tools::PREVIEW_OPACITY,
            })
            .to_string(),
            None => "null".to_string(),
        }
    }

    // ─── Keyboard Shortcut API ───────────────────────────────────────────

    /// Handle a keyboard event. Returns JSON
    /// `{"ok":bool,"action":"<name>","tool":"<name>"}`.
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> String {
        match self.engine.handle_key(key, ctrl, shift, alt, meta) {
            Ok(action) => serde_json::json!({
                "ok": true,
                "action": action.map_or("none", |a| a.name()),
                "tool": self.engine.tool().name(),
            })
            .to_string(),
            Err(e) => error_json(&e),
        }
    }

    // ─── Surface Notifications ───────────────────────────────────────────

    pub fn object_moved(&mut self, id: &str, dx: f64, dy: f64) -> String {
        self.with_id(id, |id| Mutation::Move { id, dx, dy })
    }

    pub fn object_rotating(&mut self, id: &str, angle: f64) -> String {
        self.with_id(id, |id| Mutation::Rotate { id, angle })
    }

    pub fn object_scaling(&mut self, id: &str) -> String {
        self.with_id(id, |id| Mutation::Scaling { id })
    }

    pub fn object_modified(&mut self, id: &str) -> String {
        self.with_id(id, |id| Mutation::Modified { id })
    }

    pub fn object_removed(&mut self, id: &str) -> String {
        self.with_id(id, |id| Mutation::Remove { id })
    }

    /// `ids` is a JSON array of object ids.
    pub fn selection_changed(&mut self, ids: &str) -> bool {
        match serde_json::from_str::<Vec<ObjectId>>(ids) {
            Ok(ids) => self
                .engine
                .apply_mutation(Mutation::SelectionChanged { ids })
                .is_ok(),
            Err(e) => {
                log::warn!("bad selection payload: {e}");
                false
            }
        }
    }

    pub fn selection_cleared(&mut self) {
        let _ = self.engine.apply_mutation(Mutation::SelectionCleared);
    }

    /// Selected ids as a JSON array.
    pub fn get_selected_ids(&self) -> String {
        serde_json::to_string(self.engine.selection()).unwrap_or_else(|_| "[]".to_string())
    }

    // ─── Editing & Clipboard ─────────────────────────────────────────────

    /// Returns `{"ok":true,"editing":bool,"ids":[...]}`.
    pub fn toggle_editing(&mut self) -> String {
        match self.engine.toggle_editing() {
            Ok(Transition::Entered { seats }) => {
                serde_json::json!({ "ok": true, "editing": true, "ids": seats }).to_string()
            }
            Ok(Transition::Exited { sector }) => {
                serde_json::json!({ "ok": true, "editing": false, "ids": [sector] }).to_string()
            }
            Err(e) => error_json(&e),
        }
    }

    pub fn copy(&mut self) -> String {
        match self.engine.copy() {
            Ok(n) => serde_json::json!({ "ok": true, "count": n }).to_string(),
            Err(e) => error_json(&e),
        }
    }

    pub fn paste(&mut self) -> String {
        match self.engine.paste() {
            Ok(ids) => serde_json::json!({ "ok": true, "ids": ids }).to_string(),
            Err(e) => error_json(&e),
        }
    }

    pub fn delete_selected(&mut self) -> bool {
        !self.engine.delete_selected().is_empty()
    }

    /// Place a JPEG under the seats. Returns the new object id.
    pub fn add_image(&mut self, jpeg: &[u8], left: f64, top: f64, width: f64, height: f64) -> String {
        let image = BackgroundImage::new(jpeg.to_vec(), left, top, width, height);
        let id = self.engine.canvas.add(image);
        self.engine.canvas.send_to_back(id);
        id.to_string()
    }

    // ─── Properties Panel API ────────────────────────────────────────────

    /// Properties of the first selected object (or the venue when nothing
    /// is selected) as JSON.
    pub fn get_selected_props(&self) -> String {
        let canvas = &self.engine.canvas;
        let id = self
            .engine
            .selection()
            .first()
            .copied()
            .unwrap_or_else(|| canvas.venue().id());

        if canvas.is_venue(id) {
            let venue = canvas.venue();
            return serde_json::json!({
                "id": id,
                "kind": "venue",
                "venueId": venue.venue_id(),
                "width": venue.width(),
                "height": venue.height(),
            })
            .to_string();
        }

        let props = match canvas.get(id) {
            Some(CanvasObject::Sector(sector)) => serde_json::json!({
                "id": id,
                "kind": "sector",
                "sectorId": sector.sector_id(),
                "rows": sector.rows(),
                "cols": sector.cols(),
                "gapX": sector.gap_x(),
                "gapY": sector.gap_y(),
                "fill": sector.fill(),
                "angle": sector.angle(),
            }),
            Some(CanvasObject::Seat(seat)) => serde_json::json!({
                "id": id,
                "kind": "seat",
                "row": seat.row(),
                "col": seat.col(),
                "fill": seat.fill(),
                "cornerRadius": seat.corner_radius(),
            }),
            Some(other) => serde_json::json!({
                "id": id,
                "kind": other.kind().as_str(),
                "angle": other.as_object().transform().angle,
            }),
            None => serde_json::json!({}),
        };
        props.to_string()
    }

    /// Set a property on the first selected object (or the venue).
    /// Returns `{"ok":true}` or an error object.
    pub fn set_prop(&mut self, key: &str, value: &str) -> String {
        let id = self
            .engine
            .selection()
            .first()
            .copied()
            .unwrap_or_else(|| self.engine.canvas.venue().id());

        let edit = match parse_edit(&self.engine.canvas, key, value) {
            Ok(Some(edit)) => edit,
            Ok(None) => return error_str(&format!("unknown property `{key}`")),
            Err(e) => return error_json(&e),
        };
        match self.engine.apply_mutation(Mutation::SetProperty { id, edit }) {
            Ok(()) => r#"{"ok":true}"#.to_string(),
            Err(e) => error_json(&e),
        }
    }

    // ─── Export ──────────────────────────────────────────────────────────

    /// Returns `{"ok":true,"fileName":...,"seatMap":{...}}`.
    pub fn export_json(&self) -> String {
        match self.engine.export() {
            Ok(map) => serde_json::json!({
                "ok": true,
                "fileName": map.file_name(),
                "seatMap": map,
            })
            .to_string(),
            Err(e) => error_json(&e),
        }
    }

    /// The venue-ready markup: `{"ok":true,"rendered":{...},"html":"..."}`.
    pub fn render_json(&self) -> String {
        match self.engine.render() {
            Ok(rendered) => {
                let html = html_preview(&rendered);
                serde_json::json!({ "ok": true, "rendered": rendered, "html": html }).to_string()
            }
            Err(e) => error_json(&e),
        }
    }
}

impl SeatMapEditor {
    fn build(
        venue_id: &str,
        width: f64,
        height: f64,
        config: EditorConfig,
    ) -> Result<SeatMapEditor, JsError> {
        console_setup();
        let venue = Venue::for_viewport(venue_id, width, height, &config)
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(Self {
            engine: SyncEngine::new(Canvas::new(venue), config),
        })
    }

    fn input(&mut self, event: InputEvent) -> String {
        match self.engine.handle_input(&event) {
            Ok(()) => serde_json::json!({
                "ok": true,
                "tool": self.engine.tool().name(),
                "selected": self.engine.selection(),
            })
            .to_string(),
            Err(e) => error_json(&e),
        }
    }

    fn with_id(&mut self, id: &str, make: impl FnOnce(ObjectId) -> Mutation) -> String {
        let Ok(id) = id.parse::<ObjectId>() else {
            return error_str(&format!("invalid object id `{id}`"));
        };
        match self.engine.apply_mutation(make(id)) {
            Ok(()) => r#"{"ok":true}"#.to_string(),
            Err(e) => error_json(&e),
        }
    }
}

/// Panel key/value → property edit. `Ok(None)` for unknown keys.
fn parse_edit(canvas: &Canvas, key: &str, value: &str) -> Result<Option<PropertyEdit>, SeatMapError> {
    let number = || -> Result<f64, SeatMapError> {
        value
            .trim()
            .parse::<f64>()
            .map_err(|_| rejection(Rejection::InvalidNumber(value.to_string())))
    };
    let count = || -> Result<u32, SeatMapError> {
        value
            .trim()
            .parse::<u32>()
            .map_err(|_| rejection(Rejection::InvalidNumber(value.to_string())))
    };

    let edit = match key {
        "sectorId" => PropertyEdit::SectorId(value.to_string()),
        "venueId" => PropertyEdit::VenueId(value.to_string()),
        "gapX" => PropertyEdit::GapX(number()?),
        "gapY" => PropertyEdit::GapY(number()?),
        "row" => PropertyEdit::SeatRow(count()?),
        "col" => PropertyEdit::SeatCol(count()?),
        "cornerRadius" => PropertyEdit::CornerRadius(number()?),
        "fill" => match Color::from_hex(value) {
            Some(color) => PropertyEdit::Fill(color),
            None => return Err(rejection(Rejection::InvalidColor(value.to_string()))),
        },
        "width" => PropertyEdit::VenueSize {
            width: number()?,
            height: canvas.venue().height(),
        },
        "height" => PropertyEdit::VenueSize {
            width: canvas.venue().width(),
            height: number()?,
        },
        _ => return Ok(None),
    };
    Ok(Some(edit))
}

fn error_json(e: &SeatMapError) -> String {
    serde_json::json!({
        "ok": false,
        "fatal": e.is_fatal(),
        "error": e.to_string(),
    })
    .to_string()
}

fn error_str(msg: &str) -> String {
    serde_json::json!({ "ok": false, "fatal": false, "error": msg }).to_string()
}

// ─── Console plumbing ────────────────────────────────────────────────────

/// Route panics and `log` records to the browser console.
fn console_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("seatmap WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
            if log::set_logger(&ConsoleLogger).is_ok() {
                log::set_max_level(log::LevelFilter::Info);
            }
        });
    }
}

#[cfg(target_arch = "wasm32")]
struct ConsoleLogger;

#[cfg(target_arch = "wasm32")]
impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = js_sys::JsString::from(format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&msg),
            log::Level::Warn => web_sys::console::warn_1(&msg),
            _ => web_sys::console::log_1(&msg),
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn editor() -> SeatMapEditor {
        let Ok(editor) = SeatMapEditor::new("main-hall", 1000.0, 1000.0) else {
            panic!("editor construction failed");
        };
        editor
    }

    fn json(s: &str) -> serde_json::Value {
        serde_json::from_str(s).unwrap()
    }

    fn draw(ed: &mut SeatMapEditor, tool: &str, from: (f64, f64), to: (f64, f64)) -> serde_json::Value {
        ed.set_tool(tool);
        ed.handle_pointer_down(from.0, from.1);
        ed.handle_pointer_move(to.0, to.1);
        json(&ed.handle_pointer_up(to.0, to.1))
    }

    #[test]
    fn venue_is_centred() {
        let ed = editor();
        let props = json(&ed.get_selected_props());
        assert_eq!(props["kind"], "venue");
        assert_eq!(props["width"], 700.0);
        assert_eq!(props["height"], 800.0);
    }

    #[test]
    fn draw_then_export() {
        let mut ed = editor();
        let out = draw(&mut ed, "circleSector", (200.0, 200.0), (280.0, 240.0));
        assert_eq!(out["ok"], true);
        assert_eq!(out["tool"], "select");

        let props = json(&ed.get_selected_props());
        assert_eq!(props["kind"], "sector");
        assert_eq!(props["cols"], 2);

        let export = json(&ed.export_json());
        assert_eq!(export["fileName"], "venue_main-hall.json");
        assert_eq!(export["seatMap"]["sectors"][0]["seats"].as_array().unwrap().len(), 2);

        let rendered = json(&ed.render_json());
        assert!(rendered["html"].as_str().unwrap().starts_with("<svg"));
    }

    #[test]
    fn too_small_sector_reports_notice() {
        let mut ed = editor();
        let out = draw(&mut ed, "rectSector", (10.0, 10.0), (10.0, 10.0));
        assert_eq!(out["ok"], false);
        assert_eq!(out["fatal"], false);
        assert_eq!(ed.get_tool_name(), "select");
    }

    #[test]
    fn panel_edits() {
        let mut ed = editor();
        draw(&mut ed, "circleSector", (0.0, 0.0), (120.0, 40.0));
        assert_eq!(json(&ed.set_prop("gapX", "6"))["ok"], true);
        assert_eq!(json(&ed.set_prop("fill", "#FF0000"))["ok"], true);
        assert_eq!(json(&ed.set_prop("fill", "#12345"))["ok"], false);
        assert_eq!(json(&ed.set_prop("gapY", "-2"))["ok"], false);
        assert_eq!(json(&ed.set_prop("gapY", "wide"))["ok"], false);

        let props = json(&ed.get_selected_props());
        assert_eq!(props["gapX"], 6.0);
        assert_eq!(props["fill"], "#FF0000");
    }

    #[test]
    fn corner_radius_reaches_export() {
        let mut ed = editor();
        draw(&mut ed, "rectSector", (0.0, 0.0), (80.0, 40.0));
        assert_eq!(json(&ed.set_prop("cornerRadius", "6"))["ok"], true);
        assert_eq!(json(&ed.set_prop("cornerRadius", "round"))["ok"], false);

        let out = json(&ed.export_json());
        let shape = &out["seatMap"]["sectors"][0]["seats"][1]["seatShape"];
        assert_eq!(shape["rx"], 6.0);
        assert_eq!(shape["ry"], 6.0);
    }

    #[test]
    fn editing_via_keyboard() {
        let mut ed = editor();
        draw(&mut ed, "circleSector", (0.0, 0.0), (80.0, 80.0));
        let out = json(&ed.handle_key("e", false, false, false, false));
        assert_eq!(out["action"], "toggleEditing");
        assert!(ed.is_editing());
        assert_eq!(ed.background(), "#D9D9D9");

        let ids: Vec<String> = serde_json::from_str(&ed.get_selected_ids()).unwrap();
        assert_eq!(ids.len(), 4);
        assert_eq!(json(&ed.object_removed(&ids[0]))["ok"], true);

        let out = json(&ed.toggle_editing());
        assert_eq!(out["editing"], false);
        let props = json(&ed.get_selected_props());
        assert_eq!(props["rows"], 0);
    }

    #[test]
    fn document_round_trip() {
        let mut ed = editor();
        draw(&mut ed, "rectSector", (0.0, 0.0), (40.0, 40.0));
        let Some(saved) = ed.save_document() else {
            panic!("save refused");
        };

        let mut other = editor();
        assert!(other.load_document(&saved));
        assert_eq!(other.save_document().as_deref(), Some(saved.as_str()));
        assert!(!other.load_document("{"));

        ed.toggle_editing();
        assert!(ed.is_editing());
        assert_eq!(ed.save_document(), None);
        assert!(!ed.load_document(&saved));
        assert!(ed.is_editing());
    }
}
