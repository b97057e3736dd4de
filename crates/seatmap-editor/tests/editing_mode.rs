//! Integration tests: editing mode and export through the sync engine
//! (seatmap-editor ↔ seatmap-core).

use pretty_assertions::assert_eq;
use seatmap_core::export::SeatShape;
use seatmap_core::{
    Appearance, Canvas, EditorConfig, InvariantViolation, ObjectId, SeatMapError, SeatMapObject, Venue,
};
use seatmap_editor::{InputEvent, Mutation, ShortcutAction, SyncEngine, ToolKind, Transition};

fn engine() -> SyncEngine {
    let canvas = Canvas::new(Venue::new("arena", 1000.0, 800.0).unwrap());
    SyncEngine::with_seed(canvas, EditorConfig::default(), 7)
}

/// Drag out a sector with the given tool; returns its id.
fn draw_sector(engine: &mut SyncEngine, tool: ToolKind, from: (f64, f64), to: (f64, f64)) -> ObjectId {
    engine.set_tool(tool);
    engine
        .handle_input(&InputEvent::PointerDown { x: from.0, y: from.1 })
        .unwrap();
    engine
        .handle_input(&InputEvent::PointerMove { x: to.0, y: to.1 })
        .unwrap();
    engine
        .handle_input(&InputEvent::PointerUp { x: to.0, y: to.1 })
        .unwrap();
    engine.selection()[0]
}

fn press(engine: &mut SyncEngine, key: &str, cmd: bool) -> Option<ShortcutAction> {
    engine.handle_key(key, cmd, false, false, false).unwrap()
}

fn seat_centers(engine: &SyncEngine) -> Vec<(f64, f64)> {
    engine
        .export()
        .unwrap()
        .sectors
        .iter()
        .flat_map(|s| s.seats.iter())
        .map(|seat| match seat.seat_shape {
            SeatShape::Circle { cx, cy, .. } => (cx, cy),
            SeatShape::Rectangle { x, y, .. } => (x, y),
        })
        .collect()
}

// ─── Editing round trip ─────────────────────────────────────────────────

#[test]
fn deleting_seats_while_editing_shrinks_the_sector() {
    let mut e = engine();
    let sector = draw_sector(&mut e, ToolKind::CircleSector, (100.0, 100.0), (260.0, 220.0));
    assert_eq!(e.canvas.sector(sector).unwrap().seats().len(), 12);

    let Transition::Entered { seats } = e.toggle_editing().unwrap() else {
        panic!("expected to enter editing mode");
    };
    assert_eq!(seats.len(), 12);

    e.apply_mutation(Mutation::SelectionChanged {
        ids: seats[..5].to_vec(),
    })
    .unwrap();
    assert_eq!(press(&mut e, "Backspace", false), Some(ShortcutAction::Delete));

    let Transition::Exited { sector } = e.toggle_editing().unwrap() else {
        panic!("expected to leave editing mode");
    };
    let sector = e.canvas.sector(sector).unwrap();
    assert_eq!(sector.seats().len(), 7);
    assert!(!sector.is_grid_authoritative());
    assert_eq!(e.export().unwrap().seat_count(), 7);
}

#[test]
fn pasted_seat_joins_the_sector() {
    let mut e = engine();
    draw_sector(&mut e, ToolKind::RectSector, (0.0, 0.0), (80.0, 40.0));
    let Transition::Entered { seats } = e.toggle_editing().unwrap() else {
        panic!("expected to enter editing mode");
    };

    e.apply_mutation(Mutation::SelectionChanged { ids: vec![seats[0]] })
        .unwrap();
    press(&mut e, "c", true);
    press(&mut e, "v", true);
    assert_eq!(e.mode().session().unwrap().seat_ids().len(), 3);

    let Transition::Exited { sector } = e.toggle_editing().unwrap() else {
        panic!("expected to leave editing mode");
    };
    assert_eq!(e.canvas.sector(sector).unwrap().seats().len(), 3);
}

#[test]
fn untouched_round_trip_keeps_seat_positions() {
    let mut e = engine();
    let sector = draw_sector(&mut e, ToolKind::CircleSector, (200.0, 200.0), (320.0, 280.0));
    e.apply_mutation(Mutation::Rotate {
        id: sector,
        angle: 90.0,
    })
    .unwrap();
    let before = seat_centers(&e);

    press(&mut e, "e", false);
    assert!(e.is_editing());
    press(&mut e, "e", false);
    assert!(!e.is_editing());

    let after = seat_centers(&e);
    assert_eq!(before.len(), after.len());
    for ((bx, by), (ax, ay)) in before.iter().zip(&after) {
        assert!((bx - ax).abs() < 1e-9 && (by - ay).abs() < 1e-9);
    }
}

#[test]
fn moved_seat_keeps_its_new_place() {
    let mut e = engine();
    draw_sector(&mut e, ToolKind::CircleSector, (0.0, 0.0), (40.0, 40.0));
    let Transition::Entered { seats } = e.toggle_editing().unwrap() else {
        panic!("expected to enter editing mode");
    };
    e.apply_mutation(Mutation::Move {
        id: seats[0],
        dx: 30.0,
        dy: 10.0,
    })
    .unwrap();
    e.toggle_editing().unwrap();

    let venue = e.canvas.venue().origin();
    let (cx, cy) = seat_centers(&e)[0];
    assert_eq!((cx + venue.x, cy + venue.y), (50.0, 30.0));
}

#[test]
fn export_while_editing_is_refused() {
    let mut e = engine();
    draw_sector(&mut e, ToolKind::CircleSector, (0.0, 0.0), (40.0, 40.0));
    e.toggle_editing().unwrap();
    let err = e.export().unwrap_err();
    assert!(matches!(
        err,
        SeatMapError::Invariant(InvariantViolation::LooseSeat(_))
    ));
}

#[test]
fn saving_or_loading_while_editing_is_refused() {
    let mut e = engine();
    let other = draw_sector(&mut e, ToolKind::RectSector, (400.0, 400.0), (480.0, 440.0));
    draw_sector(&mut e, ToolKind::CircleSector, (0.0, 0.0), (80.0, 40.0));
    let saved = e.save_document().unwrap();

    e.toggle_editing().unwrap();
    let err = e.save_document().unwrap_err();
    assert!(matches!(
        err,
        SeatMapError::Invariant(InvariantViolation::EditingInProgress)
    ));
    assert!(e.load_document(&saved).unwrap_err().is_fatal());
    assert!(e.is_editing());

    // interaction state never reaches the document
    let leaked = e.canvas.to_json().unwrap();
    let mut reloaded = engine();
    reloaded.load_document(&leaked).unwrap();
    let dimmed = reloaded.canvas.get(other).unwrap().base().appearance;
    assert_eq!(dimmed, Appearance::default());
    assert!(reloaded.canvas.venue().base().appearance.visible);

    e.toggle_editing().unwrap();
    let mut fresh = engine();
    fresh.load_document(&e.save_document().unwrap()).unwrap();
    assert!(fresh.selection().is_empty());
    assert_eq!(fresh.export().unwrap().seat_count(), 4);
}

#[test]
fn toggling_with_nothing_selected_is_fatal() {
    let mut e = engine();
    let err = e.toggle_editing().unwrap_err();
    assert!(err.is_fatal());
    assert!(!e.is_editing());
}

// ─── Tools ──────────────────────────────────────────────────────────────

#[test]
fn escape_drops_the_drawing_tool() {
    let mut e = engine();
    e.set_tool(ToolKind::RectSector);
    press(&mut e, "Escape", false);
    assert_eq!(e.tool(), ToolKind::Select);
}

#[test]
fn click_without_drag_leaves_canvas_untouched() {
    let mut e = engine();
    e.set_tool(ToolKind::CircleSector);
    e.handle_input(&InputEvent::PointerDown { x: 10.0, y: 10.0 })
        .unwrap();
    let err = e
        .handle_input(&InputEvent::PointerUp { x: 10.0, y: 10.0 })
        .unwrap_err();
    assert!(err.rejection().is_some());
    assert!(e.canvas.is_empty());
    assert_eq!(e.tool(), ToolKind::Select);
}

// ─── Export flow ────────────────────────────────────────────────────────

#[test]
fn full_export_flow() {
    let mut e = engine();
    let a = draw_sector(&mut e, ToolKind::CircleSector, (100.0, 100.0), (180.0, 140.0));
    let b = draw_sector(&mut e, ToolKind::RectSector, (300.0, 100.0), (340.0, 180.0));
    for (id, name) in [(a, "A"), (b, "B")] {
        e.apply_mutation(Mutation::SetProperty {
            id,
            edit: seatmap_editor::PropertyEdit::SectorId(name.into()),
        })
        .unwrap();
    }

    let map = e.export().unwrap();
    assert_eq!(map.file_name(), "venue_arena.json");
    assert_eq!(map.sectors.len(), 2);
    assert_eq!(map.seat_count(), 4);

    let rendered = e.render().unwrap();
    assert_eq!(rendered.seats.len(), rendered.mapping.len());
    let sectors: Vec<&str> = rendered.mapping.iter().map(|m| m.sector_id.as_str()).collect();
    assert_eq!(sectors, ["A", "A", "B", "B"]);
    for (tag, m) in rendered.seats.iter().zip(&rendered.mapping) {
        assert!(tag.contains(&format!(r#"id="{}""#, m.seat_id)));
    }
}
