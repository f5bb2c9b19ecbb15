use std::cell::RefCell;
use std::rc::Rc;

use drawboard::{
    BoardEvent, BoardOptions, DrawingBoard, ElementGeometry, EventKind, InputEvent, PointerInput,
    SoftwareSurface,
};
use egui::{Color32, Pos2, Vec2};

fn new_board(width: u32, height: u32) -> DrawingBoard<SoftwareSurface> {
    DrawingBoard::new(SoftwareSurface::new(width, height), BoardOptions::default()).unwrap()
}

fn geometry(width: u32, height: u32) -> ElementGeometry {
    ElementGeometry::unscrolled(Pos2::ZERO, Vec2::new(width as f32, height as f32))
}

/// Subscribe to every event kind and record the order they fire in.
fn record(board: &mut DrawingBoard<SoftwareSurface>) -> Rc<RefCell<Vec<EventKind>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    for kind in [
        EventKind::DrawBegin,
        EventKind::Draw,
        EventKind::DrawEnd,
        EventKind::Save,
        EventKind::ToggleMode,
        EventKind::Dispose,
    ] {
        let log = Rc::clone(&log);
        board.observer().on(kind, move |event: &BoardEvent| {
            log.borrow_mut().push(event.kind());
        });
    }
    log
}

fn down(x: f32, y: f32) -> InputEvent {
    InputEvent::PointerDown(PointerInput::mouse(Pos2::new(x, y)))
}

fn moved(x: f32, y: f32) -> InputEvent {
    InputEvent::PointerMove(PointerInput::mouse(Pos2::new(x, y)))
}

#[test]
fn one_gesture_emits_begin_draws_end_save_in_order() {
    let mut board = new_board(64, 64);
    let log = record(&mut board);
    let geo = geometry(64, 64);

    board.handle_input(&down(10.0, 10.0), &geo).unwrap();
    board.handle_input(&moved(20.0, 20.0), &geo).unwrap();
    board.tick();
    board.handle_input(&InputEvent::PointerUp, &geo).unwrap();

    let events = log.borrow();
    let count = |kind| events.iter().filter(|k| **k == kind).count();
    assert_eq!(count(EventKind::DrawBegin), 1);
    assert!(count(EventKind::Draw) >= 1);
    assert_eq!(count(EventKind::DrawEnd), 1);
    assert_eq!(count(EventKind::Save), 1);

    let position = |kind| events.iter().position(|k| *k == kind).unwrap();
    assert!(position(EventKind::DrawBegin) < position(EventKind::Draw));
    assert!(position(EventKind::Draw) < position(EventKind::DrawEnd));
    assert!(position(EventKind::DrawEnd) < position(EventKind::Save));
}

#[test]
fn a_stroke_paints_the_surface() {
    let mut board = new_board(64, 64);
    let geo = geometry(64, 64);
    board.set_line_color(Color32::BLACK);

    board.handle_input(&down(10.0, 10.0), &geo).unwrap();
    board.handle_input(&moved(30.0, 10.0), &geo).unwrap();
    board.tick();
    board.handle_input(&InputEvent::PointerUp, &geo).unwrap();

    // somewhere along the smoothed segment the line color shows up
    let pixels = board.surface().pixels();
    let painted = (0..64)
        .flat_map(|y| (0..64).map(move |x| (x, y)))
        .any(|(x, y)| pixels.rgb_at(x, y) == [0, 0, 0]);
    assert!(painted);
}

#[test]
fn redundant_frames_render_nothing_and_emit_nothing() {
    let mut board = new_board(32, 32);
    let log = record(&mut board);
    let geo = geometry(32, 32);

    board.handle_input(&down(5.0, 5.0), &geo).unwrap();
    // coordinate never moved, so these ticks are all skipped
    board.tick();
    board.tick();
    board.tick();

    let draws = log
        .borrow()
        .iter()
        .filter(|k| **k == EventKind::Draw)
        .count();
    assert_eq!(draws, 0);
}

#[test]
fn pointer_cancel_while_drawing_ends_the_stroke() {
    let mut board = new_board(32, 32);
    let log = record(&mut board);
    let geo = geometry(32, 32);

    board.handle_input(&down(5.0, 5.0), &geo).unwrap();
    board.handle_input(&moved(9.0, 9.0), &geo).unwrap();
    board.tick();
    board.handle_input(&InputEvent::PointerCancel, &geo).unwrap();

    assert!(!board.is_drawing());
    let events = log.borrow();
    assert!(events.contains(&EventKind::DrawEnd));
    assert!(events.contains(&EventKind::Save));
}

#[test]
fn pointer_cancel_while_idle_emits_nothing() {
    let mut board = new_board(32, 32);
    let log = record(&mut board);
    let geo = geometry(32, 32);

    board.handle_input(&InputEvent::PointerCancel, &geo).unwrap();
    board.handle_input(&InputEvent::PointerUp, &geo).unwrap();

    assert!(log.borrow().is_empty());
}

#[test]
fn toggle_mode_flips_and_announces() {
    let mut board = new_board(32, 32);
    let log = record(&mut board);

    assert_eq!(board.mode(), drawboard::Mode::Draw);
    board.toggle_mode();
    assert_eq!(board.mode(), drawboard::Mode::Erase);
    board.toggle_mode();
    assert_eq!(board.mode(), drawboard::Mode::Draw);

    let toggles = log
        .borrow()
        .iter()
        .filter(|k| **k == EventKind::ToggleMode)
        .count();
    assert_eq!(toggles, 2);
}

#[test]
fn erase_mode_strokes_with_the_board_color() {
    let mut board = new_board(64, 64);
    let geo = geometry(64, 64);
    board.set_line_color(Color32::BLACK);
    board.set_line_size(10.0);

    // paint a blob, then erase straight over it
    for _ in 0..2 {
        board.handle_input(&down(20.0, 20.0), &geo).unwrap();
        board.handle_input(&moved(40.0, 20.0), &geo).unwrap();
        board.tick();
        board.handle_input(&InputEvent::PointerUp, &geo).unwrap();
        board.toggle_mode();
    }

    // everything is back to the white board color
    let pixels = board.surface().pixels();
    for y in 0..64 {
        for x in 0..64 {
            assert_eq!(pixels.rgb_at(x, y), [255, 255, 255], "pixel ({x}, {y})");
        }
    }
}

#[test]
fn destroy_silences_the_board() {
    let mut board = new_board(32, 32);
    let log = record(&mut board);
    let geo = geometry(32, 32);

    board.destroy();
    assert_eq!(*log.borrow(), vec![EventKind::Dispose]);

    let before = board.surface().pixels().clone();
    board.handle_input(&down(5.0, 5.0), &geo).unwrap();
    board.handle_input(&moved(20.0, 20.0), &geo).unwrap();
    board.tick();
    board.handle_input(&InputEvent::PointerUp, &geo).unwrap();
    board.fill(Color32::BLACK).unwrap();
    board.toggle_mode();

    // no new events, no paint
    assert_eq!(*log.borrow(), vec![EventKind::Dispose]);
    assert_eq!(*board.surface().pixels(), before);
}

#[test]
fn destroy_is_idempotent() {
    let mut board = new_board(16, 16);
    let log = record(&mut board);
    board.destroy();
    board.destroy();
    assert_eq!(*log.borrow(), vec![EventKind::Dispose]);
}
