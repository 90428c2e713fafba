//! End-to-end gesture scenarios driven through the public engine API

use pianoroll_core::conversion::{pixel_from_pitch, pixel_from_tick};
use pianoroll_core::grid::ticks_per_grid_line;
use pianoroll_core::{
    GestureEngine, GestureEvent, GestureMode, GuardTier, LanePoint, MoveOutcome, Note, NoteEditContext, NoteId,
    PointerEvent, ViewConfig,
};

fn note(id: u64, pitch: u8, tick: u64, duration: u64) -> Note {
    Note::new(NoteId(id), pitch, 100, tick, duration).unwrap()
}

fn view(scale_x: f32) -> ViewConfig {
    ViewConfig { scale_x, ..Default::default() }
}

fn lane_y(pitch: u8) -> f32 {
    pixel_from_pitch(128, pitch as i32) + 8.0
}

fn find(notes: &[Note], id: u64) -> &Note {
    notes.iter().find(|n| n.id == NoteId(id)).unwrap()
}

#[test]
fn trim_below_threshold_leaves_notes_unchanged() {
    let input = vec![note(1, 60, 480, 240).selected(), note(2, 72, 0, 480)];
    let mut ctx = NoteEditContext::new(input.clone(), view(1.0));
    let mut engine = GestureEngine::default();
    let rx = engine.attach();

    let x = pixel_from_tick(1.0, 480) + 1.0;
    let y = lane_y(60);
    assert_eq!(engine.pointer_down(&mut ctx, PointerEvent::down(x, y)), GestureMode::NotesTrimming);

    let outcome = engine.pointer_move(&mut ctx, LanePoint::new(x + pixel_from_tick(1.0, 40), y));
    assert_eq!(outcome, MoveOutcome::Unchanged);
    assert_eq!(engine.guard(), GuardTier::UnderThreshold);

    let emitted: Vec<Vec<Note>> = rx
        .try_iter()
        .filter_map(|e| match e {
            GestureEvent::NotesModified(notes) => Some(notes),
            _ => None,
        })
        .collect();
    assert_eq!(emitted.len(), 1);
    let mut expected = input;
    expected.sort_by_key(|n| n.tick);
    assert_eq!(emitted[0], expected);
}

#[test]
fn trim_fine_tune_moves_left_edge() {
    let mut ctx = NoteEditContext::new(vec![note(1, 60, 480, 240).selected(), note(2, 72, 0, 480)], view(1.0));
    let mut engine = GestureEngine::default();
    let rx = engine.attach();

    let x = pixel_from_tick(1.0, 480) + 1.0;
    let y = lane_y(60);
    engine.pointer_down(&mut ctx, PointerEvent::down(x, y));
    let outcome = engine.pointer_move(&mut ctx, LanePoint::new(x + pixel_from_tick(1.0, 150), y));

    assert_eq!(outcome, MoveOutcome::Applied);
    assert_eq!(engine.guard(), GuardTier::FineTune);
    let trimmed = find(&ctx.notes, 1);
    assert_eq!((trimmed.tick, trimmed.duration), (630, 90));
    let other = find(&ctx.notes, 2);
    assert_eq!((other.tick, other.duration, other.note_number), (0, 480, 72));

    assert_eq!(engine.last_modified_duration(), Some(90));
    assert_eq!(engine.selection_tick(), 630);
    let events: Vec<GestureEvent> = rx.try_iter().collect();
    assert!(events.contains(&GestureEvent::LastModifiedDuration(90)));
    assert!(events.contains(&GestureEvent::SelectionTick(630)));
}

#[test]
fn extend_snaps_end_to_grid_line() {
    // Zoom 0.5 puts grid lines every 480 ticks
    assert_eq!(ticks_per_grid_line(0.5), 480);
    let mut ctx = NoteEditContext::new(vec![note(1, 60, 0, 480).selected()], view(0.5));
    let mut engine = GestureEngine::default();

    let x = pixel_from_tick(0.5, 480) - 2.0;
    let y = lane_y(60);
    assert_eq!(engine.pointer_down(&mut ctx, PointerEvent::down(x, y)), GestureMode::NotesExtending);
    assert_eq!(engine.selection_tick(), 480);

    let outcome = engine.pointer_move(&mut ctx, LanePoint::new(x + pixel_from_tick(0.5, 520), y));
    assert_eq!(outcome, MoveOutcome::Applied);
    assert_eq!(engine.guard(), GuardTier::SnapToGrid);
    // End candidate 1000 locks to the 960 anchor; duration is anchor minus start
    assert_eq!(ctx.notes[0].duration, 960);
    assert_eq!(engine.selection_tick(), 960);

    // Far to the left of the note start still leaves one tick
    let outcome = engine.pointer_move(&mut ctx, LanePoint::new(x - pixel_from_tick(0.5, 1000), y));
    assert_eq!(outcome, MoveOutcome::Applied);
    assert_eq!(ctx.notes[0].duration, 1);
}

#[test]
fn drag_pitch_only_below_threshold() {
    let mut ctx = NoteEditContext::new(
        vec![note(1, 60, 0, 240).selected(), note(2, 64, 480, 240).selected()],
        view(1.0),
    );
    let mut engine = GestureEngine::default();

    let x = pixel_from_tick(1.0, 600);
    let y = lane_y(64);
    assert_eq!(engine.pointer_down(&mut ctx, PointerEvent::down(x, y)), GestureMode::DragAndDrop);

    // Three lanes up, a small horizontal wobble
    let outcome = engine.pointer_move(&mut ctx, LanePoint::new(x + 5.0, lane_y(67)));
    assert_eq!(outcome, MoveOutcome::Applied);
    assert_eq!(engine.guard(), GuardTier::UnderThreshold);
    assert_eq!((find(&ctx.notes, 1).note_number, find(&ctx.notes, 1).tick), (63, 0));
    assert_eq!((find(&ctx.notes, 2).note_number, find(&ctx.notes, 2).tick), (67, 480));
}

#[test]
fn guard_never_regresses_within_gesture() {
    let mut ctx = NoteEditContext::new(vec![note(1, 60, 960, 480).selected()], view(1.0));
    let mut engine = GestureEngine::default();
    let x = pixel_from_tick(1.0, 1200);
    let y = lane_y(60);
    engine.pointer_down(&mut ctx, PointerEvent::down(x, y));

    let mut previous = engine.guard();
    for ticks in [10, 50, 120, 30, 400, 0, -20, 90, -300, 5] {
        engine.pointer_move(&mut ctx, LanePoint::new(x + pixel_from_tick(1.0, ticks), y));
        assert!(engine.guard() >= previous);
        previous = engine.guard();
    }
    assert_eq!(previous, GuardTier::SnapToGrid);
}

#[test]
fn trimming_never_collapses_duration() {
    for delta in (-2000..=2000).step_by(37) {
        let mut ctx = NoteEditContext::new(vec![note(1, 60, 480, 240).selected()], view(1.0));
        let mut engine = GestureEngine::default();
        let x = pixel_from_tick(1.0, 480) + 1.0;
        let y = lane_y(60);
        engine.pointer_down(&mut ctx, PointerEvent::down(x, y));
        engine.pointer_move(&mut ctx, LanePoint::new(x + pixel_from_tick(1.0, delta), y));

        let trimmed = &ctx.notes[0];
        assert!(trimmed.duration >= 1, "delta {delta}");
        assert!(trimmed.tick <= 480 + 240 - 1, "delta {delta}");
        assert_eq!(trimmed.end_tick(), 720, "delta {delta}");
    }
}

#[test]
fn snapped_extend_lands_on_grid_or_does_nothing() {
    let grid = ticks_per_grid_line(1.0) as i64;
    let original_end = 480 + 240;

    for delta in (250..=1500).step_by(13) {
        let mut ctx = NoteEditContext::new(vec![note(1, 60, 480, 240).selected()], view(1.0));
        let mut engine = GestureEngine::default();
        let x = pixel_from_tick(1.0, 720) - 1.0;
        let y = lane_y(60);
        engine.pointer_down(&mut ctx, PointerEvent::down(x, y));
        let before = ctx.notes.clone();

        let outcome = engine.pointer_move(&mut ctx, LanePoint::new(x + pixel_from_tick(1.0, delta), y));
        assert_eq!(engine.guard(), GuardTier::SnapToGrid);
        match outcome {
            MoveOutcome::Rejected => assert_eq!(ctx.notes, before, "delta {delta}"),
            MoveOutcome::Applied | MoveOutcome::Unchanged => {
                let end = ctx.notes[0].end_tick() as i64;
                assert_eq!((end - original_end).rem_euclid(grid), 0, "delta {delta}");
            }
            MoveOutcome::Ignored | MoveOutcome::Declined => panic!("gesture should be active"),
        }
    }
}

#[test]
fn rejected_snap_keeps_last_valid_state() {
    let mut ctx = NoteEditContext::new(vec![note(1, 60, 480, 240).selected()], view(1.0));
    let mut engine = GestureEngine::default();
    let rx = engine.attach();
    let x = pixel_from_tick(1.0, 600);
    let y = lane_y(60);
    engine.pointer_down(&mut ctx, PointerEvent::down(x, y));

    // 480 + 250 -> 720: on a grid line
    assert_eq!(engine.pointer_move(&mut ctx, LanePoint::new(x + pixel_from_tick(1.0, 250), y)), MoveOutcome::Applied);
    assert_eq!(ctx.notes[0].tick, 720);
    rx.try_iter().for_each(drop);

    // 480 + 360 sits halfway between lines
    assert_eq!(engine.pointer_move(&mut ctx, LanePoint::new(x + pixel_from_tick(1.0, 360), y)), MoveOutcome::Rejected);
    assert_eq!(ctx.notes[0].tick, 720);
    assert!(rx.try_iter().next().is_none());

    engine.pointer_up(&mut ctx, LanePoint::new(x, y));
    assert_eq!(engine.mode(), GestureMode::None);
}

#[test]
fn deep_zoom_wobble_stays_in_dead_zone() {
    let scale = 8.0;
    assert_eq!(ticks_per_grid_line(scale), 120);
    let mut ctx = NoteEditContext::new(vec![note(1, 60, 480, 480).selected()], view(scale));
    let mut engine = GestureEngine::default();

    let x = pixel_from_tick(scale, 700);
    let y = lane_y(60);
    assert_eq!(engine.pointer_down(&mut ctx, PointerEvent::down(x, y)), GestureMode::DragAndDrop);

    let outcome = engine.pointer_move(&mut ctx, LanePoint::new(x + pixel_from_tick(scale, 70), y));
    assert_eq!(outcome, MoveOutcome::Unchanged);
    assert_eq!(engine.guard(), GuardTier::UnderThreshold);
    assert_eq!(ctx.notes[0].tick, 480);
}

#[test]
fn extend_tremor_keeps_selection_marker() {
    let mut ctx = NoteEditContext::new(
        vec![note(1, 60, 0, 480).selected(), note(2, 64, 960, 240).selected()],
        view(1.0),
    );
    let mut engine = GestureEngine::default();

    // Right edge of the earlier note
    let x = pixel_from_tick(1.0, 480) - 1.0;
    let y = lane_y(60);
    assert_eq!(engine.pointer_down(&mut ctx, PointerEvent::down(x, y)), GestureMode::NotesExtending);
    assert_eq!(engine.selection_tick(), 480);

    engine.pointer_move(&mut ctx, LanePoint::new(x + 2.0, y));
    assert_eq!(engine.guard(), GuardTier::UnderThreshold);
    assert_eq!(engine.selection_tick(), 480);
    assert_eq!(find(&ctx.notes, 1).duration, 480);
    assert_eq!(find(&ctx.notes, 2).duration, 240);
}
