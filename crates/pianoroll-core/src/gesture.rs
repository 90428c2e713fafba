//! Pointer gesture state machine for the note lane
//!
//! Turns pointer down/move/up events into note-collection updates. The mode is
//! picked at pointer-down from the hit note, its edges and the held modifiers,
//! stays fixed while the pointer is down, and returns to `None` on pointer-up.

use crossbeam_channel::{Receiver, Sender, unbounded};
use serde::{Deserialize, Serialize};

use crate::auxiliary::{AuxiliaryEdit, PointerDelta, VelocityDrag, VibratoPassthrough};
use crate::buffer::ModificationBuffer;
use crate::config::{GestureConfig, ViewConfig};
use crate::conversion::{
    LanePoint, LaneRect, is_left_margin_hit, is_right_margin_hit, note_at, pitch_from_pixel, tick_from_pixel,
};
use crate::grid::{nearest_grid_tick, ticks_per_grid_line};
use crate::guard::{DragGuard, GuardTier};
use crate::marquee::{MarqueeBuffer, resolve_marquee};
use crate::mutation::{self, DragInput, Mutation};
use crate::note::{Note, NoteId, replace_by_id, select_only, selected_notes};

/// Observable gesture mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GestureMode {
    #[default]
    None,
    DragAndDrop,
    MarqueeSelection,
    NotesTrimming,
    NotesExtending,
    Vibrato,
    Velocity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

/// Pointer input in lane-relative pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub x: f32,
    pub y: f32,
    /// Alternate modifier (Alt / Option)
    pub alt: bool,
    /// Secondary modifier (Cmd / Meta)
    pub meta: bool,
}

impl PointerEvent {
    pub fn down(x: f32, y: f32) -> Self {
        Self { kind: PointerKind::Down, x, y, alt: false, meta: false }
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self { kind: PointerKind::Move, x, y, alt: false, meta: false }
    }

    pub fn up(x: f32, y: f32) -> Self {
        Self { kind: PointerKind::Up, x, y, alt: false, meta: false }
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn point(&self) -> LanePoint {
        LanePoint::new(self.x, self.y)
    }
}

/// Published to the attached observer
#[derive(Debug, Clone, PartialEq)]
pub enum GestureEvent {
    ModeChanged(GestureMode),
    /// Whole note collection after an edit
    NotesModified(Vec<Note>),
    SelectionTick(u64),
    LastModifiedDuration(u64),
    MarqueeResolved(Vec<NoteId>),
}

/// What a pointer-move did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Notes changed and were published
    Applied,
    /// Notes were republished without change
    Unchanged,
    /// Snap had no grid line in range, nothing was published
    Rejected,
    /// The vibrato or velocity handler made no edit, nothing was published
    Declined,
    /// No gesture in progress
    Ignored,
}

/// Note collection and view state the engine edits, owned by the host
#[derive(Debug, Clone, Default)]
pub struct NoteEditContext {
    pub notes: Vec<Note>,
    pub view: ViewConfig,
}

impl NoteEditContext {
    pub fn new(notes: Vec<Note>, view: ViewConfig) -> Self {
        Self { notes, view }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditMode {
    DragAndDrop,
    NotesTrimming,
    NotesExtending,
    Vibrato,
    Velocity,
}

impl EditMode {
    fn gesture_mode(self) -> GestureMode {
        match self {
            Self::DragAndDrop => GestureMode::DragAndDrop,
            Self::NotesTrimming => GestureMode::NotesTrimming,
            Self::NotesExtending => GestureMode::NotesExtending,
            Self::Vibrato => GestureMode::Vibrato,
            Self::Velocity => GestureMode::Velocity,
        }
    }
}

enum ActiveGesture {
    Idle,
    Marquee(MarqueeBuffer),
    Edit { mode: EditMode, buffer: ModificationBuffer },
}

pub struct GestureEngine {
    config: GestureConfig,
    active: ActiveGesture,
    guard: DragGuard,
    selection_tick: u64,
    last_modified_duration: Option<u64>,
    vibrato: Box<dyn AuxiliaryEdit>,
    velocity: Box<dyn AuxiliaryEdit>,
    sink: Option<Sender<GestureEvent>>,
}

impl Default for GestureEngine {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl GestureEngine {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            active: ActiveGesture::Idle,
            guard: DragGuard::new(config.fine_tune_threshold),
            selection_tick: 0,
            last_modified_duration: None,
            vibrato: Box::new(VibratoPassthrough),
            velocity: Box::new(VelocityDrag::new(config.velocity_px_per_step)),
            sink: None,
        }
    }

    pub fn with_vibrato(mut self, handler: impl AuxiliaryEdit + 'static) -> Self {
        self.vibrato = Box::new(handler);
        self
    }

    /// Start publishing events. Replaces any previous observer.
    pub fn attach(&mut self) -> Receiver<GestureEvent> {
        let (tx, rx) = unbounded();
        self.sink = Some(tx);
        rx
    }

    /// Stop publishing; the receiver sees a disconnected channel
    pub fn detach(&mut self) {
        self.sink = None;
    }

    pub fn is_attached(&self) -> bool {
        self.sink.is_some()
    }

    pub fn mode(&self) -> GestureMode {
        match &self.active {
            ActiveGesture::Idle => GestureMode::None,
            ActiveGesture::Marquee(_) => GestureMode::MarqueeSelection,
            ActiveGesture::Edit { mode, .. } => mode.gesture_mode(),
        }
    }

    pub fn guard(&self) -> GuardTier {
        self.guard.tier()
    }

    pub fn selection_tick(&self) -> u64 {
        self.selection_tick
    }

    pub fn last_modified_duration(&self) -> Option<u64> {
        self.last_modified_duration
    }

    /// Marquee rectangle while a rectangular selection is being dragged
    pub fn marquee_rect(&self) -> Option<LaneRect> {
        match &self.active {
            ActiveGesture::Marquee(marquee) => Some(marquee.rect()),
            _ => None,
        }
    }

    pub fn handle(&mut self, ctx: &mut NoteEditContext, event: PointerEvent) {
        match event.kind {
            PointerKind::Down => {
                self.pointer_down(ctx, event);
            }
            PointerKind::Move => {
                self.pointer_move(ctx, event.point());
            }
            PointerKind::Up => self.pointer_up(ctx, event.point()),
        }
    }

    pub fn pointer_down(&mut self, ctx: &mut NoteEditContext, event: PointerEvent) -> GestureMode {
        if !matches!(self.active, ActiveGesture::Idle) {
            tracing::warn!(mode = ?self.mode(), "pointer down during an open gesture, restarting");
        }
        self.guard.reset();

        let point = event.point();
        let scale = ctx.view.scale_x;
        let hit = note_at(&ctx.notes, scale, ctx.view.num_keys, point).cloned();

        let Some(note) = hit else {
            let tick = tick_from_pixel(scale, point.x).max(0);
            self.set_selection_tick(nearest_grid_tick(scale, tick).max(0) as u64);
            self.active = ActiveGesture::Marquee(MarqueeBuffer::new(ctx.notes.clone(), point));
            return self.announce_mode();
        };

        // Clicking an unselected note makes it the selection
        if !note.is_selected {
            select_only(&mut ctx.notes, note.id);
            self.publish(GestureEvent::NotesModified(ctx.notes.clone()));
        }

        self.set_selection_tick(note.tick);
        let mode = self.mode_for_note(ctx, &note, event);

        self.active = match ModificationBuffer::new(selected_notes(&ctx.notes), point) {
            Ok(buffer) => ActiveGesture::Edit { mode, buffer },
            Err(e) => {
                tracing::warn!("cannot start note edit: {}", e);
                ActiveGesture::Idle
            }
        };
        self.announce_mode()
    }

    fn mode_for_note(&mut self, ctx: &NoteEditContext, note: &Note, event: PointerEvent) -> EditMode {
        let point = event.point();
        let (scale, num_keys) = (ctx.view.scale_x, ctx.view.num_keys);
        let margin = self.config.edge_margin_px;

        if is_right_margin_hit(scale, num_keys, note, point, margin) {
            self.set_selection_tick(note.end_tick());
            EditMode::NotesExtending
        } else if is_left_margin_hit(scale, num_keys, note, point, margin) {
            EditMode::NotesTrimming
        } else if event.alt {
            EditMode::Vibrato
        } else if event.meta {
            EditMode::Velocity
        } else {
            EditMode::DragAndDrop
        }
    }

    pub fn pointer_move(&mut self, ctx: &mut NoteEditContext, point: LanePoint) -> MoveOutcome {
        let (scale, num_keys) = (ctx.view.scale_x, ctx.view.num_keys);

        // Proposed edit, and the outcome to report when there is none
        let (mutation, fallback) = match &mut self.active {
            ActiveGesture::Idle => {
                tracing::warn!("pointer move with no gesture in progress, ignoring");
                return MoveOutcome::Ignored;
            }
            ActiveGesture::Marquee(marquee) => {
                marquee.update(point);
                return MoveOutcome::Unchanged;
            }
            ActiveGesture::Edit { mode, buffer } => {
                let origin = buffer.origin();
                let delta = PointerDelta {
                    ticks: tick_from_pixel(scale, point.x - origin.x),
                    pitch: pitch_from_pixel(num_keys, point.y) - pitch_from_pixel(num_keys, origin.y),
                    x: point.x - origin.x,
                    y: point.y - origin.y,
                };
                let tier = self.guard.update(delta.ticks, ticks_per_grid_line(scale));
                let input = DragInput {
                    delta_ticks: delta.ticks,
                    delta_pitch: delta.pitch,
                    tier,
                    scale,
                    snap_radius_ratio: self.config.snap_radius_ratio,
                };

                let notes = buffer.notes();
                match mode {
                    EditMode::NotesTrimming => (mutation::trim(notes, &input), MoveOutcome::Rejected),
                    EditMode::NotesExtending => (mutation::extend(notes, &input), MoveOutcome::Rejected),
                    EditMode::DragAndDrop => (mutation::drag(notes, &input), MoveOutcome::Rejected),
                    EditMode::Vibrato => {
                        (self.vibrato.apply(notes, delta).map(Mutation::notes_only), MoveOutcome::Declined)
                    }
                    EditMode::Velocity => {
                        (self.velocity.apply(notes, delta).map(Mutation::notes_only), MoveOutcome::Declined)
                    }
                }
            }
        };

        match mutation {
            Some(mutation) => self.apply_mutation(ctx, mutation),
            None => fallback,
        }
    }

    fn apply_mutation(&mut self, ctx: &mut NoteEditContext, mutation: Mutation) -> MoveOutcome {
        let updated = replace_by_id(&ctx.notes, &mutation.notes);
        let outcome = if updated == ctx.notes {
            MoveOutcome::Unchanged
        } else {
            MoveOutcome::Applied
        };
        ctx.notes = updated;
        self.publish(GestureEvent::NotesModified(ctx.notes.clone()));

        if let Some(tick) = mutation.selection_tick {
            self.set_selection_tick(tick);
        }
        if let Some(duration) = mutation.last_modified_duration {
            self.last_modified_duration = Some(duration);
            self.publish(GestureEvent::LastModifiedDuration(duration));
        }
        outcome
    }

    /// Ends the gesture unconditionally
    pub fn pointer_up(&mut self, ctx: &mut NoteEditContext, point: LanePoint) {
        let finished = std::mem::replace(&mut self.active, ActiveGesture::Idle);
        self.guard.reset();

        match finished {
            ActiveGesture::Idle => return,
            ActiveGesture::Marquee(mut marquee) => {
                marquee.update(point);
                let selected = resolve_marquee(&mut ctx.notes, &marquee, ctx.view.scale_x, ctx.view.num_keys);
                tracing::debug!("marquee selected {} notes", selected.len());
                self.publish(GestureEvent::MarqueeResolved(selected));
                self.publish(GestureEvent::NotesModified(ctx.notes.clone()));
            }
            ActiveGesture::Edit { mode, buffer } => {
                tracing::debug!(?mode, notes = buffer.notes().len(), "note edit finished");
            }
        }
        self.announce_mode();
    }

    fn set_selection_tick(&mut self, tick: u64) {
        self.selection_tick = tick;
        self.publish(GestureEvent::SelectionTick(tick));
    }

    fn announce_mode(&mut self) -> GestureMode {
        let mode = self.mode();
        tracing::debug!(?mode, "gesture mode");
        self.publish(GestureEvent::ModeChanged(mode));
        mode
    }

    fn publish(&mut self, event: GestureEvent) {
        let Some(sink) = &self.sink else { return };
        if sink.send(event).is_err() {
            tracing::warn!("gesture observer disconnected, detaching");
            self.sink = None;
        }
    }
}
