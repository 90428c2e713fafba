//! Single-axis edits for the vibrato and velocity modes

use crate::buffer::NonEmptyNotes;
use crate::note::{MAX_VELOCITY, Note};

/// Raw pointer displacement since pointer-down
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerDelta {
    pub ticks: i64,
    pub pitch: i32,
    pub x: f32,
    pub y: f32,
}

/// Handler for a modifier-selected edit mode.
/// Returning `None` leaves the notes untouched for this move.
pub trait AuxiliaryEdit: Send {
    fn apply(&self, notes: &NonEmptyNotes, delta: PointerDelta) -> Option<Vec<Note>>;
}

/// Vertical drag raises (up) or lowers (down) velocity on every buffered note
#[derive(Debug, Clone, Copy)]
pub struct VelocityDrag {
    px_per_step: f32,
}

impl VelocityDrag {
    pub fn new(px_per_step: f32) -> Self {
        Self { px_per_step: px_per_step.max(f32::EPSILON) }
    }
}

impl Default for VelocityDrag {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl AuxiliaryEdit for VelocityDrag {
    fn apply(&self, notes: &NonEmptyNotes, delta: PointerDelta) -> Option<Vec<Note>> {
        let steps = (-delta.y / self.px_per_step).round() as i32;
        Some(notes.map(|n| Note {
            velocity: (n.velocity as i32 + steps).clamp(0, MAX_VELOCITY as i32) as u8,
            ..n.clone()
        }))
    }
}

/// Default vibrato handler: the note model carries no vibrato data, so hosts
/// that support it install their own handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct VibratoPassthrough;

impl AuxiliaryEdit for VibratoPassthrough {
    fn apply(&self, _notes: &NonEmptyNotes, _delta: PointerDelta) -> Option<Vec<Note>> {
        None
    }
}
