//! Per-mode note arithmetic for trimming, extending and dragging
//!
//! Every function reads the buffered snapshot and produces fresh notes. A
//! `None` result means the move was rejected: the pointer is in snapping
//! range but not close enough to any grid line.

use crate::buffer::NonEmptyNotes;
use crate::grid::{grid_offset_of_tick, nearest_anchor};
use crate::guard::GuardTier;
use crate::note::{MAX_NOTE_NUMBER, Note};

/// Pointer displacement since pointer-down, already interpreted by the guard
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragInput {
    pub delta_ticks: i64,
    pub delta_pitch: i32,
    pub tier: GuardTier,
    pub scale: f32,
    pub snap_radius_ratio: f32,
}

/// Outcome of an accepted move
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    /// Updated versions of the buffered notes
    pub notes: Vec<Note>,
    pub selection_tick: Option<u64>,
    /// Reference note duration, reused by repeat-last-edit
    pub last_modified_duration: Option<u64>,
}

impl Mutation {
    pub fn notes_only(notes: Vec<Note>) -> Self {
        Self {
            notes,
            selection_tick: None,
            last_modified_duration: None,
        }
    }
}

/// Tick shift for the reference edge at `edge`, or `None` when a snap is rejected.
fn edge_shift(edge: i64, candidate: i64, input: &DragInput) -> Option<i64> {
    match input.tier {
        GuardTier::UnderThreshold => Some(0),
        GuardTier::FineTune => Some(input.delta_ticks),
        GuardTier::SnapToGrid => {
            let offset = grid_offset_of_tick(edge, input.scale);
            let anchor = nearest_anchor(candidate, input.scale, offset, input.snap_radius_ratio);
            if !anchor.proximity {
                tracing::trace!(candidate, anchor = anchor.anchor, "snap rejected, no grid line in range");
                return None;
            }
            Some(anchor.anchor - edge)
        }
    }
}

/// Move the left edge by `shift`, keeping the right edge fixed
fn trim_note(note: &Note, shift: i64) -> Note {
    let end = note.end_tick() as i64;
    let tick = (note.tick as i64 + shift).clamp(0, end - 1);
    Note {
        tick: tick as u64,
        duration: (end - tick) as u64,
        ..note.clone()
    }
}

fn extend_note(note: &Note, shift: i64) -> Note {
    Note {
        duration: (note.duration as i64 + shift).max(1) as u64,
        ..note.clone()
    }
}

/// Left-edge drag
pub fn trim(buffer: &NonEmptyNotes, input: &DragInput) -> Option<Mutation> {
    let reference = buffer.reference();
    let start = reference.tick as i64;
    let candidate = (reference.end_tick() as i64 - 1).min(start + input.delta_ticks);
    let shift = edge_shift(start, candidate, input)?;

    let trimmed = trim_note(reference, shift);
    Some(Mutation {
        notes: buffer.map(|n| trim_note(n, shift)),
        selection_tick: (input.tier > GuardTier::UnderThreshold).then_some(trimmed.tick),
        last_modified_duration: Some(trimmed.duration),
    })
}

/// Right-edge drag. The same duration delta is added to every buffered note.
pub fn extend(buffer: &NonEmptyNotes, input: &DragInput) -> Option<Mutation> {
    let reference = buffer.reference();
    let end = reference.end_tick() as i64;
    let shift = edge_shift(end, end + input.delta_ticks, input)?;

    let extended = extend_note(reference, shift);
    Some(Mutation {
        notes: buffer.map(|n| extend_note(n, shift)),
        selection_tick: (input.tier > GuardTier::UnderThreshold).then_some(extended.end_tick()),
        last_modified_duration: Some(extended.duration),
    })
}

/// Body drag. Pitch always follows the pointer; time only once the guard
/// has left the dead zone.
pub fn drag(buffer: &NonEmptyNotes, input: &DragInput) -> Option<Mutation> {
    let reference = buffer.reference();
    let start = reference.tick as i64;
    let shift = edge_shift(start, start + input.delta_ticks, input)?;

    // Clamp the group so the chord shape survives hitting a boundary
    let shift = shift.max(-(buffer.min_tick() as i64));
    let (lowest, highest) = buffer.pitch_bounds();
    let pitch_shift = input
        .delta_pitch
        .clamp(-(lowest as i32), MAX_NOTE_NUMBER as i32 - highest as i32);

    let notes = buffer.map(|n| Note {
        tick: (n.tick as i64 + shift) as u64,
        note_number: (n.note_number as i32 + pitch_shift) as u8,
        ..n.clone()
    });
    Some(Mutation {
        notes,
        selection_tick: (input.tier > GuardTier::UnderThreshold).then_some((start + shift) as u64),
        last_modified_duration: None,
    })
}
