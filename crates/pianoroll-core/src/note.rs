//! Note events and note-collection helpers

use serde::{Deserialize, Serialize};

use crate::error::{PianoRollError, Result};

/// Highest valid MIDI note number
pub const MAX_NOTE_NUMBER: u8 = 127;
/// Highest valid velocity (velocity lives in [0, 128))
pub const MAX_VELOCITY: u8 = 127;

/// Opaque note identifier, stable across edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NoteId(pub u64);

/// A single note on the piano roll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    /// Start position in ticks
    pub tick: u64,
    /// Length in ticks, never zero
    pub duration: u64,
    /// MIDI note number (0-127, 60 = middle C)
    pub note_number: u8,
    /// Velocity (0-127)
    pub velocity: u8,
    #[serde(default)]
    pub is_selected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lyric: Option<String>,
}

impl Note {
    pub fn new(id: NoteId, note_number: u8, velocity: u8, tick: u64, duration: u64) -> Result<Self> {
        if duration == 0 {
            return Err(PianoRollError::InvalidNote { id: id.0, reason: "duration must be at least 1 tick" });
        }
        if note_number > MAX_NOTE_NUMBER {
            return Err(PianoRollError::InvalidNote { id: id.0, reason: "note number out of range" });
        }
        if velocity > MAX_VELOCITY {
            return Err(PianoRollError::InvalidNote { id: id.0, reason: "velocity out of range" });
        }
        Ok(Self {
            id,
            tick,
            duration,
            note_number,
            velocity,
            is_selected: false,
            lyric: None,
        })
    }

    pub fn selected(mut self) -> Self {
        self.is_selected = true;
        self
    }

    pub fn with_lyric(mut self, lyric: impl Into<String>) -> Self {
        self.lyric = Some(lyric.into());
        self
    }

    /// End tick (tick + duration)
    pub fn end_tick(&self) -> u64 {
        self.tick + self.duration
    }
}

/// Selected notes in ascending tick order
pub fn selected_notes(notes: &[Note]) -> Vec<Note> {
    let mut selected: Vec<Note> = notes.iter().filter(|n| n.is_selected).cloned().collect();
    selected.sort_by_key(|n| n.tick);
    selected
}

/// Replace notes by id with their updated versions, keeping everything else.
/// The result is ordered by ascending tick.
pub fn replace_by_id(notes: &[Note], updated: &[Note]) -> Vec<Note> {
    let mut merged: Vec<Note> = notes
        .iter()
        .map(|note| {
            updated
                .iter()
                .find(|u| u.id == note.id)
                .cloned()
                .unwrap_or_else(|| note.clone())
        })
        .collect();
    merged.sort_by_key(|n| n.tick);
    merged
}

/// Make `id` the only selected note
pub fn select_only(notes: &mut [Note], id: NoteId) {
    for note in notes.iter_mut() {
        note.is_selected = note.id == id;
    }
}

pub fn select_all(notes: &mut [Note]) {
    for note in notes.iter_mut() {
        note.is_selected = true;
    }
}

pub fn clear_selection(notes: &mut [Note]) {
    for note in notes.iter_mut() {
        note.is_selected = false;
    }
}
