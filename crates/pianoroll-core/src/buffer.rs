//! Per-gesture snapshot of the notes being transformed

use crate::conversion::LanePoint;
use crate::error::{PianoRollError, Result};
use crate::note::Note;

/// Notes in ascending tick order, never empty.
///
/// The last note is the reference note: whole-buffer transforms are anchored
/// on it so relative offsets between notes survive the edit.
#[derive(Debug, Clone, PartialEq)]
pub struct NonEmptyNotes {
    leading: Vec<Note>,
    reference: Note,
}

impl NonEmptyNotes {
    pub fn new(mut notes: Vec<Note>) -> Result<Self> {
        notes.sort_by_key(|n| n.tick);
        let reference = notes.pop().ok_or(PianoRollError::EmptyBuffer)?;
        Ok(Self { leading: notes, reference })
    }

    pub fn reference(&self) -> &Note {
        &self.reference
    }

    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        self.leading.iter().chain(std::iter::once(&self.reference))
    }

    pub fn len(&self) -> usize {
        self.leading.len() + 1
    }

    /// Always false, kept for API symmetry with slices
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Earliest tick in the buffer
    pub fn min_tick(&self) -> u64 {
        self.iter().map(|n| n.tick).min().unwrap_or(self.reference.tick)
    }

    pub fn pitch_bounds(&self) -> (u8, u8) {
        self.iter().fold((u8::MAX, u8::MIN), |(lo, hi), n| {
            (lo.min(n.note_number), hi.max(n.note_number))
        })
    }

    /// Apply `f` to every note, keeping the order and the reference position
    pub fn map(&self, mut f: impl FnMut(&Note) -> Note) -> Vec<Note> {
        self.iter().map(|n| f(n)).collect()
    }

    pub fn to_vec(&self) -> Vec<Note> {
        self.iter().cloned().collect()
    }
}

/// Snapshot taken at pointer-down for note edits
#[derive(Debug, Clone, PartialEq)]
pub struct ModificationBuffer {
    notes: NonEmptyNotes,
    origin: LanePoint,
}

impl ModificationBuffer {
    pub fn new(notes: Vec<Note>, origin: LanePoint) -> Result<Self> {
        Ok(Self {
            notes: NonEmptyNotes::new(notes)?,
            origin,
        })
    }

    pub fn notes(&self) -> &NonEmptyNotes {
        &self.notes
    }

    /// Pointer-down position
    pub fn origin(&self) -> LanePoint {
        self.origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::NoteId;

    fn note(id: u64, tick: u64, pitch: u8) -> Note {
        Note::new(NoteId(id), pitch, 100, tick, 120).unwrap()
    }

    #[test]
    fn test_empty_buffer_rejected() {
        assert!(matches!(NonEmptyNotes::new(Vec::new()), Err(PianoRollError::EmptyBuffer)));
        assert!(ModificationBuffer::new(Vec::new(), LanePoint::default()).is_err());
    }

    #[test]
    fn test_reference_is_last_by_tick() {
        let notes = NonEmptyNotes::new(vec![note(1, 960, 60), note(2, 0, 72), note(3, 480, 48)]).unwrap();
        assert_eq!(notes.reference().id, NoteId(1));
        assert_eq!(notes.len(), 3);
        assert_eq!(notes.min_tick(), 0);
        assert_eq!(notes.pitch_bounds(), (48, 72));
        let ids: Vec<u64> = notes.iter().map(|n| n.id.0).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }
}
