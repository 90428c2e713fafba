//! Rectangular selection

use crate::conversion::{LanePoint, LaneRect, note_rect};
use crate::note::{Note, NoteId};

/// Marquee gesture state: every note is a candidate
#[derive(Debug, Clone, PartialEq)]
pub struct MarqueeBuffer {
    candidates: Vec<Note>,
    origin: LanePoint,
    current: LanePoint,
}

impl MarqueeBuffer {
    pub fn new(candidates: Vec<Note>, origin: LanePoint) -> Self {
        Self { candidates, origin, current: origin }
    }

    pub fn update(&mut self, point: LanePoint) {
        self.current = point;
    }

    pub fn rect(&self) -> LaneRect {
        LaneRect::from_corners(self.origin, self.current)
    }

    pub fn candidates(&self) -> &[Note] {
        &self.candidates
    }
}

/// Notes whose rectangle overlaps `rect`. An empty marquee encloses nothing.
pub fn enclosed_notes(candidates: &[Note], rect: &LaneRect, scale: f32, num_keys: u16) -> Vec<NoteId> {
    if rect.is_empty() {
        return Vec::new();
    }
    candidates
        .iter()
        .filter(|note| note_rect(scale, num_keys, note).intersects(rect))
        .map(|note| note.id)
        .collect()
}

/// Select exactly the enclosed notes. Returns the selected ids.
pub fn resolve_marquee(notes: &mut [Note], marquee: &MarqueeBuffer, scale: f32, num_keys: u16) -> Vec<NoteId> {
    let enclosed = enclosed_notes(marquee.candidates(), &marquee.rect(), scale, num_keys);
    for note in notes.iter_mut() {
        note.is_selected = enclosed.contains(&note.id);
    }
    enclosed
}
