//! Whole-selection edits bound to keyboard shortcuts

use crate::note::{MAX_NOTE_NUMBER, Note};

/// Shift selected notes by `semitones`. The shift is limited so the whole
/// selection stays in range.
pub fn transpose_selected(notes: &mut [Note], semitones: i32) {
    let Some((lowest, highest)) = notes
        .iter()
        .filter(|n| n.is_selected)
        .map(|n| n.note_number as i32)
        .fold(None, |acc: Option<(i32, i32)>, p| match acc {
            Some((lo, hi)) => Some((lo.min(p), hi.max(p))),
            None => Some((p, p)),
        })
    else {
        return;
    };

    let shift = semitones.clamp(-lowest, MAX_NOTE_NUMBER as i32 - highest);
    for note in notes.iter_mut().filter(|n| n.is_selected) {
        note.note_number = (note.note_number as i32 + shift) as u8;
    }
}

pub fn up_octave(notes: &mut [Note]) {
    transpose_selected(notes, 12);
}

pub fn down_octave(notes: &mut [Note]) {
    transpose_selected(notes, -12);
}

/// Stretch selected notes in time around the earliest selected tick
pub fn scale_note_time(notes: &mut [Note], factor: f64) {
    let Some(start) = notes.iter().filter(|n| n.is_selected).map(|n| n.tick).min() else {
        return;
    };

    for note in notes.iter_mut().filter(|n| n.is_selected) {
        let offset = (note.tick - start) as f64 * factor;
        note.tick = start + offset.round() as u64;
        note.duration = ((note.duration as f64 * factor).round() as u64).max(1);
    }
    notes.sort_by_key(|n| n.tick);
}

pub fn half_time(notes: &mut [Note]) {
    scale_note_time(notes, 0.5);
}

pub fn double_time(notes: &mut [Note]) {
    scale_note_time(notes, 2.0);
}
