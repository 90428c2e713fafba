//! Pixel <-> tick/pitch conversion and note hit testing

use crate::config::{BASE_PIXELS_PER_TICK, KEY_HEIGHT};
use crate::note::Note;

/// Pointer position relative to the top-left corner of the lane
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LanePoint {
    pub x: f32,
    pub y: f32,
}

impl LanePoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in lane pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl LaneRect {
    /// Rectangle spanning two corners in any order
    pub fn from_corners(a: LanePoint, b: LanePoint) -> Self {
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            right: a.x.max(b.x),
            bottom: a.y.max(b.y),
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    pub fn contains(&self, point: LanePoint) -> bool {
        point.x >= self.left && point.x < self.right && point.y >= self.top && point.y < self.bottom
    }

    pub fn intersects(&self, other: &LaneRect) -> bool {
        self.left < other.right && other.left < self.right && self.top < other.bottom && other.top < self.bottom
    }
}

pub fn tick_from_pixel(scale: f32, pixel_x: f32) -> i64 {
    (pixel_x / (BASE_PIXELS_PER_TICK * scale)).round() as i64
}

pub fn pixel_from_tick(scale: f32, tick: i64) -> f32 {
    tick as f32 * BASE_PIXELS_PER_TICK * scale
}

/// Pitch lane under `pixel_y`; the top lane is the highest pitch.
/// Not clamped, callers bound the result where needed.
pub fn pitch_from_pixel(num_keys: u16, pixel_y: f32) -> i32 {
    num_keys as i32 - 1 - (pixel_y / KEY_HEIGHT).floor() as i32
}

/// Top edge of the lane holding `note_number`
pub fn pixel_from_pitch(num_keys: u16, note_number: i32) -> f32 {
    (num_keys as i32 - 1 - note_number) as f32 * KEY_HEIGHT
}

pub fn note_rect(scale: f32, num_keys: u16, note: &Note) -> LaneRect {
    let top = pixel_from_pitch(num_keys, note.note_number as i32);
    LaneRect {
        left: pixel_from_tick(scale, note.tick as i64),
        top,
        right: pixel_from_tick(scale, note.end_tick() as i64),
        bottom: top + KEY_HEIGHT,
    }
}

/// Topmost note under the pointer. Later notes draw over earlier ones.
pub fn note_at(notes: &[Note], scale: f32, num_keys: u16, point: LanePoint) -> Option<&Note> {
    notes
        .iter()
        .rev()
        .find(|note| note_rect(scale, num_keys, note).contains(point))
}

/// Edge margin for a note rectangle; short notes keep a grabbable body.
fn edge_margin(rect: &LaneRect, max_margin: f32) -> f32 {
    max_margin.min(rect.width() / 3.0)
}

pub fn is_right_margin_hit(scale: f32, num_keys: u16, note: &Note, point: LanePoint, max_margin: f32) -> bool {
    let rect = note_rect(scale, num_keys, note);
    rect.contains(point) && point.x >= rect.right - edge_margin(&rect, max_margin)
}

pub fn is_left_margin_hit(scale: f32, num_keys: u16, note: &Note, point: LanePoint, max_margin: f32) -> bool {
    let rect = note_rect(scale, num_keys, note);
    rect.contains(point) && point.x < rect.left + edge_margin(&rect, max_margin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::NoteId;

    #[test]
    fn test_tick_pixel_conversion() {
        // 0.2 px per tick at zoom 1.0
        assert_eq!(tick_from_pixel(1.0, 96.0), 480);
        assert_eq!(tick_from_pixel(2.0, 96.0), 240);
        assert_eq!(tick_from_pixel(1.0, -30.0), -150);
        assert!((pixel_from_tick(1.0, 480) - 96.0).abs() < 1e-3);
        assert_eq!(tick_from_pixel(1.5, pixel_from_tick(1.5, 1234)), 1234);
    }

    #[test]
    fn test_pitch_conversion() {
        assert_eq!(pitch_from_pixel(128, 0.0), 127);
        assert_eq!(pitch_from_pixel(128, 15.9), 127);
        assert_eq!(pitch_from_pixel(128, 16.0), 126);
        assert_eq!(pitch_from_pixel(128, 127.0 * 16.0 + 1.0), 0);
        // Out-of-range pixels map to out-of-range pitches
        assert_eq!(pitch_from_pixel(128, 128.0 * 16.0), -1);
        assert_eq!(pitch_from_pixel(128, pixel_from_pitch(128, 60)), 60);
    }

    #[test]
    fn test_note_hit_and_margins() {
        let note = Note::new(NoteId(1), 60, 100, 480, 240).unwrap();
        let notes = vec![note.clone()];
        // Note spans x 96..144, lane y for pitch 60
        let y = pixel_from_pitch(128, 60) + 4.0;

        assert!(note_at(&notes, 1.0, 128, LanePoint::new(120.0, y)).is_some());
        assert!(note_at(&notes, 1.0, 128, LanePoint::new(150.0, y)).is_none());
        assert!(note_at(&notes, 1.0, 128, LanePoint::new(120.0, y + 16.0)).is_none());

        assert!(is_right_margin_hit(1.0, 128, &note, LanePoint::new(140.0, y), 6.0));
        assert!(!is_right_margin_hit(1.0, 128, &note, LanePoint::new(120.0, y), 6.0));
        assert!(is_left_margin_hit(1.0, 128, &note, LanePoint::new(98.0, y), 6.0));
        assert!(!is_left_margin_hit(1.0, 128, &note, LanePoint::new(120.0, y), 6.0));
    }

    #[test]
    fn test_short_note_margin_is_capped() {
        // 15 ticks = 3 px wide, margin shrinks to 1 px
        let note = Note::new(NoteId(1), 60, 100, 0, 15).unwrap();
        let y = pixel_from_pitch(128, 60) + 1.0;
        assert!(!is_left_margin_hit(1.0, 128, &note, LanePoint::new(1.5, y), 6.0));
        assert!(!is_right_margin_hit(1.0, 128, &note, LanePoint::new(1.5, y), 6.0));
    }

    #[test]
    fn test_rect_from_corners() {
        let rect = LaneRect::from_corners(LanePoint::new(10.0, 40.0), LanePoint::new(2.0, 8.0));
        assert_eq!(rect.left, 2.0);
        assert_eq!(rect.bottom, 40.0);
        assert!(!rect.is_empty());
        assert!(LaneRect::from_corners(LanePoint::new(1.0, 1.0), LanePoint::new(1.0, 1.0)).is_empty());
    }
}
