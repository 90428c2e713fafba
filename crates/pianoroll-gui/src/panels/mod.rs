//! UI panels

mod note_lane;

pub use note_lane::{NoteLaneAction, NoteLanePanel};
