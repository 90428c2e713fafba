//! pianoroll-core: note model and pointer gesture engine for a piano roll

pub mod actions;
pub mod auxiliary;
mod buffer;
pub mod config;
pub mod conversion;
mod error;
pub mod gesture;
pub mod grid;
mod guard;
mod marquee;
pub mod mutation;
mod note;

pub use auxiliary::{AuxiliaryEdit, PointerDelta, VelocityDrag, VibratoPassthrough};
pub use buffer::{ModificationBuffer, NonEmptyNotes};
pub use config::{GestureConfig, ViewConfig};
pub use conversion::{LanePoint, LaneRect};
pub use error::{PianoRollError, Result};
pub use gesture::{
    GestureEngine, GestureEvent, GestureMode, MoveOutcome, NoteEditContext, PointerEvent, PointerKind,
};
pub use grid::Anchor;
pub use guard::{DragGuard, GuardTier};
pub use marquee::{MarqueeBuffer, enclosed_notes, resolve_marquee};
pub use note::{Note, NoteId, clear_selection, replace_by_id, select_all, select_only, selected_notes};
pub use note::{MAX_NOTE_NUMBER, MAX_VELOCITY};
