//! Error types for the piano roll

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PianoRollError {
    #[error("Invalid horizontal scale: {0}")]
    InvalidScale(f32),
    #[error("Invalid pitch range: {0} keys")]
    InvalidPitchRange(u16),
    #[error("Invalid note {id}: {reason}")]
    InvalidNote { id: u64, reason: &'static str },
    #[error("Modification buffer requires at least one note")]
    EmptyBuffer,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PianoRollError>;
