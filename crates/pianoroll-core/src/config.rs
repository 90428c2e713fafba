//! View and gesture configuration

use serde::{Deserialize, Serialize};

use crate::error::{PianoRollError, Result};

/// Pulses per quarter note
pub const TICKS_PER_BEAT: i64 = 480;
pub const BEATS_PER_BAR: i64 = 4;
pub const TICKS_PER_BAR: i64 = TICKS_PER_BEAT * BEATS_PER_BAR;
/// Horizontal pixels per tick at zoom 1.0
pub const BASE_PIXELS_PER_TICK: f32 = 0.2;
/// Narrowest on-screen spacing allowed between grid lines
pub const MIN_GRID_PIXELS: f32 = 40.0;
/// Finest bar subdivision the grid will use. Sixteenth notes (120 ticks)
/// keep the grid wider than the default fine-tune threshold.
pub const MAX_GRID_SEGMENTS: i64 = 16;
/// Height of one pitch lane
pub const KEY_HEIGHT: f32 = 16.0;
/// Number of MIDI pitches
pub const MAX_KEYS: u16 = 128;

/// Zoom and pitch range of the lane, read on every pointer event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Horizontal zoom multiplier, strictly positive
    pub scale_x: f32,
    /// Number of pitch lanes
    pub num_keys: u16,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            scale_x: 1.0,
            num_keys: MAX_KEYS,
        }
    }
}

impl ViewConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.scale_x.is_finite() || self.scale_x <= 0.0 {
            return Err(PianoRollError::InvalidScale(self.scale_x));
        }
        if self.num_keys == 0 || self.num_keys > MAX_KEYS {
            return Err(PianoRollError::InvalidPitchRange(self.num_keys));
        }
        Ok(())
    }

    /// Total lane height in pixels
    pub fn canvas_height(&self) -> f32 {
        self.num_keys as f32 * KEY_HEIGHT
    }
}

/// Tunables for gesture interpretation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Tick distance past which a drag leaves the dead zone
    pub fine_tune_threshold: i64,
    /// Snap radius as a fraction of the grid spacing
    pub snap_radius_ratio: f32,
    /// Widest edge margin (px) that selects trimming or extending
    pub edge_margin_px: f32,
    /// Vertical pixels per velocity step in velocity mode
    pub velocity_px_per_step: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            fine_tune_threshold: 96,
            snap_radius_ratio: 0.25,
            edge_margin_px: 6.0,
            velocity_px_per_step: 1.0,
        }
    }
}

impl GestureConfig {
    pub fn validate(&self) -> Result<()> {
        if self.fine_tune_threshold < 0 {
            return Err(PianoRollError::Config(format!(
                "fine_tune_threshold must not be negative, got {}",
                self.fine_tune_threshold
            )));
        }
        if !(self.snap_radius_ratio > 0.0 && self.snap_radius_ratio <= 0.5) {
            return Err(PianoRollError::Config(format!(
                "snap_radius_ratio must be in (0, 0.5], got {}",
                self.snap_radius_ratio
            )));
        }
        if self.edge_margin_px < 0.0 {
            return Err(PianoRollError::Config(format!(
                "edge_margin_px must not be negative, got {}",
                self.edge_margin_px
            )));
        }
        if self.velocity_px_per_step <= 0.0 {
            return Err(PianoRollError::Config(format!(
                "velocity_px_per_step must be positive, got {}",
                self.velocity_px_per_step
            )));
        }
        Ok(())
    }
}
