//! Rhythmic grid and snap anchors

use crate::config::{MAX_GRID_SEGMENTS, MIN_GRID_PIXELS, TICKS_PER_BAR};
use crate::conversion::pixel_from_tick;

/// Result of looking up the grid line nearest to a candidate tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    /// Grid-aligned tick
    pub anchor: i64,
    /// Candidate lies within the snap radius of `anchor`
    pub proximity: bool,
}

/// Grid spacing in ticks at the given zoom.
/// Splits a bar into the most power-of-two segments that stay at least
/// `MIN_GRID_PIXELS` wide on screen.
pub fn ticks_per_grid_line(scale: f32) -> i64 {
    let bar_px = pixel_from_tick(scale, TICKS_PER_BAR);
    let mut segments = 1;
    while segments < MAX_GRID_SEGMENTS && bar_px / (segments * 2) as f32 >= MIN_GRID_PIXELS {
        segments *= 2;
    }
    TICKS_PER_BAR / segments
}

/// Phase of `tick` within the grid
pub fn grid_offset_of_tick(tick: i64, scale: f32) -> i64 {
    tick.rem_euclid(ticks_per_grid_line(scale))
}

/// Nearest absolute grid line (phase zero)
pub fn nearest_grid_tick(scale: f32, tick: i64) -> i64 {
    let grid = ticks_per_grid_line(scale);
    (tick as f64 / grid as f64).round() as i64 * grid
}

/// Nearest grid line to `candidate` on a grid shifted by `grid_offset`.
pub fn nearest_anchor(candidate: i64, scale: f32, grid_offset: i64, snap_radius_ratio: f32) -> Anchor {
    let grid = ticks_per_grid_line(scale);
    let steps = ((candidate - grid_offset) as f64 / grid as f64).round() as i64;
    let anchor = steps * grid + grid_offset;
    let radius = (grid as f64 * snap_radius_ratio as f64).round() as i64;
    Anchor {
        anchor,
        proximity: (candidate - anchor).abs() <= radius,
    }
}
