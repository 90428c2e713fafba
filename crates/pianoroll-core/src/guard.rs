//! Drag-distance guard
//!
//! Holds a drag in a dead zone right after pointer-down, then escalates to
//! fine-tuning and finally to grid snapping. Escalation never reverts within
//! a gesture.

use serde::{Deserialize, Serialize};

/// Precision tier of an ongoing drag, ordered by escalation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum GuardTier {
    #[default]
    UnderThreshold,
    FineTune,
    SnapToGrid,
}

#[derive(Debug, Clone, Copy)]
pub struct DragGuard {
    tier: GuardTier,
    fine_tune_threshold: i64,
}

impl DragGuard {
    pub fn new(fine_tune_threshold: i64) -> Self {
        Self {
            tier: GuardTier::UnderThreshold,
            fine_tune_threshold,
        }
    }

    pub fn tier(&self) -> GuardTier {
        self.tier
    }

    /// Start a new gesture
    pub fn reset(&mut self) {
        self.tier = GuardTier::UnderThreshold;
    }

    /// Feed the cumulative tick delta since pointer-down
    pub fn update(&mut self, delta_ticks: i64, ticks_per_grid_line: i64) -> GuardTier {
        let distance = delta_ticks.abs();
        let reached = if distance > ticks_per_grid_line {
            GuardTier::SnapToGrid
        } else if distance > self.fine_tune_threshold {
            GuardTier::FineTune
        } else {
            GuardTier::UnderThreshold
        };

        if reached > self.tier {
            tracing::trace!(from = ?self.tier, to = ?reached, delta_ticks, "drag guard escalated");
            self.tier = reached;
        }
        self.tier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dead_zone() {
        let mut guard = DragGuard::new(96);
        assert_eq!(guard.update(40, 240), GuardTier::UnderThreshold);
        assert_eq!(guard.update(-96, 240), GuardTier::UnderThreshold);
    }

    #[test]
    fn test_escalation_is_monotonic() {
        let mut guard = DragGuard::new(96);
        assert_eq!(guard.update(150, 240), GuardTier::FineTune);
        assert_eq!(guard.update(10, 240), GuardTier::FineTune);
        assert_eq!(guard.update(-241, 240), GuardTier::SnapToGrid);
        assert_eq!(guard.update(0, 240), GuardTier::SnapToGrid);
        assert_eq!(guard.update(120, 240), GuardTier::SnapToGrid);
    }

    #[test]
    fn test_large_motion_jumps_straight_to_snap() {
        let mut guard = DragGuard::new(96);
        assert_eq!(guard.update(500, 240), GuardTier::SnapToGrid);
    }

    #[test]
    fn test_reset() {
        let mut guard = DragGuard::new(96);
        guard.update(500, 240);
        guard.reset();
        assert_eq!(guard.tier(), GuardTier::UnderThreshold);
    }
}
