//! Constant-rate linear speed ramp.
//!
//! A ramp moves the pump speed toward its target at a fixed
//! [`RAMP_RATE_PCT_PER_MS`], so a 0 → 100 % ramp always takes the same
//! time regardless of how often the host polls.  Position along the ramp
//! is computed from wall-clock time since the ramp began, never by
//! accumulating per-call increments.

use crate::time::{Millis, elapsed_ms};

/// Speed change per millisecond while ramping (percentage points).
pub const RAMP_RATE_PCT_PER_MS: f32 = 1.0;

/// Time needed to ramp across `delta_pct` percentage points.
pub fn ramp_duration_ms(delta_pct: f32) -> f32 {
    delta_pct.abs() / RAMP_RATE_PCT_PER_MS
}

/// Where a ramp started.  Only exists while a ramp is in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ramp {
    pub start_ms: Millis,
    pub start_speed: f32,
}

/// Result of evaluating a ramp at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RampStep {
    pub speed: f32,
    pub finished: bool,
}

impl Ramp {
    pub fn begin(now: Millis, current_speed: f32) -> Self {
        Self {
            start_ms: now,
            start_speed: current_speed,
        }
    }

    /// Speed on the way to `target` at time `now`, clamped at the target.
    pub fn advance(&self, target: f32, now: Millis) -> RampStep {
        let delta = RAMP_RATE_PCT_PER_MS * elapsed_ms(self.start_ms, now) as f32;

        let (speed, finished) = if target > self.start_speed {
            let speed = self.start_speed + delta;
            if speed >= target { (target, true) } else { (speed, false) }
        } else {
            let speed = self.start_speed - delta;
            if speed <= target { (target, true) } else { (speed, false) }
        };

        RampStep { speed, finished }
    }
}
