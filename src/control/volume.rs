//! Volume geometry of linear ramps.
//!
//! Speed is linear in time during a ramp and flow is linear in speed, so
//! the volume moved during a ramp between zero and some flow rate is the
//! triangular area under the flow-vs-time curve.

use super::ramp::ramp_duration_ms;

const MS_PER_MIN: f32 = 60_000.0;

/// Volume (mL) moved during one ramp leg of `duration_ms` between zero
/// and `flow_ml_per_min`.
pub fn ramp_volume_ml(duration_ms: f32, flow_ml_per_min: f32) -> f32 {
    (duration_ms * flow_ml_per_min) / (2.0 * MS_PER_MIN)
}

/// Volume moved by a full 0 → 100 % ramp followed by a full 100 → 0 % ramp.
pub fn full_ramp_pair_volume_ml(max_flow_ml_per_min: f32) -> f32 {
    2.0 * ramp_volume_ml(ramp_duration_ms(100.0), max_flow_ml_per_min)
}

/// Volume still to come if the pump ramps down to rest right now.
pub fn ramp_down_volume_ml(speed_pct: f32, flow_ml_per_min: f32) -> f32 {
    ramp_volume_ml(ramp_duration_ms(speed_pct), flow_ml_per_min)
}

/// Speed to start a volume dispense at.
///
/// Volumes too small to fit a full up-and-down ramp pair get a reduced
/// peak.  Both ramp legs shrink with the peak, so the pair volume grows
/// with the square of the peak speed: `V(p) = V(100) * (p / 100)^2`.
pub fn peak_speed_for_volume(volume_ml: f32, max_flow_ml_per_min: f32) -> f32 {
    let full = full_ramp_pair_volume_ml(max_flow_ml_per_min);
    if volume_ml < full {
        100.0 * (volume_ml / full).sqrt()
    } else {
        100.0
    }
}
