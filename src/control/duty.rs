//! Speed percentage → native PWM duty mapping.

/// Map `speed_pct` (0–100) linearly onto `0..=max_duty`.
pub fn speed_to_duty(speed_pct: f32, max_duty: u16) -> u16 {
    let fraction = speed_pct.clamp(0.0, 100.0) / 100.0;
    (fraction * f32::from(max_duty)).round() as u16
}
