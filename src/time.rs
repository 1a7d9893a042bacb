//! Wrap-safe millisecond arithmetic.
//!
//! The pump clock is a free-running `u32` millisecond counter (the same
//! width as the ESP-IDF tick counter truncated to 32 bits) and wraps
//! roughly every 49.7 days.  Every ramp, volume and telemetry interval
//! goes through [`elapsed_ms`] so the controller keeps working across the
//! wrap boundary.

/// A reading of the monotonic millisecond counter.
pub type Millis = u32;

/// Largest value the counter reaches before wrapping to zero.
pub const COUNTER_MAX: Millis = Millis::MAX;

/// Milliseconds between `start` and `end`.
///
/// If `end` is behind `start` the counter is assumed to have wrapped
/// exactly once: the result is the ticks up to and including the wrap
/// plus the ticks after it.
pub const fn elapsed_ms(start: Millis, end: Millis) -> Millis {
    if end >= start {
        end - start
    } else {
        (COUNTER_MAX - start) + end + 1
    }
}

/// [`elapsed_ms`] as fractional minutes, for ml/min integration.
///
/// `f64` so that millisecond steps still register against a running
/// total tens of litres large.
pub fn elapsed_minutes(start: Millis, end: Millis) -> f64 {
    f64::from(elapsed_ms(start, end)) / 60_000.0
}
