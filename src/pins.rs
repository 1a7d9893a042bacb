//! GPIO / peripheral pin assignments for the pump controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Pump motor driver (logic-level MOSFET on the pump supply)
// ---------------------------------------------------------------------------

/// LEDC PWM output driving the pump MOSFET gate.
pub const PUMP_PWM_GPIO: i32 = 1;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  8-bit gives 0 – 255 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 8;
/// Highest duty value at [`PWM_RESOLUTION_BITS`].
pub const PWM_MAX_DUTY: u16 = (1 << PWM_RESOLUTION_BITS) - 1;
/// LEDC base frequency for the pump motor (25 kHz, above audible range).
pub const PUMP_PWM_FREQ_HZ: u32 = 25_000;
