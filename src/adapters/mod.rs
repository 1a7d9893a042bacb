//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements | Connects to              |
//! |------------|------------|--------------------------|
//! | `log_sink` | EventSink  | Serial log output        |
//! | `time`     | Clock      | ESP32 system timer       |
//!
//! The PWM side needs no adapter: [`crate::drivers::pump::LedcPumpOutput`]
//! implements `embedded_hal::pwm::SetDutyCycle` directly.

pub mod log_sink;
pub mod time;
