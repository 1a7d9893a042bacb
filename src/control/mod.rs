//! Pump control: pure logic, zero I/O.
//!
//! The [`pump::PumpController`] state machine and the pieces it is built
//! from: constant-rate ramps, ramp volume geometry, and the speed → duty
//! mapping.  Hardware is reached only through the
//! [`Clock`](crate::app::ports::Clock) port and an
//! [`embedded_hal::pwm::SetDutyCycle`] output.

pub mod duty;
pub mod pump;
pub mod ramp;
pub mod volume;
