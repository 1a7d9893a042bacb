//! Peristaltic pump PWM output (LEDC channel 0).
//!
//! Implements [`embedded_hal::pwm::SetDutyCycle`] so the
//! [`PumpController`](crate::control::pump::PumpController) can drive it
//! like any other HAL PWM channel.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: writes the LEDC duty register via hw_init helpers.
//! On host/test: tracks the duty in-memory only.

use embedded_hal::pwm::{ErrorType, SetDutyCycle};
use log::warn;

use crate::drivers::hw_init;
use crate::error::ActuatorError;
use crate::pins;

pub struct LedcPumpOutput {
    channel: u32,
    hw_duty: u16,
}

impl LedcPumpOutput {
    pub fn new(channel: u32) -> Self {
        Self { channel, hw_duty: 0 }
    }

    /// Duty most recently written to the channel.
    pub fn current_duty(&self) -> u16 {
        self.hw_duty
    }
}

impl ErrorType for LedcPumpOutput {
    type Error = ActuatorError;
}

impl SetDutyCycle for LedcPumpOutput {
    fn max_duty_cycle(&self) -> u16 {
        pins::PWM_MAX_DUTY
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), ActuatorError> {
        if duty > pins::PWM_MAX_DUTY {
            return Err(ActuatorError::DutyOutOfRange);
        }
        hw_init::ledc_set(self.channel, u32::from(duty)).map_err(|rc| {
            warn!("LEDC ch{} duty write failed (rc={})", self.channel, rc);
            ActuatorError::PwmWriteFailed
        })?;
        self.hw_duty = duty;
        Ok(())
    }
}
