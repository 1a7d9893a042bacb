//! Pump configuration parameters
//!
//! All tunable parameters for the pump controller and its host loop.
//! Values are compiled-in defaults; a JSON override can be parsed with
//! [`PumpConfig::from_json`].

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Core pump configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PumpConfig {
    // --- Pump ---
    /// Flow rate at 100% duty (mL/min), measured on the bench
    pub max_flow_ml_per_min: f32,
    /// Ramp speed changes linearly instead of stepping the duty
    pub ramp_enabled: bool,

    // --- Timing ---
    /// Control loop polling interval (milliseconds)
    pub control_loop_interval_ms: u32,
    /// Telemetry report interval (milliseconds)
    pub telemetry_interval_ms: u32,
    /// Task watchdog timeout (milliseconds)
    pub watchdog_timeout_ms: u32,
    /// Delay after boot before the demo routine starts (milliseconds)
    pub startup_delay_ms: u32,
}

impl Default for PumpConfig {
    fn default() -> Self {
        Self {
            // Pump
            max_flow_ml_per_min: 70.0,
            ramp_enabled: true,

            // Timing
            control_loop_interval_ms: 1,  // 1 kHz
            telemetry_interval_ms: 1000,  // 1 Hz
            watchdog_timeout_ms: 10_000,
            startup_delay_ms: 10_000,
        }
    }
}

impl PumpConfig {
    /// Range-check every field.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.max_flow_ml_per_min.is_finite() || self.max_flow_ml_per_min <= 0.0 {
            return Err(Error::Config("max_flow_ml_per_min must be finite and > 0"));
        }
        if self.control_loop_interval_ms == 0 {
            return Err(Error::Config("control_loop_interval_ms must be > 0"));
        }
        if self.telemetry_interval_ms == 0 {
            return Err(Error::Config("telemetry_interval_ms must be > 0"));
        }
        if self.watchdog_timeout_ms <= self.control_loop_interval_ms {
            return Err(Error::Config(
                "watchdog_timeout_ms must exceed control_loop_interval_ms",
            ));
        }
        Ok(())
    }

    /// Parse a JSON override and validate it.
    pub fn from_json(text: &str) -> Result<Self, Error> {
        let config: Self =
            serde_json::from_str(text).map_err(|_| Error::Config("malformed JSON"))?;
        config.validate()?;
        Ok(config)
    }
}
