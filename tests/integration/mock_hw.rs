//! Mock hardware adapters for integration tests.
//!
//! Records every duty write and every emitted event so tests can assert
//! on the full history without touching real LEDC registers.

use core::cell::Cell;

use embedded_hal::pwm::{ErrorType, SetDutyCycle};
use peripump::app::events::AppEvent;
use peripump::app::ports::{Clock, EventSink};
use peripump::config::PumpConfig;
use peripump::error::ActuatorError;
use peripump::time::Millis;

// ── SimClock ──────────────────────────────────────────────────

/// Manually advanced millisecond counter.  Wraps like the real one.
pub struct SimClock {
    now: Cell<Millis>,
}

#[allow(dead_code)]
impl SimClock {
    pub fn new(start: Millis) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn advance(&self, ms: Millis) {
        self.now.set(self.now.get().wrapping_add(ms));
    }

    pub fn set(&self, ms: Millis) {
        self.now.set(ms);
    }
}

impl Clock for SimClock {
    fn now_ms(&self) -> Millis {
        self.now.get()
    }
}

// ── RecordingPwm ──────────────────────────────────────────────

pub const MOCK_MAX_DUTY: u16 = 255;

/// 8-bit PWM output that keeps every accepted duty value.
pub struct RecordingPwm {
    pub duties: Vec<u16>,
    /// Reject writes once this many have been accepted.
    pub accept_limit: Option<usize>,
}

#[allow(dead_code)]
impl RecordingPwm {
    pub fn new() -> Self {
        Self {
            duties: Vec::new(),
            accept_limit: None,
        }
    }

    /// Accepts `n` writes, then rejects everything.
    pub fn failing_after(n: usize) -> Self {
        Self {
            duties: Vec::new(),
            accept_limit: Some(n),
        }
    }

    pub fn last_duty(&self) -> Option<u16> {
        self.duties.last().copied()
    }
}

impl Default for RecordingPwm {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorType for RecordingPwm {
    type Error = ActuatorError;
}

impl SetDutyCycle for RecordingPwm {
    fn max_duty_cycle(&self) -> u16 {
        MOCK_MAX_DUTY
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), ActuatorError> {
        if self.accept_limit.is_some_and(|n| self.duties.len() >= n) {
            return Err(ActuatorError::PwmWriteFailed);
        }
        self.duties.push(duty);
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Helpers ───────────────────────────────────────────────────

#[allow(dead_code)]
pub fn config(ramp_enabled: bool) -> PumpConfig {
    PumpConfig {
        ramp_enabled,
        ..PumpConfig::default()
    }
}
