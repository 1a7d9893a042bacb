//! Peristaltic pump controller.
//!
//! Turns three user intents (hold a speed, hold a flow rate, dispense a
//! volume) into a PWM duty cycle, ramping linearly between speeds so the
//! motor never sees an abrupt step.
//!
//! ## Polling contract
//!
//! [`PumpController::update`] must be called on every iteration of the
//! host loop.  All timing is derived from [`Clock`] deltas, so irregular
//! call intervals are tolerated, but a slow loop coarsens ramp steps and
//! the volume cutoff.  An operation is complete when
//! [`PumpController::target_mode`] reads [`TargetMode::None`].
//!
//! ## Volume dispensing
//!
//! With ramping enabled the controller cuts off early: once the volume
//! already pumped plus the volume the ramp-down will still move reaches
//! the target, it starts ramping to zero.  Without ramping it stops the
//! moment the target is reached.

use embedded_hal::pwm::SetDutyCycle;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::duty::speed_to_duty;
use super::ramp::Ramp;
use super::volume;
use crate::app::ports::Clock;
use crate::config::PumpConfig;
use crate::error::{ActuatorError, Result};
use crate::time::{Millis, elapsed_minutes};

/// The high-level intent currently governing the pump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TargetMode {
    /// Idle or settled; the last operation is complete.
    #[default]
    None,
    /// Ramping to (or holding) a speed percentage.
    Speed,
    /// Ramping to (or holding) a flow rate.
    FlowRate,
    /// Dispensing a fixed volume.
    Volume,
}

/// Speed/flow/volume controller driving a single PWM duty-cycle output.
pub struct PumpController<P, C> {
    pwm: P,
    clock: C,

    // -- Configuration --
    max_flow_rate: f32,
    ramp_enabled: bool,

    // -- Output --
    speed_pct: f32,
    flow_rate: f32,
    pump_on: bool,
    duty: u16,
    pwm_failures: u32,

    // -- Targets --
    mode: TargetMode,
    target_speed_pct: f32,
    target_flow_rate: f32,
    target_volume: f32,

    /// `Some` only while a ramp is in progress.
    ramp: Option<Ramp>,

    // -- Volume accumulation --
    /// Running total in `f64`; a 1 ms step is below `f32` resolution
    /// past about 32 L.
    pumped_volume: f64,
    volume_last_calc_ms: Millis,
}

impl<P: SetDutyCycle, C: Clock> PumpController<P, C> {
    /// Validate `config`, drive the output fully off, and start idle.
    pub fn new(config: &PumpConfig, mut pwm: P, clock: C) -> Result<Self> {
        config.validate()?;
        pwm.set_duty_cycle_fully_off()
            .map_err(|_| ActuatorError::PwmWriteFailed)?;
        let now = clock.now_ms();

        info!(
            "pump: max flow {:.1} mL/min, ramping {}",
            config.max_flow_ml_per_min,
            if config.ramp_enabled { "on" } else { "off" }
        );

        Ok(Self {
            pwm,
            clock,
            max_flow_rate: config.max_flow_ml_per_min,
            ramp_enabled: config.ramp_enabled,
            speed_pct: 0.0,
            flow_rate: 0.0,
            pump_on: false,
            duty: 0,
            pwm_failures: 0,
            mode: TargetMode::None,
            target_speed_pct: 0.0,
            target_flow_rate: 0.0,
            target_volume: 0.0,
            ramp: None,
            pumped_volume: 0.0,
            volume_last_calc_ms: now,
        })
    }

    // ── Targets ───────────────────────────────────────────────

    /// Hold `percentage` of maximum speed (clamped to 0–100).
    pub fn set_target_speed(&mut self, percentage: f32) {
        self.mode = TargetMode::Speed;
        self.request_speed(clamp_or_min(percentage, 0.0, 100.0));
        if !self.ramp_enabled {
            self.mode = TargetMode::None;
        }
    }

    /// Hold `rate` mL/min (clamped to 0–max flow).
    pub fn set_target_flow_rate(&mut self, rate: f32) {
        self.target_flow_rate = clamp_or_min(rate, 0.0, self.max_flow_rate);
        self.mode = TargetMode::FlowRate;
        self.request_speed(self.target_flow_rate / self.max_flow_rate * 100.0);
        if !self.ramp_enabled {
            self.mode = TargetMode::None;
        }
    }

    /// Dispense `volume` mL as quickly as possible.
    ///
    /// Returns `false`, leaving every target untouched, when `volume` is
    /// not positive.
    pub fn set_target_volume(&mut self, volume: f32) -> bool {
        if volume.is_nan() || volume <= 0.0 {
            debug!("pump: ignoring volume target {volume}");
            return false;
        }

        self.target_volume = volume;
        self.pumped_volume = 0.0;
        self.volume_last_calc_ms = self.clock.now_ms();
        self.mode = TargetMode::Volume;

        let start_speed = if self.ramp_enabled {
            volume::peak_speed_for_volume(volume, self.max_flow_rate)
        } else {
            100.0
        };
        info!("pump: dispensing {volume:.2} mL, peak {start_speed:.1}%");
        self.request_speed(start_speed);
        true
    }

    // ── Periodic update ───────────────────────────────────────

    /// Advance the ramp, integrate dispensed volume, and decide on the
    /// volume cutoff.  Call on every host loop iteration.
    pub fn update(&mut self) {
        let now = self.clock.now_ms();
        // Flow during the interval that just elapsed.
        let previous_flow = self.flow_rate;

        if let Some(ramp) = self.ramp {
            let step = ramp.advance(self.target_speed_pct, now);
            self.set_pump_speed(step.speed);

            if step.finished {
                self.ramp = None;
                debug!("pump: ramp settled at {:.1}%", step.speed);
                if self.mode != TargetMode::Volume || self.target_speed_pct == 0.0 {
                    self.mode = TargetMode::None;
                }
            }
        }

        if self.mode != TargetMode::Volume {
            return;
        }

        self.pumped_volume +=
            f64::from(previous_flow) * elapsed_minutes(self.volume_last_calc_ms, now);
        self.volume_last_calc_ms = now;
        let target = f64::from(self.target_volume);

        if self.ramp_enabled {
            if self.ramp.is_none() {
                let remaining = volume::ramp_down_volume_ml(self.speed_pct, self.flow_rate);
                if self.pumped_volume + f64::from(remaining) >= target {
                    info!(
                        "pump: volume cutoff at {:.3} mL (+{:.3} mL ramp-down), target {:.3} mL",
                        self.pumped_volume, remaining, self.target_volume
                    );
                    self.request_speed(0.0);
                }
            }
        } else if self.pumped_volume >= target {
            info!(
                "pump: volume reached {:.3} mL, target {:.3} mL",
                self.pumped_volume, self.target_volume
            );
            self.request_speed(0.0);
            self.mode = TargetMode::None;
        }
    }

    // ── Observers ─────────────────────────────────────────────

    /// True while the output is driven above 0 %.
    pub fn is_on(&self) -> bool {
        self.pump_on
    }

    /// Current output speed (0–100 %), mid-ramp included.
    pub fn speed_percentage(&self) -> f32 {
        self.speed_pct
    }

    /// Estimated flow (mL/min) at the current speed.
    pub fn flow_rate(&self) -> f32 {
        self.flow_rate
    }

    /// Intent currently governing the pump; `None` once settled.
    pub fn target_mode(&self) -> TargetMode {
        self.mode
    }

    /// Speed the controller is ramping to or holding.
    pub fn target_speed_percentage(&self) -> f32 {
        self.target_speed_pct
    }

    /// Last clamped flow-rate target (mL/min).
    pub fn target_flow_rate(&self) -> f32 {
        self.target_flow_rate
    }

    /// Last accepted volume target (mL).
    pub fn target_volume(&self) -> f32 {
        self.target_volume
    }

    /// Volume dispensed since the last volume target was set.
    pub fn pumped_volume(&self) -> f64 {
        self.pumped_volume
    }

    /// True while a ramp is in progress.
    pub fn is_ramping(&self) -> bool {
        self.ramp.is_some()
    }

    /// Clock reading at which the current ramp began.
    pub fn ramp_started_at(&self) -> Option<Millis> {
        self.ramp.map(|r| r.start_ms)
    }

    /// Configured flow at 100 % (mL/min).
    pub fn max_flow_rate(&self) -> f32 {
        self.max_flow_rate
    }

    /// Whether speed changes are ramped.
    pub fn ramp_enabled(&self) -> bool {
        self.ramp_enabled
    }

    /// Raw duty last accepted by the PWM output.
    pub fn duty(&self) -> u16 {
        self.duty
    }

    /// Number of duty writes the PWM output has rejected.
    pub fn pwm_failures(&self) -> u32 {
        self.pwm_failures
    }

    /// Current reading of the injected clock.
    pub fn now_ms(&self) -> Millis {
        self.clock.now_ms()
    }

    /// Read-only access to the PWM output.
    pub fn pwm(&self) -> &P {
        &self.pwm
    }

    // ── Internal ──────────────────────────────────────────────

    /// Point the controller at a new target speed, ramped or immediate.
    fn request_speed(&mut self, target: f32) {
        let target = clamp_or_min(target, 0.0, 100.0);
        if self.ramp.is_some() && target == self.target_speed_pct {
            return;
        }

        self.target_speed_pct = target;
        if self.ramp_enabled {
            let ramp = Ramp::begin(self.clock.now_ms(), self.speed_pct);
            debug!("pump: ramp {:.1}% -> {:.1}%", ramp.start_speed, target);
            self.ramp = Some(ramp);
        } else {
            self.set_pump_speed(target);
        }
    }

    /// Immediately drive the output at `speed_pct`.
    fn set_pump_speed(&mut self, speed_pct: f32) {
        self.speed_pct = speed_pct;
        self.flow_rate = speed_pct / 100.0 * self.max_flow_rate;
        self.pump_on = speed_pct > 0.0;

        let duty = speed_to_duty(speed_pct, self.pwm.max_duty_cycle());
        if self.pwm.set_duty_cycle(duty).is_ok() {
            self.duty = duty;
        } else {
            self.pwm_failures = self.pwm_failures.saturating_add(1);
            warn!("pump: PWM rejected duty {duty} ({} failures)", self.pwm_failures);
        }
    }
}

/// `value.clamp(lo, hi)`, with NaN mapped to `lo`.
fn clamp_or_min(value: f32, lo: f32, hi: f32) -> f32 {
    if value.is_nan() { lo } else { value.clamp(lo, hi) }
}
