//! Application service, the hexagonal core.
//!
//! [`PumpService`] owns the [`PumpController`] and is the only thing the
//! host loop talks to.  It applies [`PumpCommand`]s, runs the periodic
//! controller update, and turns mode transitions into [`AppEvent`]s so
//! callers can react to completion instead of polling the controller.
//!
//! ```text
//!  PumpCommand ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                  │      PumpService        │
//!        Clock ──▶ │  PumpController · PWM   │ ──▶ SetDutyCycle
//!                  └────────────────────────┘
//! ```

use embedded_hal::pwm::SetDutyCycle;
use log::info;

use crate::config::PumpConfig;
use crate::control::pump::{PumpController, TargetMode};
use crate::error::Result;
use crate::time::{Millis, elapsed_ms};

use super::commands::PumpCommand;
use super::events::{AppEvent, PumpTelemetry};
use super::ports::{Clock, EventSink};

// ───────────────────────────────────────────────────────────────
// PumpService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates the pump controller.
pub struct PumpService<P, C> {
    pump: PumpController<P, C>,
    telemetry_interval_ms: u32,
    last_telemetry_ms: Millis,
    /// When the command behind the current operation was applied.
    operation_started_ms: Millis,
    tick_count: u64,
}

impl<P: SetDutyCycle, C: Clock> PumpService<P, C> {
    /// Construct the controller from configuration.
    pub fn new(config: &PumpConfig, pwm: P, clock: C) -> Result<Self> {
        let pump = PumpController::new(config, pwm, clock)?;
        let now = pump.now_ms();
        Ok(Self {
            pump,
            telemetry_interval_ms: config.telemetry_interval_ms,
            last_telemetry_ms: now,
            operation_started_ms: now,
            tick_count: 0,
        })
    }

    // ── Command handling ──────────────────────────────────────

    /// Apply an external command to the controller.
    pub fn handle_command(&mut self, cmd: PumpCommand, sink: &mut impl EventSink) {
        let prev = self.pump.target_mode();

        let accepted = match cmd {
            PumpCommand::SetSpeed(pct) => {
                self.pump.set_target_speed(pct);
                true
            }
            PumpCommand::SetFlowRate(rate) => {
                self.pump.set_target_flow_rate(rate);
                true
            }
            PumpCommand::DispenseVolume(ml) => self.pump.set_target_volume(ml),
            PumpCommand::Stop => {
                self.pump.set_target_speed(0.0);
                true
            }
        };

        if !accepted {
            sink.emit(&AppEvent::CommandIgnored(cmd));
            return;
        }

        self.operation_started_ms = self.pump.now_ms();
        sink.emit(&AppEvent::CommandAccepted(cmd));

        let mode = self.pump.target_mode();
        if mode != prev {
            sink.emit(&AppEvent::ModeChanged { from: prev, to: mode });
        }
        // Without ramping speed and flow targets settle synchronously.
        if mode == TargetMode::None {
            sink.emit(&AppEvent::OperationComplete {
                mode: cmd.mode(),
                duration_ms: 0,
            });
        }
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one controller update and emit whatever changed.
    pub fn tick(&mut self, sink: &mut impl EventSink) {
        self.tick_count += 1;
        let prev = self.pump.target_mode();

        self.pump.update();

        let now = self.pump.now_ms();
        let mode = self.pump.target_mode();
        if mode != prev {
            sink.emit(&AppEvent::ModeChanged { from: prev, to: mode });
            if mode == TargetMode::None {
                let duration_ms = elapsed_ms(self.operation_started_ms, now);
                info!("{:?} operation complete in {} ms", prev, duration_ms);
                sink.emit(&AppEvent::OperationComplete {
                    mode: prev,
                    duration_ms,
                });
            }
        }

        if elapsed_ms(self.last_telemetry_ms, now) >= self.telemetry_interval_ms {
            self.last_telemetry_ms = now;
            sink.emit(&AppEvent::Telemetry(self.build_telemetry()));
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build a telemetry snapshot from the controller state.
    pub fn build_telemetry(&self) -> PumpTelemetry {
        PumpTelemetry {
            mode: self.pump.target_mode(),
            speed_pct: self.pump.speed_percentage(),
            flow_ml_per_min: self.pump.flow_rate(),
            pump_on: self.pump.is_on(),
            duty: self.pump.duty(),
            pumped_ml: self.pump.pumped_volume(),
            target_ml: self.pump.target_volume(),
        }
    }

    /// Current controller target mode.
    pub fn mode(&self) -> TargetMode {
        self.pump.target_mode()
    }

    /// True once the last operation has settled.
    pub fn is_idle(&self) -> bool {
        self.pump.target_mode() == TargetMode::None
    }

    /// Total ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn now_ms(&self) -> Millis {
        self.pump.now_ms()
    }

    /// Read-only access to the controller for diagnostics.
    pub fn pump(&self) -> &PumpController<P, C> {
        &self.pump
    }
}
