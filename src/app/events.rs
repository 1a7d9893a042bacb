//! Outbound application events.
//!
//! The [`PumpService`](super::service::PumpService) and the
//! [`DemoSequence`](super::sequence::DemoSequence) emit these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them.

use serde::Serialize;

use super::commands::PumpCommand;
use crate::control::pump::TargetMode;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Periodic telemetry snapshot.
    Telemetry(PumpTelemetry),

    /// A command was applied to the controller.
    CommandAccepted(PumpCommand),

    /// A command had no effect (e.g. a non-positive volume).
    CommandIgnored(PumpCommand),

    /// The controller's target mode changed.
    ModeChanged { from: TargetMode, to: TargetMode },

    /// An operation settled: the target mode returned to `None`.
    /// `duration_ms` runs from the command that started it.
    OperationComplete { mode: TargetMode, duration_ms: u32 },

    /// The demo sequencer began a step.
    StepStarted { index: usize, label: &'static str },

    /// The demo sequencer finished a step.
    StepFinished {
        index: usize,
        label: &'static str,
        elapsed_ms: u32,
    },
}

/// A point-in-time telemetry snapshot suitable for logging or transmission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PumpTelemetry {
    pub mode: TargetMode,
    pub speed_pct: f32,
    pub flow_ml_per_min: f32,
    pub pump_on: bool,
    /// Raw duty last written to the PWM channel.
    pub duty: u16,
    /// Volume dispensed since the last volume target was set.
    pub pumped_ml: f64,
    /// Last volume target (0 if none was ever set).
    pub target_ml: f32,
}
