//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (the demo
//! sequencer, a serial console, a UI) that the
//! [`PumpService`](super::service::PumpService) turns into controller
//! targets.

use serde::{Deserialize, Serialize};

use crate::control::pump::TargetMode;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PumpCommand {
    /// Hold a speed, as a percentage of maximum (clamped to 0–100).
    SetSpeed(f32),

    /// Hold a flow rate in mL/min (clamped to 0–max flow).
    SetFlowRate(f32),

    /// Dispense a fixed volume in mL as quickly as possible.
    /// Non-positive volumes are ignored.
    DispenseVolume(f32),

    /// Bring the pump to rest (ramped when ramping is enabled).
    Stop,
}

impl PumpCommand {
    /// The target mode this command puts the controller in.
    pub fn mode(self) -> TargetMode {
        match self {
            Self::SetSpeed(_) | Self::Stop => TargetMode::Speed,
            Self::SetFlowRate(_) => TargetMode::FlowRate,
            Self::DispenseVolume(_) => TargetMode::Volume,
        }
    }
}
