//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! Telemetry is rendered as one JSON object per line so it can be
//! scraped off the serial console.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => match serde_json::to_string(t) {
                Ok(json) => info!("TELEM | {}", json),
                Err(e) => warn!("TELEM | serialisation failed: {}", e),
            },
            AppEvent::CommandAccepted(cmd) => {
                info!("CMD   | accepted {:?}", cmd);
            }
            AppEvent::CommandIgnored(cmd) => {
                info!("CMD   | ignored {:?}", cmd);
            }
            AppEvent::ModeChanged { from, to } => {
                info!("MODE  | {:?} -> {:?}", from, to);
            }
            AppEvent::OperationComplete { mode, duration_ms } => {
                info!("DONE  | {:?} in {} ms", mode, duration_ms);
            }
            AppEvent::StepStarted { index, label } => {
                info!("STEP  | #{} '{}' started", index, label);
            }
            AppEvent::StepFinished {
                index,
                label,
                elapsed_ms,
            } => {
                info!("STEP  | #{} '{}' done in {} ms", index, label, elapsed_ms);
            }
        }
    }
}
