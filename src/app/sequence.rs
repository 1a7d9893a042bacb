//! Bench-test sequencer.
//!
//! Replays a fixed list of pump commands through the [`PumpService`],
//! one step at a time, without ever blocking the control loop:
//!
//! ```text
//!   Issue ──▶ Running ──(hold elapsed AND pump idle)──▶ Settling ──▶ next step
//!                                                          │
//!                                      after the last step ▼
//!                                                        Paused ──▶ restart_index
//! ```
//!
//! A step only finishes once its hold time has passed *and* the
//! controller reports [`TargetMode::None`](crate::control::pump::TargetMode::None),
//! so volume steps run for as long as the dispense takes.

use embedded_hal::pwm::SetDutyCycle;
use heapless::Vec;
use log::info;

use super::commands::PumpCommand;
use super::events::AppEvent;
use super::ports::{Clock, EventSink};
use super::service::PumpService;
use crate::error::{Error, Result};
use crate::time::{Millis, elapsed_ms};

/// Maximum number of steps in a sequence (stack-allocated).
pub const MAX_STEPS: usize = 8;

/// Pause between a finished step and the next one.
pub const DEFAULT_SETTLE_MS: u32 = 5_000;
/// Pause after the last step before the routine repeats.
pub const DEFAULT_CYCLE_PAUSE_MS: u32 = 60_000;

const THREE_MINUTES_MS: u32 = 3 * 60 * 1000;

const BENCH_TEST_STEPS: [SequenceStep; 5] = [
    SequenceStep {
        label: "full speed flow check",
        command: PumpCommand::SetSpeed(100.0),
        hold_ms: THREE_MINUTES_MS,
    },
    SequenceStep {
        label: "half speed",
        command: PumpCommand::SetSpeed(50.0),
        hold_ms: THREE_MINUTES_MS,
    },
    SequenceStep {
        label: "35 mL/min",
        command: PumpCommand::SetFlowRate(35.0),
        hold_ms: THREE_MINUTES_MS,
    },
    SequenceStep {
        label: "stop",
        command: PumpCommand::Stop,
        hold_ms: 0,
    },
    SequenceStep {
        label: "dispense 80 mL",
        command: PumpCommand::DispenseVolume(80.0),
        hold_ms: 0,
    },
];

/// A single sequencer step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequenceStep {
    pub label: &'static str,
    pub command: PumpCommand,
    /// Minimum time to stay on this step after issuing the command.
    pub hold_ms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Issue,
    Running { since: Millis },
    Settling { since: Millis },
    Paused { since: Millis },
}

/// Non-blocking command sequencer.
pub struct DemoSequence {
    steps: Vec<SequenceStep, MAX_STEPS>,
    index: usize,
    /// Step to resume from after each full pass.
    restart_index: usize,
    settle_ms: u32,
    cycle_pause_ms: u32,
    phase: Phase,
    cycles: u32,
}

impl DemoSequence {
    pub fn new(settle_ms: u32, cycle_pause_ms: u32) -> Self {
        Self {
            steps: Vec::new(),
            index: 0,
            restart_index: 0,
            settle_ms,
            cycle_pause_ms,
            phase: Phase::Issue,
            cycles: 0,
        }
    }

    /// The pump bench test: a one-off full-speed run for measuring the
    /// real maximum flow, then half speed, 35 mL/min, stop, and an 80 mL
    /// dispense, repeated forever.
    pub fn bench_test() -> Result<Self> {
        Self::from_steps(&BENCH_TEST_STEPS, 1, DEFAULT_SETTLE_MS, DEFAULT_CYCLE_PAUSE_MS)
    }

    /// Build a sequence from `steps`, resuming from `restart_index` after
    /// each pass.
    pub fn from_steps(
        steps: &[SequenceStep],
        restart_index: usize,
        settle_ms: u32,
        cycle_pause_ms: u32,
    ) -> Result<Self> {
        let mut seq = Self::new(settle_ms, cycle_pause_ms);
        seq.steps = Vec::from_slice(steps)
            .map_err(|()| Error::Config("sequence longer than MAX_STEPS"))?;
        seq.set_restart_index(restart_index);
        Ok(seq)
    }

    /// Append a step.  Hands the step back if the sequence is full.
    pub fn push(&mut self, step: SequenceStep) -> core::result::Result<(), SequenceStep> {
        self.steps.push(step)
    }

    /// Step to resume from after each pass; clamped to the last step.
    pub fn set_restart_index(&mut self, index: usize) {
        self.restart_index = index.min(self.steps.len().saturating_sub(1));
    }

    /// Drive the sequence.  Call once per control loop iteration, after
    /// [`PumpService::tick`].
    pub fn poll<P: SetDutyCycle, C: Clock>(
        &mut self,
        service: &mut PumpService<P, C>,
        sink: &mut impl EventSink,
    ) {
        let Some(step) = self.steps.get(self.index).copied() else {
            return;
        };
        let now = service.now_ms();

        match self.phase {
            Phase::Issue => {
                info!("Sequence: step {} '{}'", self.index, step.label);
                sink.emit(&AppEvent::StepStarted {
                    index: self.index,
                    label: step.label,
                });
                service.handle_command(step.command, sink);
                self.phase = Phase::Running { since: now };
            }
            Phase::Running { since } => {
                let elapsed = elapsed_ms(since, now);
                if elapsed >= step.hold_ms && service.is_idle() {
                    info!("Sequence: '{}' done in {} ms", step.label, elapsed);
                    sink.emit(&AppEvent::StepFinished {
                        index: self.index,
                        label: step.label,
                        elapsed_ms: elapsed,
                    });
                    self.phase = Phase::Settling { since: now };
                }
            }
            Phase::Settling { since } => {
                if elapsed_ms(since, now) >= self.settle_ms {
                    self.advance(now);
                }
            }
            Phase::Paused { since } => {
                if elapsed_ms(since, now) >= self.cycle_pause_ms {
                    self.phase = Phase::Issue;
                }
            }
        }
    }

    /// Index of the step currently being run.
    pub fn current_index(&self) -> usize {
        self.index
    }

    /// Completed passes through the sequence.
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    fn advance(&mut self, now: Millis) {
        self.index += 1;
        if self.index < self.steps.len() {
            self.phase = Phase::Issue;
        } else {
            self.cycles += 1;
            self.index = self.restart_index;
            info!(
                "Sequence: pass {} complete, pausing {} ms",
                self.cycles, self.cycle_pause_ms
            );
            self.phase = Phase::Paused { since: now };
        }
    }
}
