//! `DemoSequence` stepping through a live `PumpService`.

use crate::mock_hw::{RecordingPwm, RecordingSink, SimClock, config};
use peripump::app::commands::PumpCommand;
use peripump::app::events::AppEvent;
use peripump::app::sequence::{DemoSequence, SequenceStep};
use peripump::app::service::PumpService;

fn two_step_sequence() -> DemoSequence {
    let mut seq = DemoSequence::new(10, 100);
    seq.push(SequenceStep {
        label: "half",
        command: PumpCommand::SetSpeed(50.0),
        hold_ms: 20,
    })
    .unwrap();
    seq.push(SequenceStep {
        label: "dose",
        command: PumpCommand::DispenseVolume(1.0),
        hold_ms: 0,
    })
    .unwrap();
    seq
}

fn run(
    seq: &mut DemoSequence,
    service: &mut PumpService<RecordingPwm, &SimClock>,
    clock: &SimClock,
    sink: &mut RecordingSink,
    ms: u32,
) {
    for _ in 0..ms {
        clock.advance(1);
        service.tick(sink);
        seq.poll(service, sink);
    }
}

fn finished_elapsed(sink: &RecordingSink, step: usize) -> Vec<u32> {
    sink.events
        .iter()
        .filter_map(|e| match e {
            AppEvent::StepFinished {
                index, elapsed_ms, ..
            } if *index == step => Some(*elapsed_ms),
            _ => None,
        })
        .collect()
}

#[test]
fn hold_time_is_respected() {
    let clock = SimClock::new(0);
    let mut service = PumpService::new(&config(false), RecordingPwm::new(), &clock).unwrap();
    let mut sink = RecordingSink::new();
    let mut seq = two_step_sequence();

    run(&mut seq, &mut service, &clock, &mut sink, 25);
    assert_eq!(finished_elapsed(&sink, 0), vec![20]);
    assert_eq!(seq.current_index(), 0);

    // Settling, then the next step is issued.
    run(&mut seq, &mut service, &clock, &mut sink, 10);
    assert_eq!(seq.current_index(), 1);
}

#[test]
fn volume_step_waits_for_dispense() {
    let clock = SimClock::new(0);
    let mut service = PumpService::new(&config(false), RecordingPwm::new(), &clock).unwrap();
    let mut sink = RecordingSink::new();
    let mut seq = two_step_sequence();

    run(&mut seq, &mut service, &clock, &mut sink, 500);
    assert!(finished_elapsed(&sink, 1).is_empty());
    assert!(!service.is_idle());

    run(&mut seq, &mut service, &clock, &mut sink, 500);
    let elapsed = finished_elapsed(&sink, 1);
    assert_eq!(elapsed.len(), 1);
    // 1 mL at 70 mL/min.
    assert!((855..=862).contains(&elapsed[0]), "dose took {} ms", elapsed[0]);
}

#[test]
fn sequence_pauses_then_restarts() {
    let clock = SimClock::new(0);
    let mut service = PumpService::new(&config(false), RecordingPwm::new(), &clock).unwrap();
    let mut sink = RecordingSink::new();
    let mut seq = two_step_sequence();

    run(&mut seq, &mut service, &clock, &mut sink, 950);
    assert_eq!(seq.cycles(), 1);
    assert_eq!(seq.current_index(), 0);
    let started = |s: &RecordingSink| s.count(|e| matches!(e, AppEvent::StepStarted { .. }));
    assert_eq!(started(&sink), 2);

    // The cycle pause ends 100 ms after the pass completes; stop before
    // the restarted step's 20 ms hold and 10 ms settle run out.
    run(&mut seq, &mut service, &clock, &mut sink, 60);
    assert_eq!(started(&sink), 3);
    let last_started = sink.events.iter().rev().find_map(|e| match e {
        AppEvent::StepStarted { index, .. } => Some(*index),
        _ => None,
    });
    assert_eq!(last_started, Some(0));
}

#[test]
fn empty_sequence_does_nothing() {
    let clock = SimClock::new(0);
    let mut service = PumpService::new(&config(true), RecordingPwm::new(), &clock).unwrap();
    let mut sink = RecordingSink::new();
    let mut seq = DemoSequence::new(0, 0);

    run(&mut seq, &mut service, &clock, &mut sink, 50);
    assert!(seq.is_empty());
    assert_eq!(sink.count(|e| matches!(e, AppEvent::StepStarted { .. })), 0);
}
