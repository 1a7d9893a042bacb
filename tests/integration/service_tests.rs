//! `PumpService` command handling and event emission.

use crate::mock_hw::{RecordingPwm, RecordingSink, SimClock, config};
use peripump::app::commands::PumpCommand;
use peripump::app::events::AppEvent;
use peripump::app::service::PumpService;
use peripump::control::pump::TargetMode;

fn make_service(ramp: bool, clock: &SimClock) -> PumpService<RecordingPwm, &SimClock> {
    PumpService::new(&config(ramp), RecordingPwm::new(), clock).unwrap()
}

fn tick_for(
    service: &mut PumpService<RecordingPwm, &SimClock>,
    clock: &SimClock,
    sink: &mut RecordingSink,
    ms: u32,
) {
    for _ in 0..ms {
        clock.advance(1);
        service.tick(sink);
    }
}

// ── Commands ──────────────────────────────────────────────────

#[test]
fn ramped_speed_command_reports_start_and_completion() {
    let clock = SimClock::new(0);
    let mut service = make_service(true, &clock);
    let mut sink = RecordingSink::new();

    service.handle_command(PumpCommand::SetSpeed(50.0), &mut sink);
    assert_eq!(
        sink.events,
        vec![
            AppEvent::CommandAccepted(PumpCommand::SetSpeed(50.0)),
            AppEvent::ModeChanged {
                from: TargetMode::None,
                to: TargetMode::Speed,
            },
        ]
    );
    assert!(!service.is_idle());

    sink.clear();
    tick_for(&mut service, &clock, &mut sink, 60);
    assert!(service.is_idle());
    assert!(sink.events.contains(&AppEvent::ModeChanged {
        from: TargetMode::Speed,
        to: TargetMode::None,
    }));
    assert!(sink.events.contains(&AppEvent::OperationComplete {
        mode: TargetMode::Speed,
        duration_ms: 50,
    }));
}

#[test]
fn unramped_command_completes_immediately() {
    let clock = SimClock::new(0);
    let mut service = make_service(false, &clock);
    let mut sink = RecordingSink::new();

    service.handle_command(PumpCommand::SetFlowRate(35.0), &mut sink);
    assert_eq!(
        sink.events,
        vec![
            AppEvent::CommandAccepted(PumpCommand::SetFlowRate(35.0)),
            AppEvent::OperationComplete {
                mode: TargetMode::FlowRate,
                duration_ms: 0,
            },
        ]
    );
    assert_eq!(service.pump().speed_percentage(), 50.0);
}

#[test]
fn non_positive_volume_is_reported_as_ignored() {
    let clock = SimClock::new(0);
    let mut service = make_service(true, &clock);
    let mut sink = RecordingSink::new();

    service.handle_command(PumpCommand::DispenseVolume(-5.0), &mut sink);
    assert_eq!(
        sink.events,
        vec![AppEvent::CommandIgnored(PumpCommand::DispenseVolume(-5.0))]
    );
    assert_eq!(service.mode(), TargetMode::None);
}

#[test]
fn stop_ramps_to_rest() {
    let clock = SimClock::new(0);
    let mut service = make_service(true, &clock);
    let mut sink = RecordingSink::new();

    service.handle_command(PumpCommand::SetSpeed(100.0), &mut sink);
    tick_for(&mut service, &clock, &mut sink, 120);
    service.handle_command(PumpCommand::Stop, &mut sink);
    assert_eq!(service.mode(), TargetMode::Speed);

    tick_for(&mut service, &clock, &mut sink, 120);
    assert!(service.is_idle());
    assert!(!service.pump().is_on());
    assert_eq!(service.pump().pwm().last_duty(), Some(0));
}

#[test]
fn volume_dispense_reports_duration() {
    let clock = SimClock::new(0);
    let mut service = make_service(false, &clock);
    let mut sink = RecordingSink::new();

    service.handle_command(PumpCommand::DispenseVolume(1.0), &mut sink);
    assert_eq!(service.mode(), TargetMode::Volume);

    // 1 mL at 70 mL/min is just under 860 ms.
    for _ in 0..100 {
        clock.advance(10);
        service.tick(&mut sink);
    }
    assert!(service.is_idle());

    let durations: Vec<u32> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::OperationComplete {
                mode: TargetMode::Volume,
                duration_ms,
            } => Some(*duration_ms),
            _ => None,
        })
        .collect();
    assert_eq!(durations, vec![860]);
}

// ── Telemetry ─────────────────────────────────────────────────

#[test]
fn telemetry_is_emitted_once_per_interval() {
    let clock = SimClock::new(0);
    let mut service = make_service(true, &clock);
    let mut sink = RecordingSink::new();

    tick_for(&mut service, &clock, &mut sink, 2_500);
    let n = sink.count(|e| matches!(e, AppEvent::Telemetry(_)));
    assert_eq!(n, 2);
    assert_eq!(service.tick_count(), 2_500);
}

#[test]
fn telemetry_reflects_controller_state() {
    let clock = SimClock::new(0);
    let mut service = make_service(false, &clock);
    let mut sink = RecordingSink::new();

    service.handle_command(PumpCommand::SetSpeed(50.0), &mut sink);
    let t = service.build_telemetry();
    assert_eq!(t.mode, TargetMode::None);
    assert_eq!(t.speed_pct, 50.0);
    assert!((t.flow_ml_per_min - 35.0).abs() < 1e-4);
    assert!(t.pump_on);
    assert_eq!(t.duty, 128);
    assert_eq!(t.pumped_ml, 0.0);
}

#[test]
fn telemetry_serialises_to_json() {
    let clock = SimClock::new(0);
    let service = make_service(true, &clock);
    let json = serde_json::to_string(&service.build_telemetry()).unwrap();
    assert!(json.contains("\"mode\":\"None\""));
    assert!(json.contains("\"pump_on\":false"));
}

#[test]
fn invalid_config_is_rejected() {
    let clock = SimClock::new(0);
    let mut cfg = config(true);
    cfg.max_flow_ml_per_min = 0.0;
    assert!(PumpService::new(&cfg, RecordingPwm::new(), &clock).is_err());
}
