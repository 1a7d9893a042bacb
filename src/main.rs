//! Peristaltic Pump Firmware: Main Entry Point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                    │
//! │                                                            │
//! │  LedcPumpOutput    SystemClock    LogEventSink   Watchdog  │
//! │  (SetDutyCycle)    (Clock)        (EventSink)              │
//! │                                                            │
//! │  ─────────────── Port Trait Boundary ──────────────────    │
//! │                                                            │
//! │  ┌──────────────────────────────────────────────────────┐  │
//! │  │          PumpService (pure logic)                    │  │
//! │  │  PumpController · Ramp · Volume cutoff               │  │
//! │  └──────────────────────────────────────────────────────┘  │
//! │                                                            │
//! │  DemoSequence (bench-test routine)                         │
//! └────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::time::Duration;

use anyhow::Result;
use log::info;

use peripump::adapters::log_sink::LogEventSink;
use peripump::adapters::time::SystemClock;
use peripump::app::sequence::DemoSequence;
use peripump::app::service::PumpService;
use peripump::config::PumpConfig;
use peripump::drivers::hw_init;
use peripump::drivers::pump::LedcPumpOutput;
use peripump::drivers::watchdog::Watchdog;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Peripump v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = PumpConfig::default();
    config.validate()?;

    // ── 3. Peripherals ────────────────────────────────────────
    hw_init::init_pump_pwm()?;
    let pwm = LedcPumpOutput::new(hw_init::LEDC_CH_PUMP);
    let clock = SystemClock::new();

    // ── 4. Application service ────────────────────────────────
    let mut service = PumpService::new(&config, pwm, clock)?;
    let mut log_sink = LogEventSink::new();
    let mut sequence = DemoSequence::bench_test()?;

    info!(
        "Starting pump bench test in {} ms...",
        config.startup_delay_ms
    );
    std::thread::sleep(Duration::from_millis(u64::from(config.startup_delay_ms)));

    // Subscribe after the startup delay so it cannot trip the watchdog.
    let watchdog = Watchdog::new(config.watchdog_timeout_ms);
    let loop_period = Duration::from_millis(u64::from(config.control_loop_interval_ms));

    info!("System ready. Entering control loop.");

    // ── 5. Control loop ───────────────────────────────────────
    loop {
        service.tick(&mut log_sink);
        sequence.poll(&mut service, &mut log_sink);
        watchdog.feed();
        std::thread::sleep(loop_period);
    }
}
