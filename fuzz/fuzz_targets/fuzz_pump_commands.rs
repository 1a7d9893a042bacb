//! Fuzz target: `PumpController` command stream
//!
//! Decodes arbitrary bytes into a stream of target changes and clock
//! advances (including jumps across the counter wrap) and checks after
//! every step:
//! - No panics under any byte sequence
//! - Speed stays within 0–100 % and flow stays proportional to it
//! - The PWM duty never exceeds the channel maximum
//!
//! cargo fuzz run fuzz_pump_commands

#![no_main]

use core::cell::Cell;
use core::convert::Infallible;

use embedded_hal::pwm::{ErrorType, SetDutyCycle};
use libfuzzer_sys::fuzz_target;
use peripump::app::ports::Clock;
use peripump::config::PumpConfig;
use peripump::control::pump::PumpController;

struct FuzzClock(Cell<u32>);

impl Clock for FuzzClock {
    fn now_ms(&self) -> u32 {
        self.0.get()
    }
}

struct CheckedPwm;

impl ErrorType for CheckedPwm {
    type Error = Infallible;
}

impl SetDutyCycle for CheckedPwm {
    fn max_duty_cycle(&self) -> u16 {
        255
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
        assert!(duty <= 255, "duty {duty} above maximum");
        Ok(())
    }
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 5 {
        return;
    }

    let (head, ops) = data.split_at(5);
    let start = u32::from_le_bytes([head[0], head[1], head[2], head[3]]);
    let config = PumpConfig {
        ramp_enabled: head[4] & 1 == 1,
        ..PumpConfig::default()
    };

    let clock = FuzzClock(Cell::new(start));
    let Ok(mut pump) = PumpController::new(&config, CheckedPwm, &clock) else {
        return;
    };

    // Each op is a tag byte followed by a 4-byte payload.
    for chunk in ops.chunks_exact(5) {
        let payload = [chunk[1], chunk[2], chunk[3], chunk[4]];
        let value = f32::from_le_bytes(payload);
        match chunk[0] % 4 {
            0 => pump.set_target_speed(value),
            1 => pump.set_target_flow_rate(value),
            2 => {
                // Keep doses small so the run stays bounded.
                let _ = pump.set_target_volume(value % 5.0);
            }
            _ => {
                let step = u32::from_le_bytes(payload) % 10_000;
                clock.0.set(clock.0.get().wrapping_add(step));
                pump.update();
            }
        }

        let speed = pump.speed_percentage();
        assert!((0.0..=100.0).contains(&speed), "speed {speed}");
        let expected = speed / 100.0 * pump.max_flow_rate();
        assert!((pump.flow_rate() - expected).abs() < 1e-3);
        assert!(pump.pumped_volume() >= 0.0);
    }
});
