//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ PumpController / PumpService (domain)
//! ```
//!
//! Driven adapters (clock, event sinks) implement these traits.  The duty
//! cycle sink is not redefined here: the controller consumes any
//! [`embedded_hal::pwm::SetDutyCycle`] implementation directly, so a HAL
//! PWM channel, the LEDC driver in [`crate::drivers::pump`], or a test
//! double can all drive the pump.

use crate::time::Millis;

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: hardware timer → domain)
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond counter.
///
/// The counter is allowed to wrap at [`crate::time::COUNTER_MAX`]; the
/// domain only ever compares readings through
/// [`crate::time::elapsed_ms`].
pub trait Clock {
    /// Current counter value in milliseconds.
    fn now_ms(&self) -> Millis;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> Millis {
        (**self).now_ms()
    }
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log, a
/// display, a test recorder, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
