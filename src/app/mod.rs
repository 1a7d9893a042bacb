//! Application core: orchestration around the pump controller.
//!
//! The [`service::PumpService`] applies [`commands`] to the controller and
//! reports what happened as [`events`].  The [`sequence`] module replays
//! the bench-test routine through the service.  All interaction with
//! hardware happens through the traits in [`ports`].

pub mod commands;
pub mod events;
pub mod ports;
pub mod sequence;
pub mod service;
