//! The cycle-accurate driver: clock, protocol state machine, owning loop.
//!
//! This module contains the control core of the testbench. It provides:
//! 1. **Clock/Time:** [`ClockDriver`] toggles the clock line and bounds the run with a watchdog.
//! 2. **State machine:** [`ProtocolDriver`] sequences reset, feed, drain, finalize pulse, and collect.
//! 3. **Owning loop:** [`Harness`] runs the machine against a [`Dut`](crate::dut::Dut) it clocks itself.
//!
//! A foreign engine that owns its own clock loop uses the
//! [`bridge`](crate::bridge) front-end instead; both share this module's
//! token and record handling.

/// Clock toggling, simulated time, and the watchdog bound.
pub mod clock;

/// The protocol state machine.
pub mod fsm;

/// The owning run loop.
pub mod run;

pub use clock::ClockDriver;
pub use fsm::{DriverState, ProtocolDriver, StepResult};
pub use run::{Harness, RunOutcome};
