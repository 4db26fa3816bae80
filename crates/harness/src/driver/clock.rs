//! Clock and simulated-time driver.
//!
//! Owns the clock line and the monotonic half-cycle counter that is the
//! run's only notion of simulated time. The counter is handed to the DUT on
//! every `eval`, standing in for the device's time query, and is checked
//! against the watchdog bound that guarantees termination on a stalled DUT.

use crate::signals::Signals;

/// Toggles the clock line and tracks simulated time.
#[derive(Debug)]
pub struct ClockDriver {
    half_cycles: u64,
    watchdog_bound: u64,
}

impl ClockDriver {
    /// Creates a clock driver with the given watchdog bound in half-cycles.
    pub const fn new(watchdog_bound: u64) -> Self {
        Self {
            half_cycles: 0,
            watchdog_bound,
        }
    }

    /// Toggles the clock line and advances simulated time by one half-cycle.
    pub fn tick(&mut self, io: &mut Signals) {
        io.clock = !io.clock;
        self.half_cycles += 1;
    }

    /// Returns the current simulated time in half-cycles.
    pub const fn now(&self) -> u64 {
        self.half_cycles
    }

    /// Reports whether simulated time has exceeded the watchdog bound.
    ///
    /// Expiry is not an error: the driver responds by forcing its terminal
    /// state with whatever output has been collected so far.
    pub const fn expired(&self) -> bool {
        self.half_cycles > self.watchdog_bound
    }
}
