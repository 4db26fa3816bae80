//! The signal bundle shared between the driver and the device under test.
//!
//! [`Signals`] is the single mutable interface between the two sides of the
//! testbench. Ownership is split by direction, not by reference: the driver
//! writes input lines and only reads output lines, while the DUT's `eval`
//! writes output lines and only reads input lines. Nothing else touches the
//! bundle.

/// Snapshot of every DUT-facing line at the current simulated instant.
///
/// Input lines (driver-owned): `clock`, `reset`, `start`, `data_in`,
/// `data_in_valid`, `last_block`. Output lines (DUT-owned): `buffer_full`,
/// `ready`, `data_out`, `data_out_valid`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Signals {
    /// Clock line, toggled once per half-cycle by the clock driver.
    pub clock: bool,
    /// Synchronous reset, held asserted through the reset sequence.
    pub reset: bool,
    /// Start strobe, pulsed for one cycle before each test's feed phase.
    pub start: bool,
    /// 64-bit input data word, sampled by the DUT while `data_in_valid` is high.
    pub data_in: u64,
    /// Qualifies `data_in`; asserted only while `buffer_full` is deasserted.
    pub data_in_valid: bool,
    /// Finalize strobe; asserted for exactly one clock cycle per test.
    pub last_block: bool,

    /// DUT backpressure: when asserted, the driver holds and feeds nothing.
    pub buffer_full: bool,
    /// DUT has absorbed all fed words and can accept the finalize strobe.
    pub ready: bool,
    /// 64-bit output data word, valid while `data_out_valid` is high.
    pub data_out: u64,
    /// Qualifies `data_out`; output words are recorded only while high.
    pub data_out_valid: bool,
}

impl Signals {
    /// Creates the bundle with every line at its power-on value.
    ///
    /// Reset is asserted from the first instant so the DUT never observes an
    /// un-reset cycle.
    pub fn new() -> Self {
        Self {
            reset: true,
            ..Self::default()
        }
    }

    /// Drives all non-clock input lines to their idle values.
    ///
    /// Used by the reset sequence and when re-arming between tests. The
    /// output lines are untouched; they belong to the DUT.
    pub fn idle_inputs(&mut self) {
        self.start = false;
        self.data_in = 0;
        self.data_in_valid = false;
        self.last_block = false;
    }
}
