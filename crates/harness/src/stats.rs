//! Run statistics collection and reporting.
//!
//! Tracks what the driver did to the DUT over one run. It provides:
//! 1. **Time:** Half-cycles of simulated time and wall-clock duration.
//! 2. **Suite progress:** Declared vs. completed tests, words fed and collected.
//! 3. **Flow control:** Cycles spent held under backpressure and waiting to drain.

use std::time::Instant;

/// Statistics for one driver run.
#[derive(Debug, Clone)]
pub struct RunStats {
    start_time: Instant,
    /// Half-cycles (clock edges) of simulated time elapsed.
    pub half_cycles: u64,
    /// Test count declared on the first input line.
    pub tests_declared: u32,
    /// Tests whose output record was terminated.
    pub tests_completed: u32,
    /// Data words driven into the DUT with valid asserted.
    pub words_fed: u64,
    /// Output words appended to the record stream.
    pub words_collected: u64,
    /// Feed cycles held because the DUT asserted backpressure.
    pub backpressure_holds: u64,
    /// Cycles spent waiting for the DUT to drain before finalizing.
    pub drain_wait_cycles: u64,
    /// Whether the watchdog forced the run to finish.
    pub watchdog_expired: bool,
}

impl RunStats {
    /// Creates a zeroed statistics block with the wall clock started.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            half_cycles: 0,
            tests_declared: 0,
            tests_completed: 0,
            words_fed: 0,
            words_collected: 0,
            backpressure_holds: 0,
            drain_wait_cycles: 0,
            watchdog_expired: false,
        }
    }

    /// Prints the run report to stdout.
    pub fn print(&self) {
        let elapsed = self.start_time.elapsed();
        println!("--- Run Statistics ---");
        println!(
            "  Simulated time:   {} half-cycles ({} cycles)",
            self.half_cycles,
            self.half_cycles / 2
        );
        println!("  Wall clock:       {:.3}s", elapsed.as_secs_f64());
        println!(
            "  Tests:            {} completed / {} declared",
            self.tests_completed, self.tests_declared
        );
        println!("  Words fed:        {}", self.words_fed);
        println!("  Words collected:  {}", self.words_collected);
        println!("  Backpressure:     {} held cycles", self.backpressure_holds);
        println!("  Drain wait:       {} cycles", self.drain_wait_cycles);
        if self.watchdog_expired {
            println!("  Watchdog:         EXPIRED (partial output)");
        }
    }
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}
