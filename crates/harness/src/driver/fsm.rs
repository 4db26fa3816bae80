//! The protocol state machine.
//!
//! One parameterized transition table sequences every run: reset hold,
//! count read, data feed under backpressure, drain wait, the one-cycle
//! finalize pulse, and output collection, per test, across the suite. The
//! machine is stepped externally, once per clock cycle on the low phase,
//! so the owning loop and any foreign engine share the exact same logic
//! instead of duplicating it.
//!
//! Invariants enforced here:
//! - `data_in_valid` is asserted only on cycles where `buffer_full` is
//!   deasserted; a held feed cycle always deasserts it.
//! - `last_block` is high for exactly one clock cycle per test, and only
//!   once the DUT has drained (`!buffer_full && ready`).
//! - The per-test terminator is written only after output has been absent
//!   for more than the configured number of consecutive cycles, so a
//!   single-cycle gap in `data_out_valid` never splits a record.

use std::io::Write;

use tracing::{debug, warn};

use crate::common::HarnessError;
use crate::config::ProtocolConfig;
use crate::record::RecordWriter;
use crate::signals::Signals;
use crate::stats::RunStats;
use crate::vector::{Token, VectorReader};

/// Protocol driver states, in the order a test flows through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Holding reset with all inputs idle.
    Reset,
    /// Reset released; start strobed; suite count latched.
    ReadCount,
    /// Feeding data words, holding under backpressure.
    Feed,
    /// Waiting for the DUT to drain before finalizing.
    DrainWait,
    /// The finalize strobe was high for the cycle now ending.
    PulseFinalize,
    /// Collecting output words until they stop arriving.
    Collect,
    /// Terminal state; the record stream is closed.
    Done,
}

/// The result of a single driver step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    /// The run can continue.
    Continued,
    /// The terminal state was reached; stop clocking.
    Done,
}

/// The protocol state machine, generic over the vector source and record sink.
#[derive(Debug)]
pub struct ProtocolDriver<R, W: Write> {
    state: DriverState,
    reset_remaining: u32,
    gap_threshold: u32,
    output_gap: u32,
    reader: VectorReader<R>,
    writer: RecordWriter<W>,
    stats: RunStats,
}

impl<R: std::io::BufRead, W: Write> ProtocolDriver<R, W> {
    /// Builds the machine around an already-opened reader and writer.
    ///
    /// The reader has parsed the declared suite count by this point, so a
    /// malformed count has already failed the run without a single clock
    /// cycle driven.
    pub fn new(config: &ProtocolConfig, reader: VectorReader<R>, writer: RecordWriter<W>) -> Self {
        let mut stats = RunStats::new();
        stats.tests_declared = reader.declared_count();
        Self {
            state: DriverState::Reset,
            reset_remaining: config.reset_cycles.max(1),
            gap_threshold: config.output_gap_threshold,
            output_gap: 0,
            reader,
            writer,
            stats,
        }
    }

    /// Returns the current state.
    pub const fn state(&self) -> DriverState {
        self.state
    }

    /// Returns the statistics collected so far.
    pub const fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Mutable access to the statistics block, for the owning loop.
    pub fn stats_mut(&mut self) -> &mut RunStats {
        &mut self.stats
    }

    /// Advances the machine by one clock cycle.
    ///
    /// Must be called on the low clock phase, before the `eval` that
    /// advances DUT state; output lines in `io` reflect the previous rising
    /// edge.
    ///
    /// # Errors
    ///
    /// Propagates parse errors from the vector stream and I/O errors from
    /// the record stream. The caller is responsible for closing the record
    /// stream when aborting on an error.
    pub fn step(&mut self, io: &mut Signals) -> Result<StepResult, HarnessError> {
        match self.state {
            DriverState::Reset => {
                io.reset = true;
                io.idle_inputs();
                self.reset_remaining -= 1;
                if self.reset_remaining == 0 {
                    self.state = DriverState::ReadCount;
                }
                Ok(StepResult::Continued)
            }

            DriverState::ReadCount => {
                io.reset = false;
                io.start = true;
                debug!(tests = self.reader.declared_count(), "suite count latched");
                self.state = DriverState::Feed;
                Ok(StepResult::Continued)
            }

            DriverState::Feed => {
                io.start = false;
                if io.buffer_full {
                    // Backpressure hold: the reader does not advance.
                    io.data_in_valid = false;
                    self.stats.backpressure_holds += 1;
                    return Ok(StepResult::Continued);
                }
                match self.reader.next_token()? {
                    Token::Word(word) => {
                        io.data_in = word;
                        io.data_in_valid = true;
                        self.stats.words_fed += 1;
                        Ok(StepResult::Continued)
                    }
                    Token::EndOfVector => {
                        io.data_in_valid = false;
                        self.state = DriverState::DrainWait;
                        Ok(StepResult::Continued)
                    }
                    Token::EndOfStream => {
                        io.data_in_valid = false;
                        self.finish(false)?;
                        Ok(StepResult::Done)
                    }
                }
            }

            DriverState::DrainWait => {
                io.data_in_valid = false;
                if !io.buffer_full && io.ready {
                    io.last_block = true;
                    self.state = DriverState::PulseFinalize;
                } else {
                    self.stats.drain_wait_cycles += 1;
                }
                Ok(StepResult::Continued)
            }

            DriverState::PulseFinalize => {
                // The strobe was high for exactly the one cycle now ending.
                io.last_block = false;
                self.output_gap = 0;
                self.state = DriverState::Collect;
                Ok(StepResult::Continued)
            }

            DriverState::Collect => {
                if io.data_out_valid {
                    self.writer.emit(io.data_out)?;
                    self.stats.words_collected += 1;
                    self.output_gap = 0;
                } else {
                    self.output_gap += 1;
                    if self.output_gap > self.gap_threshold {
                        self.writer.emit_terminator()?;
                        self.stats.tests_completed += 1;
                        debug!(test = self.stats.tests_completed, "record terminated");
                        io.start = true;
                        self.state = DriverState::Feed;
                    }
                }
                Ok(StepResult::Continued)
            }

            DriverState::Done => Ok(StepResult::Done),
        }
    }

    /// Forces the terminal state from wherever the machine is.
    ///
    /// Used on watchdog expiry and device-requested termination; whatever
    /// output has been collected stands, and the record stream is closed.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Io`] if the final flush of the record stream
    /// fails.
    pub fn force_done(&mut self, io: &mut Signals, watchdog: bool) -> Result<(), HarnessError> {
        io.idle_inputs();
        self.stats.watchdog_expired = watchdog;
        self.finish(true)
    }

    /// Closes the record stream without touching statistics.
    ///
    /// Error-path cleanup for the owning loop; close errors are the
    /// caller's to ignore, since an original error is already in flight.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Io`] if the final flush fails.
    pub fn close_record(&mut self) -> Result<(), HarnessError> {
        self.writer.close()
    }

    /// Consumes the machine, closing and returning the record sink.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Io`] if the final flush fails.
    pub fn into_record_sink(self) -> Result<Option<W>, HarnessError> {
        self.writer.into_inner()
    }

    fn finish(&mut self, forced: bool) -> Result<(), HarnessError> {
        self.state = DriverState::Done;
        if !forced && self.stats.tests_completed != self.stats.tests_declared {
            warn!(
                declared = self.stats.tests_declared,
                completed = self.stats.tests_completed,
                "declared test count diverges from vectors consumed"
            );
        }
        self.writer.close()
    }
}
