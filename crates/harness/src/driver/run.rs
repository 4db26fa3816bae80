//! The owning-loop harness.
//!
//! [`Harness`] wires the clock driver, the protocol state machine, the
//! signal bundle, and the device under test together and owns the outer
//! loop: each iteration is one half clock cycle, toggling the clock,
//! stepping the state machine on the low phase, then `eval`ing the device.
//! Inputs are
//! always driven before the `eval` that advances DUT state; outputs are
//! sampled on the following low phase.
//!
//! The record stream is guaranteed closed on every exit path: normal
//! completion, device-requested finish, watchdog expiry, and fatal parse
//! or I/O errors.

use std::io::{BufRead, Write};

use tracing::{debug, info};

use crate::common::HarnessError;
use crate::config::Config;
use crate::driver::clock::ClockDriver;
use crate::driver::fsm::{ProtocolDriver, StepResult};
use crate::dut::Dut;
use crate::record::RecordWriter;
use crate::signals::Signals;
use crate::stats::RunStats;
use crate::vector::VectorReader;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The suite's end-of-stream sentinel was consumed.
    Completed,
    /// The device requested termination mid-run.
    DeviceFinish,
    /// The watchdog bound expired; the output is partial.
    WatchdogExpired,
}

/// Owning-loop driver: clocks a [`Dut`] through the whole test suite.
#[derive(Debug)]
pub struct Harness<D, R, W: Write> {
    dut: D,
    io: Signals,
    clock: ClockDriver,
    driver: ProtocolDriver<R, W>,
}

impl<D: Dut, R: BufRead, W: Write> Harness<D, R, W> {
    /// Builds a harness over an input vector stream and an output sink.
    ///
    /// The declared test count is parsed here, so a malformed first line
    /// fails before a single clock cycle is driven.
    ///
    /// # Errors
    ///
    /// Returns a parse error for a malformed or missing test count, or an
    /// I/O error from the input stream.
    pub fn new(config: &Config, dut: D, input: R, output: W) -> Result<Self, HarnessError> {
        let reader = VectorReader::new(input)?;
        let writer = RecordWriter::new(output);
        Ok(Self {
            dut,
            io: Signals::new(),
            clock: ClockDriver::new(config.protocol.watchdog_half_cycles),
            driver: ProtocolDriver::new(&config.protocol, reader, writer),
        })
    }

    /// Runs the suite to its terminal state.
    ///
    /// # Errors
    ///
    /// Returns parse and I/O errors; the record stream is closed before the
    /// error is handed back. Watchdog expiry and device-requested finish
    /// are not errors; they are reported through the returned
    /// [`RunOutcome`].
    pub fn run(&mut self) -> Result<RunOutcome, HarnessError> {
        let outcome = loop {
            self.clock.tick(&mut self.io);

            if !self.io.clock {
                if self.dut.finish_requested() {
                    info!(time = self.clock.now(), "device requested finish");
                    let done = self.driver.force_done(&mut self.io, false);
                    self.close_on(done)?;
                    break RunOutcome::DeviceFinish;
                }
                if self.clock.expired() {
                    info!(time = self.clock.now(), "watchdog expired, forcing done");
                    let done = self.driver.force_done(&mut self.io, true);
                    self.close_on(done)?;
                    break RunOutcome::WatchdogExpired;
                }
                let step = self.driver.step(&mut self.io);
                match self.close_on(step)? {
                    StepResult::Continued => {}
                    StepResult::Done => break RunOutcome::Completed,
                }
            }

            self.dut.eval(self.clock.now(), &mut self.io);
        };

        // Last eval on the current phase for level-sensitive devices; an
        // edge-triggered device sees no new edge here. Then the end-of-run
        // hook.
        self.dut.eval(self.clock.now(), &mut self.io);
        self.dut.finalize();
        self.driver.stats_mut().half_cycles = self.clock.now();
        debug!(half_cycles = self.clock.now(), ?outcome, "run finished");
        Ok(outcome)
    }

    /// Returns the statistics collected so far.
    pub const fn stats(&self) -> &RunStats {
        self.driver.stats()
    }

    /// Borrows the device under test.
    pub const fn dut(&self) -> &D {
        &self.dut
    }

    /// Consumes the harness, closing and returning the record sink.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Io`] if the final flush fails.
    pub fn into_record_sink(self) -> Result<Option<W>, HarnessError> {
        self.driver.into_record_sink()
    }

    /// Propagates `result`, closing the record stream first on the error
    /// path so no exit leaks an open stream.
    fn close_on<T>(&mut self, result: Result<T, HarnessError>) -> Result<T, HarnessError> {
        match result {
            Ok(v) => Ok(v),
            Err(e) => {
                let _ = self.driver.close_record();
                Err(e)
            }
        }
    }
}
