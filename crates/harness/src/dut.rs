//! The device-under-test seam.
//!
//! This module defines the [`Dut`] trait implemented by every clocked device
//! the driver can exercise. It provides:
//! 1. **Evaluation:** `eval` advances device state against the shared [`Signals`] bundle.
//! 2. **Lifecycle:** Optional device-requested termination and end-of-run finalization.
//! 3. **Reference model:** [`LoopbackDut`], a behavioural model with real
//!    backpressure and drain timing, used by the CLI and the test suite in
//!    place of a linked hardware model.
//!
//! The device owns the output lines of the bundle exclusively; the driver
//! owns the input lines. `eval` is called once per clock edge, after the
//! driver has driven its inputs for that edge.

use std::collections::VecDeque;

use crate::config::LoopbackConfig;
use crate::signals::Signals;

/// A synchronous device driven through the handshake protocol.
///
/// Implementors are opaque to the driver: only the signal bundle crosses the
/// seam. Edge detection is the implementation's concern; `eval` fires on
/// both clock phases.
pub trait Dut {
    /// Advances device state for the current clock phase.
    ///
    /// `time` is the monotonic half-cycle counter, the device's only view of
    /// simulated time. Output lines of `io` may be rewritten; input lines
    /// must only be read.
    fn eval(&mut self, time: u64, io: &mut Signals);

    /// Reports whether the device has requested the run to stop.
    ///
    /// Checked once per loop iteration by the owning driver; a `true` forces
    /// the terminal state with full resource cleanup.
    fn finish_requested(&self) -> bool {
        false
    }

    /// Called exactly once when the run reaches its terminal state.
    fn finalize(&mut self) {}
}

/// What the loopback model is currently doing with its absorbed words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopbackPhase {
    /// Accepting input words into the bounded buffer.
    Absorbing,
    /// Streaming absorbed words back out, one per cycle.
    Emitting(usize),
}

/// Behavioural reference model: echoes each vector back after finalization.
///
/// The model buffers fed words in a bounded queue (asserting `buffer_full`
/// at capacity), absorbs one buffered word every `drain_interval` cycles,
/// asserts `ready` once the queue is empty, and after the one-cycle
/// `last_block` pulse streams the absorbed words back on `data_out` with
/// `data_out_valid` high. It computes nothing; the echo makes driver
/// behaviour fully predictable for verification.
#[derive(Debug)]
pub struct LoopbackDut {
    capacity: usize,
    drain_interval: u64,
    prev_clock: bool,
    edge_count: u64,
    queue: VecDeque<u64>,
    absorbed: Vec<u64>,
    phase: LoopbackPhase,
}

impl LoopbackDut {
    /// Creates the model from the loopback section of the configuration.
    pub fn new(config: &LoopbackConfig) -> Self {
        Self {
            capacity: config.capacity.max(1),
            drain_interval: config.drain_interval.max(1),
            prev_clock: false,
            edge_count: 0,
            queue: VecDeque::new(),
            absorbed: Vec::new(),
            phase: LoopbackPhase::Absorbing,
        }
    }

    /// Registered update, run on each rising clock edge.
    fn rising_edge(&mut self, io: &mut Signals) {
        if io.reset {
            self.queue.clear();
            self.absorbed.clear();
            self.phase = LoopbackPhase::Absorbing;
            io.buffer_full = false;
            io.ready = false;
            io.data_out = 0;
            io.data_out_valid = false;
            return;
        }

        // Start strobe re-arms the model for the next vector.
        if io.start {
            self.queue.clear();
            self.absorbed.clear();
            self.phase = LoopbackPhase::Absorbing;
            io.data_out = 0;
            io.data_out_valid = false;
        }

        self.edge_count += 1;

        match self.phase {
            LoopbackPhase::Absorbing => {
                if io.data_in_valid && self.queue.len() < self.capacity {
                    self.queue.push_back(io.data_in);
                }
                if self.edge_count % self.drain_interval == 0
                    && let Some(word) = self.queue.pop_front()
                {
                    self.absorbed.push(word);
                }
                io.buffer_full = self.queue.len() >= self.capacity;
                io.ready = self.queue.is_empty();
                io.data_out_valid = false;

                if io.last_block && self.queue.is_empty() {
                    self.phase = LoopbackPhase::Emitting(0);
                }
            }
            LoopbackPhase::Emitting(next) => {
                io.buffer_full = false;
                io.ready = false;
                if let Some(word) = self.absorbed.get(next) {
                    io.data_out = *word;
                    io.data_out_valid = true;
                    self.phase = LoopbackPhase::Emitting(next + 1);
                } else {
                    io.data_out_valid = false;
                }
            }
        }
    }
}

impl Dut for LoopbackDut {
    fn eval(&mut self, _time: u64, io: &mut Signals) {
        let rising = io.clock && !self.prev_clock;
        self.prev_clock = io.clock;
        if rising {
            self.rising_edge(io);
        }
    }
}
