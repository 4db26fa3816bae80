//! Cycle-accurate handshake testbench driver.
//!
//! This crate drives a synchronous device under test through a clocked
//! handshake protocol, feeding it 64-bit test vectors and collecting its
//! output for verification. It implements the following:
//! 1. **Signals:** The mutable line bundle shared between driver and DUT.
//! 2. **Vectors:** Streaming parser for the count/word/sentinel input format.
//! 3. **Driver:** Clock and watchdog, reset sequencing, and the protocol
//!    state machine (feed with backpressure, drain wait, one-cycle finalize
//!    pulse, output collection).
//! 4. **Records:** Append-only result writer with exactly-once close.
//! 5. **Bridge:** The same transition logic as discrete operations for an
//!    engine that owns its own clock loop.
//!
//! The DUT itself is an external collaborator behind the
//! [`Dut`](dut::Dut) trait; nothing here defines what it computes.

/// Bridge front-end for foreign engines that own the clock loop.
pub mod bridge;
/// Common types and constants (sentinels, word width, errors).
pub mod common;
/// Driver configuration (defaults, JSON loading, hierarchical structures).
pub mod config;
/// Clock, protocol state machine, and owning run loop.
pub mod driver;
/// The DUT trait seam and the loopback reference model.
pub mod dut;
/// Output record writer.
pub mod record;
/// Signal bundle shared between driver and DUT.
pub mod signals;
/// Run statistics collection and reporting.
pub mod stats;
/// Test-vector stream reader.
pub mod vector;

/// Root configuration type; use `Config::default()` or load from JSON.
pub use crate::config::Config;
/// Owning-loop driver; construct with `Harness::new` and call `run`.
pub use crate::driver::{Harness, RunOutcome};
/// The device-under-test seam.
pub use crate::dut::Dut;
/// The shared signal bundle.
pub use crate::signals::Signals;
