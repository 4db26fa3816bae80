//! Configuration system for the testbench driver.
//!
//! This module defines all configuration structures used to parameterize a
//! run. It provides:
//! 1. **Defaults:** Baseline protocol constants (reset length, watchdog bound, output-gap threshold).
//! 2. **Structures:** Hierarchical config for run paths, protocol timing, and the loopback model.
//! 3. **Loading:** JSON deserialization via [`Config::from_json`] or `Config::default()` for the CLI.

use serde::Deserialize;

use crate::common::HarnessError;

/// Default configuration constants for the driver.
///
/// These values define the baseline behaviour when not explicitly
/// overridden in a JSON configuration file or on the command line.
mod defaults {
    /// Number of clock cycles reset is held asserted before the first test.
    pub const RESET_CYCLES: u32 = 30;

    /// Watchdog bound in half-cycles (clock edges).
    ///
    /// A run that has not reached its terminal state by this much simulated
    /// time is forced to finish with whatever output has been collected.
    pub const WATCHDOG_HALF_CYCLES: u64 = 3_000_000;

    /// Consecutive output-absent cycles tolerated before a test's record is
    /// considered complete.
    ///
    /// End of output is detected by absence, not by an explicit signal from
    /// the device, so this threshold is a heuristic: large enough to ride
    /// out single-cycle gaps in `data_out_valid`, small enough not to stall
    /// the suite. The per-test terminator is written once the gap counter
    /// *exceeds* this value.
    pub const OUTPUT_GAP_THRESHOLD: u32 = 3;

    /// Directory created for result and trace files before the run starts.
    pub const LOG_DIR: &str = "logs";

    /// Default output record path, relative to the working directory.
    pub const OUTPUT_FILE: &str = "logs/output.txt";

    /// Word capacity of the loopback model's input buffer.
    pub const LOOPBACK_CAPACITY: usize = 4;

    /// Cycles the loopback model takes to absorb one buffered word.
    pub const LOOPBACK_DRAIN_INTERVAL: u64 = 2;
}

/// Root configuration structure containing all driver settings.
///
/// Load from JSON with [`Config::from_json`], or use `Config::default()`
/// and apply command-line overrides.
///
/// # Examples
///
/// ```
/// use tbsim_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.protocol.reset_cycles, 30);
/// assert_eq!(config.protocol.output_gap_threshold, 3);
///
/// let json = r#"{
///     "run": { "output": "out/run7.txt" },
///     "protocol": { "watchdog_half_cycles": 500000 },
///     "loopback": { "capacity": 8 }
/// }"#;
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.run.output, "out/run7.txt");
/// assert_eq!(config.protocol.watchdog_half_cycles, 500_000);
/// assert_eq!(config.protocol.reset_cycles, 30);
/// assert_eq!(config.loopback.capacity, 8);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Run paths and side effects.
    #[serde(default)]
    pub run: RunConfig,
    /// Protocol timing parameters.
    #[serde(default)]
    pub protocol: ProtocolConfig,
    /// Loopback reference-model parameters.
    #[serde(default)]
    pub loopback: LoopbackConfig,
}

impl Config {
    /// Parses a configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Config`] when the JSON is malformed or
    /// contains fields of the wrong type.
    pub fn from_json(json: &str) -> Result<Self, HarnessError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Run paths and filesystem side effects.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Directory created before the run for result and trace files.
    #[serde(default = "RunConfig::default_log_dir")]
    pub log_dir: String,

    /// Path of the output record file.
    #[serde(default = "RunConfig::default_output")]
    pub output: String,
}

impl RunConfig {
    /// Returns the default log directory.
    fn default_log_dir() -> String {
        defaults::LOG_DIR.to_string()
    }

    /// Returns the default output record path.
    fn default_output() -> String {
        defaults::OUTPUT_FILE.to_string()
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            log_dir: Self::default_log_dir(),
            output: Self::default_output(),
        }
    }
}

/// Protocol timing parameters for the driver state machine.
#[derive(Debug, Clone, Deserialize)]
pub struct ProtocolConfig {
    /// Clock cycles reset is held asserted before the count-read phase.
    #[serde(default = "ProtocolConfig::default_reset_cycles")]
    pub reset_cycles: u32,

    /// Watchdog bound in half-cycles; expiry forces the terminal state.
    #[serde(default = "ProtocolConfig::default_watchdog")]
    pub watchdog_half_cycles: u64,

    /// Consecutive absent-output cycles tolerated before a test's record is
    /// closed. The terminator is written once the gap counter exceeds this.
    #[serde(default = "ProtocolConfig::default_gap_threshold")]
    pub output_gap_threshold: u32,
}

impl ProtocolConfig {
    /// Returns the default reset hold length in cycles.
    fn default_reset_cycles() -> u32 {
        defaults::RESET_CYCLES
    }

    /// Returns the default watchdog bound in half-cycles.
    fn default_watchdog() -> u64 {
        defaults::WATCHDOG_HALF_CYCLES
    }

    /// Returns the default output-gap threshold in cycles.
    fn default_gap_threshold() -> u32 {
        defaults::OUTPUT_GAP_THRESHOLD
    }
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            reset_cycles: defaults::RESET_CYCLES,
            watchdog_half_cycles: defaults::WATCHDOG_HALF_CYCLES,
            output_gap_threshold: defaults::OUTPUT_GAP_THRESHOLD,
        }
    }
}

/// Parameters of the built-in loopback reference model.
///
/// The loopback model stands in for a linked hardware model when exercising
/// the driver end to end; these knobs shape its backpressure and drain
/// timing so the full handshake is covered.
#[derive(Debug, Clone, Deserialize)]
pub struct LoopbackConfig {
    /// Input buffer capacity in words; `buffer_full` asserts at capacity.
    #[serde(default = "LoopbackConfig::default_capacity")]
    pub capacity: usize,

    /// Cycles taken to absorb one buffered word.
    #[serde(default = "LoopbackConfig::default_drain_interval")]
    pub drain_interval: u64,
}

impl LoopbackConfig {
    /// Returns the default loopback buffer capacity.
    fn default_capacity() -> usize {
        defaults::LOOPBACK_CAPACITY
    }

    /// Returns the default loopback drain interval in cycles.
    fn default_drain_interval() -> u64 {
        defaults::LOOPBACK_DRAIN_INTERVAL
    }
}

impl Default for LoopbackConfig {
    fn default() -> Self {
        Self {
            capacity: defaults::LOOPBACK_CAPACITY,
            drain_interval: defaults::LOOPBACK_DRAIN_INTERVAL,
        }
    }
}
