//! Error types for the testbench driver.
//!
//! Everything that can abort a run before or during clocking is a variant of
//! [`HarnessError`]. Protocol timeouts are deliberately *not* represented
//! here: watchdog expiry forces the driver into its terminal state with
//! partial output and is reported through
//! [`RunOutcome`](crate::driver::RunOutcome), not as an error.

use std::io;

/// Errors that can occur while parsing test vectors or configuration, or
/// writing records.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// The first input line did not parse as a decimal test count.
    #[error("first input line is not a decimal test count: {line:?}")]
    BadTestCount {
        /// The offending line, as read.
        line: String,
    },

    /// A data-word line was not exactly 16 hexadecimal digits.
    #[error("malformed data word: {token:?}")]
    MalformedWord {
        /// The offending token, as read.
        token: String,
    },

    /// The input stream ended before the end-of-stream sentinel was read.
    #[error("input ended before the end-of-stream sentinel")]
    UnexpectedEof,

    /// The configuration JSON failed to deserialize.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// An I/O error occurred on the input or output stream.
    #[error("stream I/O error: {0}")]
    Io(#[from] io::Error),
}
