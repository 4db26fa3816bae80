//! Common types and constants shared across the testbench driver.
//!
//! This module provides the building blocks used by every other component:
//! 1. **Constants:** Input sentinels, word width, and the record terminator.
//! 2. **Error Handling:** The [`HarnessError`] taxonomy for parse and I/O failures.

/// Sentinel characters and word-format constants.
pub mod constants;

/// Error types for parsing and record writing.
pub mod error;

pub use constants::{END_OF_STREAM, END_OF_VECTOR, RECORD_TERMINATOR, WORD_HEX_DIGITS};
pub use error::HarnessError;
