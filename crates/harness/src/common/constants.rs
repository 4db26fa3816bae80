//! Common constants used throughout the testbench driver.

/// Line prefix marking the end of one test vector in the input stream.
///
/// A line whose first character is this sentinel closes the current vector;
/// the driver then drains the DUT and pulses the finalize line.
pub const END_OF_VECTOR: char = '-';

/// Line prefix marking the end of the whole test suite in the input stream.
///
/// Distinct from [`END_OF_VECTOR`]; once read, no further vectors follow and
/// the driver transitions to its terminal state.
pub const END_OF_STREAM: char = '.';

/// Number of hexadecimal digits in one data-word line (64 bits).
pub const WORD_HEX_DIGITS: usize = 16;

/// Terminator line appended to the output record after each test.
///
/// Mirrors [`END_OF_VECTOR`] on the input side so result files can be
/// compared vector-for-vector against expectation files.
pub const RECORD_TERMINATOR: &str = "-";
