//! Output record writer.
//!
//! Formats collected output words into the line-oriented result format: one
//! uppercase 16-hex-digit word per line, a `-` terminator line after each
//! test, nothing after the suite. All writes are append-only; the stream is
//! opened once at run start and closed exactly once, on every exit path.
//! [`RecordWriter::close`] is idempotent and `Drop` closes as a backstop.

use std::io::{self, Write};

use crate::common::{HarnessError, RECORD_TERMINATOR};

/// Append-only writer for the output record stream.
///
/// Closing flushes the sink and rejects further writes, but the sink itself
/// is kept so [`into_inner`](Self::into_inner) can hand back everything
/// that was written.
#[derive(Debug)]
pub struct RecordWriter<W: Write> {
    out: Option<W>,
    closed: bool,
}

impl<W: Write> RecordWriter<W> {
    /// Wraps the given sink; the record stream is now open.
    pub const fn new(out: W) -> Self {
        Self {
            out: Some(out),
            closed: false,
        }
    }

    /// Appends one output word as an uppercase 16-hex-digit line.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Io`] on a write failure or when the stream
    /// has already been closed.
    pub fn emit(&mut self, word: u64) -> Result<(), HarnessError> {
        let out = self.open_sink()?;
        writeln!(out, "{word:016X}")?;
        Ok(())
    }

    /// Appends the per-test terminator line.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Io`] on a write failure or when the stream
    /// has already been closed.
    pub fn emit_terminator(&mut self) -> Result<(), HarnessError> {
        let out = self.open_sink()?;
        writeln!(out, "{RECORD_TERMINATOR}")?;
        Ok(())
    }

    /// Flushes and closes the stream. Safe to call any number of times.
    ///
    /// The sink is retained for [`into_inner`](Self::into_inner); only
    /// further writes are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Io`] if the final flush fails; the stream is
    /// considered closed regardless.
    pub fn close(&mut self) -> Result<(), HarnessError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        if let Some(out) = self.out.as_mut() {
            out.flush()?;
        }
        Ok(())
    }

    /// Reports whether the stream has been closed.
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Closes the stream and returns the underlying sink.
    ///
    /// Used by tests to inspect what was written; the sink is flushed first
    /// and is present whether or not [`close`](Self::close) was called.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Io`] if the final flush fails.
    pub fn into_inner(mut self) -> Result<Option<W>, HarnessError> {
        self.closed = true;
        let out = self.out.take();
        match out {
            Some(mut w) => {
                w.flush()?;
                Ok(Some(w))
            }
            None => Ok(None),
        }
    }

    fn open_sink(&mut self) -> Result<&mut W, HarnessError> {
        let closed = self.closed;
        match self.out.as_mut() {
            Some(out) if !closed => Ok(out),
            _ => Err(HarnessError::Io(io::Error::new(
                io::ErrorKind::NotConnected,
                "record stream is closed",
            ))),
        }
    }
}

impl<W: Write> Drop for RecordWriter<W> {
    /// Backstop close: flushes on drop if `close` was never called.
    fn drop(&mut self) {
        if !self.closed
            && let Some(out) = self.out.as_mut()
        {
            let _ = out.flush();
        }
    }
}
