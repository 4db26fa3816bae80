//! Bridge front-end for a foreign simulation engine.
//!
//! Some engines own their clock loop and call out to the testbench once per
//! relevant clock phase instead of being clocked by it. [`BridgeAdapter`]
//! re-exposes the driver's feed/drain/finalize/collect logic as discrete
//! operations over the same vector-stream and record-stream components the
//! owning loop uses, with the shared mutable context (current token,
//! sentinel flags, streams) held in one place.
//!
//! The external caller is responsible for invocation ordering per clock
//! phase: [`advance`](BridgeAdapter::advance) before sampling the token
//! queries, [`finish_vector`](BridgeAdapter::finish_vector) once per test
//! after its last [`push_word`](BridgeAdapter::push_word), and
//! [`finish_run`](BridgeAdapter::finish_run) exactly once at the end. The
//! adapter keeps every data-model invariant (append-only records, one
//! terminator per test, close-exactly-once) but cannot substitute for a
//! caller that skips a phase.

use std::io::{BufRead, Write};

use tracing::debug;

use crate::common::HarnessError;
use crate::record::RecordWriter;
use crate::vector::{Token, VectorReader};

/// Externally-driven adapter over the vector and record streams.
#[derive(Debug)]
pub struct BridgeAdapter<R, W: Write> {
    reader: VectorReader<R>,
    writer: RecordWriter<W>,
    current: Option<Token>,
}

impl<R: BufRead, W: Write> BridgeAdapter<R, W> {
    /// Opens the bridge over an input stream and an output sink.
    ///
    /// The declared test count is parsed eagerly, exactly as in the owning
    /// loop, so a malformed count fails before the engine clocks anything.
    ///
    /// # Errors
    ///
    /// Returns a parse error for a malformed or missing test count, or an
    /// I/O error from the input stream.
    pub fn new(input: R, output: W) -> Result<Self, HarnessError> {
        let reader = VectorReader::new(input)?;
        Ok(Self {
            reader,
            writer: RecordWriter::new(output),
            current: None,
        })
    }

    /// Returns the test count declared on the first input line.
    pub const fn num_tests(&self) -> u32 {
        self.reader.declared_count()
    }

    /// Reads and classifies the next input token.
    ///
    /// Called by the engine once per feed cycle, on cycles where it is not
    /// holding the testbench under backpressure. The result is observed
    /// through [`current_word`](Self::current_word),
    /// [`end_of_vector`](Self::end_of_vector), and
    /// [`end_of_stream`](Self::end_of_stream).
    ///
    /// # Errors
    ///
    /// Propagates parse and I/O errors from the vector stream.
    pub fn advance(&mut self) -> Result<(), HarnessError> {
        let token = self.reader.next_token()?;
        debug!(?token, "bridge token");
        self.current = Some(token);
        Ok(())
    }

    /// Returns the data word from the most recent [`advance`](Self::advance),
    /// or `None` when the token was a sentinel or nothing has been read yet.
    pub const fn current_word(&self) -> Option<u64> {
        match self.current {
            Some(Token::Word(word)) => Some(word),
            _ => None,
        }
    }

    /// Reports whether the most recent token ended the current vector.
    pub const fn end_of_vector(&self) -> bool {
        matches!(self.current, Some(Token::EndOfVector))
    }

    /// Reports whether the most recent token ended the whole suite.
    pub const fn end_of_stream(&self) -> bool {
        matches!(self.current, Some(Token::EndOfStream))
    }

    /// Appends one collected output word to the record stream.
    ///
    /// Called by the engine on cycles where the device presents valid
    /// output; records are append-only and nothing is rewritten.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Io`] on a write failure or after
    /// [`finish_run`](Self::finish_run).
    pub fn push_word(&mut self, word: u64) -> Result<(), HarnessError> {
        self.writer.emit(word)
    }

    /// Appends the per-test terminator; one call per completed test.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Io`] on a write failure or after
    /// [`finish_run`](Self::finish_run).
    pub fn finish_vector(&mut self) -> Result<(), HarnessError> {
        self.writer.emit_terminator()
    }

    /// Flushes and closes the record stream; safe to call more than once.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Io`] if the final flush fails; the stream is
    /// closed regardless.
    pub fn finish_run(&mut self) -> Result<(), HarnessError> {
        self.writer.close()
    }

    /// Consumes the bridge, closing and returning the record sink.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Io`] if the final flush fails.
    pub fn into_record_sink(self) -> Result<Option<W>, HarnessError> {
        self.writer.into_inner()
    }
}
