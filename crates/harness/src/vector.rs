//! Test-vector stream reader.
//!
//! Parses the line-oriented test-suite input format: a decimal test count on
//! the first line, then data-word lines of exactly 16 hexadecimal digits,
//! with a per-vector sentinel line (`-`) after each vector and a suite
//! sentinel line (`.`) at the end. The reader is strictly streaming and
//! consumed monotonically; nothing is re-read.

use std::io::BufRead;

use crate::common::{END_OF_STREAM, END_OF_VECTOR, HarnessError, WORD_HEX_DIGITS};

/// One classified input token.
///
/// Classification is by the token's leading character: a reserved sentinel
/// character marks a structural boundary, anything else must be a data word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// A 64-bit data word to feed to the DUT.
    Word(u64),
    /// End of the current test vector.
    EndOfVector,
    /// End of the whole test suite; no further tokens follow.
    EndOfStream,
}

/// Streaming reader over the test-suite input format.
///
/// The declared test count is parsed eagerly in [`VectorReader::new`], so a
/// malformed count fails the run before a single clock cycle is driven.
/// Tokens are then pulled one at a time with [`next_token`](Self::next_token).
#[derive(Debug)]
pub struct VectorReader<R> {
    input: R,
    declared_count: u32,
    exhausted: bool,
}

impl<R: BufRead> VectorReader<R> {
    /// Opens the stream and parses the declared test count from line one.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::BadTestCount`] when the first token is not a
    /// decimal integer, [`HarnessError::UnexpectedEof`] on an empty stream,
    /// or [`HarnessError::Io`] on a read failure.
    pub fn new(mut input: R) -> Result<Self, HarnessError> {
        let line = read_token_line(&mut input)?.ok_or(HarnessError::UnexpectedEof)?;
        let declared_count = line
            .parse::<u32>()
            .map_err(|_| HarnessError::BadTestCount { line })?;
        Ok(Self {
            input,
            declared_count,
            exhausted: false,
        })
    }

    /// Returns the test count declared on the first input line.
    ///
    /// The declared count and the number of vectors actually present may
    /// diverge; callers must count consumed vectors rather than trust this.
    pub const fn declared_count(&self) -> u32 {
        self.declared_count
    }

    /// Reads and classifies the next token.
    ///
    /// After [`Token::EndOfStream`] has been returned once, every further
    /// call returns it again without touching the underlying stream.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::UnexpectedEof`] when the stream ends before
    /// the end-of-stream sentinel, [`HarnessError::MalformedWord`] for a
    /// non-sentinel line that is not exactly 16 hexadecimal digits, or
    /// [`HarnessError::Io`] on a read failure.
    pub fn next_token(&mut self) -> Result<Token, HarnessError> {
        if self.exhausted {
            return Ok(Token::EndOfStream);
        }
        let token = read_token_line(&mut self.input)?.ok_or(HarnessError::UnexpectedEof)?;
        match token.chars().next() {
            Some(c) if c == END_OF_VECTOR => Ok(Token::EndOfVector),
            Some(c) if c == END_OF_STREAM => {
                self.exhausted = true;
                Ok(Token::EndOfStream)
            }
            _ => parse_word(&token).map(Token::Word),
        }
    }
}

/// Reads the next non-blank line and returns its first whitespace-delimited
/// token, or `None` at end of input.
fn read_token_line<R: BufRead>(input: &mut R) -> Result<Option<String>, HarnessError> {
    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if let Some(token) = line.split_whitespace().next() {
            return Ok(Some(token.to_string()));
        }
        // Blank line: keep scanning, matching whitespace-skipping stream reads.
    }
}

/// Parses a data-word token: exactly 16 hexadecimal digits, any case.
fn parse_word(token: &str) -> Result<u64, HarnessError> {
    if token.len() != WORD_HEX_DIGITS || !token.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(HarnessError::MalformedWord {
            token: token.to_string(),
        });
    }
    u64::from_str_radix(token, 16).map_err(|_| HarnessError::MalformedWord {
        token: token.to_string(),
    })
}
