//! # Token Classification Tests
//!
//! Case-by-case classification via `rstest` and a property check over
//! arbitrary 64-bit words.

use std::io::Cursor;

use proptest::prelude::*;
use rstest::rstest;
use tbsim_core::common::HarnessError;
use tbsim_core::vector::{Token, VectorReader};

fn first_token(body: &str) -> Result<Token, HarnessError> {
    let text = format!("1\n{body}\n.\n");
    let mut reader = VectorReader::new(Cursor::new(text.into_bytes()))?;
    reader.next_token()
}

#[rstest]
#[case::lowercase("00000000deadbeef", Token::Word(0xDEAD_BEEF))]
#[case::uppercase("00000000DEADBEEF", Token::Word(0xDEAD_BEEF))]
#[case::zero("0000000000000000", Token::Word(0))]
#[case::all_ones("ffffffffffffffff", Token::Word(u64::MAX))]
#[case::dash("-", Token::EndOfVector)]
#[case::period(".", Token::EndOfStream)]
fn classifies(#[case] body: &str, #[case] expected: Token) {
    match first_token(body) {
        Ok(token) => assert_eq!(token, expected),
        Err(e) => panic!("unexpected error for {body:?}: {e}"),
    }
}

#[rstest]
#[case::too_short("123")]
#[case::too_long("00000000000000001")]
#[case::non_hex("000000000000000g")]
fn rejects_malformed(#[case] body: &str) {
    assert!(matches!(
        first_token(body),
        Err(HarnessError::MalformedWord { .. })
    ));
}

// Classification is by leading character, so a sentinel with trailing noise
// still counts as that sentinel.
#[rstest]
#[case::dash_with_suffix("-end", Token::EndOfVector)]
#[case::period_with_suffix(".done", Token::EndOfStream)]
fn leading_character_wins(#[case] body: &str, #[case] expected: Token) {
    match first_token(body) {
        Ok(token) => assert_eq!(token, expected),
        Err(e) => panic!("unexpected error for {body:?}: {e}"),
    }
}

proptest! {
    /// Every 64-bit value formatted the way the record writer formats words
    /// reads back as that word, never as a sentinel.
    #[test]
    fn any_word_reads_back(word: u64) {
        let token = first_token(&format!("{word:016X}"));
        prop_assert_eq!(token.ok(), Some(Token::Word(word)));
    }
}
