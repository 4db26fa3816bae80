//! # Bridge Adapter Tests
//!
//! Drives the externally-invoked operation set the way a foreign engine
//! would: advance/query per feed phase, push/terminate per collect phase,
//! close at the end.

use std::io::Cursor;

use pretty_assertions::assert_eq;
use tbsim_core::bridge::BridgeAdapter;
use tbsim_core::common::HarnessError;

fn bridge(input: &str) -> BridgeAdapter<Cursor<Vec<u8>>, Vec<u8>> {
    match BridgeAdapter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new()) {
        Ok(b) => b,
        Err(e) => panic!("bridge construction failed: {e}"),
    }
}

fn advance(b: &mut BridgeAdapter<Cursor<Vec<u8>>, Vec<u8>>) {
    if let Err(e) = b.advance() {
        panic!("advance failed: {e}");
    }
}

#[test]
fn reports_declared_count_before_any_advance() {
    let b = bridge("5\n.\n");
    assert_eq!(b.num_tests(), 5);
    assert_eq!(b.current_word(), None);
    assert!(!b.end_of_vector());
    assert!(!b.end_of_stream());
}

#[test]
fn malformed_count_fails_construction() {
    let err = BridgeAdapter::new(Cursor::new(b"five\n.\n".to_vec()), Vec::<u8>::new());
    assert!(matches!(err, Err(HarnessError::BadTestCount { .. })));
}

#[test]
fn token_queries_track_the_last_advance() {
    let mut b = bridge("1\n00000000000000AB\n-\n.\n");

    advance(&mut b);
    assert_eq!(b.current_word(), Some(0xAB));
    assert!(!b.end_of_vector());

    advance(&mut b);
    assert_eq!(b.current_word(), None);
    assert!(b.end_of_vector());
    assert!(!b.end_of_stream());

    advance(&mut b);
    assert!(b.end_of_stream());
    assert!(!b.end_of_vector());
}

#[test]
fn end_of_stream_is_sticky_across_advances() {
    let mut b = bridge("0\n.\n");
    advance(&mut b);
    advance(&mut b);
    assert!(b.end_of_stream());
}

#[test]
fn full_engine_sequence_produces_a_well_formed_record() {
    let mut b = bridge("1\n0000000000000011\n0000000000000022\n-\n.\n");

    // Feed phase: pull words until the vector ends.
    let mut fed = Vec::new();
    loop {
        advance(&mut b);
        match b.current_word() {
            Some(word) => fed.push(word),
            None => break,
        }
    }
    assert!(b.end_of_vector());
    assert_eq!(fed, vec![0x11, 0x22]);

    // Collect phase: the engine hands back what the device produced.
    for word in &fed {
        if let Err(e) = b.push_word(*word) {
            panic!("push failed: {e}");
        }
    }
    if let Err(e) = b.finish_vector() {
        panic!("terminator failed: {e}");
    }

    advance(&mut b);
    assert!(b.end_of_stream());
    if let Err(e) = b.finish_run() {
        panic!("close failed: {e}");
    }

    let sink = match b.into_record_sink() {
        Ok(Some(sink)) => sink,
        Ok(None) => panic!("record sink lost"),
        Err(e) => panic!("sink: {e}"),
    };
    assert_eq!(
        String::from_utf8_lossy(&sink),
        "0000000000000011\n0000000000000022\n-\n"
    );
}

#[test]
fn finish_run_is_idempotent_and_seals_the_record() {
    let mut b = bridge("0\n.\n");
    assert!(b.finish_run().is_ok());
    assert!(b.finish_run().is_ok());
    assert!(matches!(b.push_word(1), Err(HarnessError::Io(_))));
    assert!(matches!(b.finish_vector(), Err(HarnessError::Io(_))));
}
