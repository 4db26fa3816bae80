//! # Protocol Driver Tests
//!
//! End-to-end properties of the state machine and owning loop, run over
//! in-memory streams against the loopback model and scripted mocks:
//! backpressure discipline, finalize-pulse width, record/vector accounting,
//! watchdog liveness, and exit-path cleanup.

use std::io::Cursor;

use pretty_assertions::assert_eq;
use tbsim_core::Config;
use tbsim_core::common::HarnessError;
use tbsim_core::config::LoopbackConfig;
use tbsim_core::driver::{Harness, RunOutcome};
use tbsim_core::dut::LoopbackDut;

use crate::common::harness::{run_suite, suite, try_run_suite};
use crate::common::mocks::dut::{FinishDut, GappyEchoDut, ProbeDut, StallingDut};

/// Short reset and watchdog keep in-memory runs quick without changing any
/// protocol behaviour.
fn fast_config() -> Config {
    let mut config = Config::default();
    config.protocol.reset_cycles = 4;
    config.protocol.watchdog_half_cycles = 20_000;
    config
}

fn loopback(config: &Config) -> LoopbackDut {
    LoopbackDut::new(&config.loopback)
}

#[test]
fn two_single_word_vectors_yield_two_records_in_order() {
    let config = fast_config();
    let input = "2\n0000000000000001\n-\n0000000000000002\n-\n.\n";
    let result = run_suite(&config, loopback(&config), input);

    assert_eq!(result.outcome, RunOutcome::Completed);
    assert_eq!(result.output, "0000000000000001\n-\n0000000000000002\n-\n");
    assert_eq!(result.stats.tests_completed, 2);
    assert_eq!(result.stats.words_fed, 2);
    assert_eq!(result.stats.words_collected, 2);
    assert!(result.stats.half_cycles > 0);
}

#[test]
fn long_vector_survives_backpressure_and_keeps_order() {
    let mut config = fast_config();
    config.loopback = LoopbackConfig {
        capacity: 2,
        drain_interval: 3,
    };
    let words: Vec<u64> = (1..=8).map(|i| i * 0x1111).collect();
    let input = suite(1, &[&words]);
    let result = run_suite(&config, loopback(&config), &input);

    assert_eq!(result.outcome, RunOutcome::Completed);
    let mut expected = String::new();
    for word in &words {
        expected.push_str(&format!("{word:016X}\n"));
    }
    expected.push_str("-\n");
    assert_eq!(result.output, expected);
    assert!(
        result.stats.backpressure_holds > 0,
        "a 2-word buffer must push back against an 8-word vector"
    );
}

#[test]
fn valid_is_never_asserted_under_backpressure() {
    let mut config = fast_config();
    config.loopback = LoopbackConfig {
        capacity: 2,
        drain_interval: 4,
    };
    let words: Vec<u64> = (1..=10).collect();
    let input = suite(1, &[&words]);
    let mut harness = match Harness::new(
        &config,
        ProbeDut::new(loopback(&config)),
        Cursor::new(input.into_bytes()),
        Vec::new(),
    ) {
        Ok(h) => h,
        Err(e) => panic!("harness: {e}"),
    };
    match harness.run() {
        Ok(outcome) => assert_eq!(outcome, RunOutcome::Completed),
        Err(e) => panic!("run: {e}"),
    }
    assert_eq!(harness.dut().valid_under_backpressure, 0);
}

#[test]
fn last_block_is_high_exactly_one_cycle_per_test() {
    let config = fast_config();
    let input = suite(3, &[&[1, 2], &[3], &[4, 5, 6]]);
    let mut harness = match Harness::new(
        &config,
        ProbeDut::new(loopback(&config)),
        Cursor::new(input.into_bytes()),
        Vec::new(),
    ) {
        Ok(h) => h,
        Err(e) => panic!("harness: {e}"),
    };
    match harness.run() {
        Ok(outcome) => assert_eq!(outcome, RunOutcome::Completed),
        Err(e) => panic!("run: {e}"),
    }
    let pulses = &harness.dut().pulse_counts;
    // One start bucket per test plus the re-arm that found end-of-stream.
    assert_eq!(pulses.len(), 4);
    assert_eq!(&pulses[..3], &[1, 1, 1]);
    assert_eq!(pulses[3], 0);
}

#[test]
fn terminators_follow_vectors_consumed_not_declared_count() {
    let config = fast_config();
    // Declares three tests but carries only two vectors.
    let input = suite(3, &[&[0xA], &[0xB]]);
    let result = run_suite(&config, loopback(&config), &input);

    assert_eq!(result.outcome, RunOutcome::Completed);
    assert_eq!(result.stats.tests_declared, 3);
    assert_eq!(result.stats.tests_completed, 2);
    assert_eq!(result.output.matches('-').count(), 2);
}

#[test]
fn non_integer_count_fails_before_any_cycle() {
    let config = fast_config();
    let err = try_run_suite(&config, loopback(&config), "twelve\n.\n");
    assert!(matches!(err, Err(HarnessError::BadTestCount { .. })));
}

#[test]
fn replaying_a_suite_is_byte_identical() {
    let config = fast_config();
    let input = suite(2, &[&[0x1234_5678_9ABC_DEF0, 0xFFFF], &[0]]);
    let first = run_suite(&config, loopback(&config), &input);
    let second = run_suite(&config, loopback(&config), &input);
    assert_eq!(first.output, second.output);
    assert_eq!(first.stats.half_cycles, second.stats.half_cycles);
}

#[test]
fn watchdog_bounds_a_dut_that_never_readies() {
    let mut config = fast_config();
    config.protocol.watchdog_half_cycles = 2_000;
    let input = suite(1, &[&[1, 2, 3]]);
    let result = run_suite(&config, StallingDut::default(), &input);

    assert_eq!(result.outcome, RunOutcome::WatchdogExpired);
    assert!(result.stats.watchdog_expired);
    assert!(result.stats.half_cycles <= 2_002);
    // The stalled test never completed, so no terminator was written.
    assert_eq!(result.output, "");
}

#[test]
fn single_cycle_output_gaps_do_not_split_a_record() {
    let config = fast_config();
    let words = [0xAAAA_u64, 0xBBBB, 0xCCCC];
    let input = suite(1, &[&words]);
    let result = run_suite(&config, GappyEchoDut::default(), &input);

    assert_eq!(result.outcome, RunOutcome::Completed);
    assert_eq!(
        result.output,
        "000000000000AAAA\n000000000000BBBB\n000000000000CCCC\n-\n"
    );
    assert_eq!(result.stats.tests_completed, 1);
}

#[test]
fn eof_before_suite_sentinel_is_fatal() {
    let config = fast_config();
    let err = try_run_suite(&config, loopback(&config), "1\n0000000000000001\n");
    assert!(matches!(err, Err(HarnessError::UnexpectedEof)));
}

#[test]
fn device_requested_finish_cleans_up_once() {
    let mut config = fast_config();
    config.protocol.watchdog_half_cycles = 1_000_000;
    let input = suite(1, &[&[7]]);
    let mut harness = match Harness::new(
        &config,
        FinishDut::new(200),
        Cursor::new(input.into_bytes()),
        Vec::new(),
    ) {
        Ok(h) => h,
        Err(e) => panic!("harness: {e}"),
    };
    match harness.run() {
        Ok(outcome) => assert_eq!(outcome, RunOutcome::DeviceFinish),
        Err(e) => panic!("run: {e}"),
    }
    assert_eq!(harness.dut().finalize_calls(), 1);
    // The forced exit must close the record without losing the sink.
    match harness.into_record_sink() {
        Ok(Some(_)) => {}
        _ => panic!("record sink lost after forced finish"),
    }
}

#[test]
fn empty_vector_still_gets_a_terminator() {
    let config = fast_config();
    let result = run_suite(&config, loopback(&config), "1\n-\n.\n");
    assert_eq!(result.outcome, RunOutcome::Completed);
    assert_eq!(result.output, "-\n");
    assert_eq!(result.stats.tests_completed, 1);
    assert_eq!(result.stats.words_fed, 0);
}

#[test]
fn file_backed_run_writes_the_record_to_disk() {
    let config = fast_config();
    let dir = match tempfile::tempdir() {
        Ok(dir) => dir,
        Err(e) => panic!("tempdir: {e}"),
    };
    let in_path = dir.path().join("suite_in.txt");
    let out_path = dir.path().join("output.txt");
    if let Err(e) = std::fs::write(&in_path, suite(1, &[&[0xF00D]])) {
        panic!("write input: {e}");
    }

    let in_file = match std::fs::File::open(&in_path) {
        Ok(f) => f,
        Err(e) => panic!("open input: {e}"),
    };
    let out_file = match std::fs::File::create(&out_path) {
        Ok(f) => f,
        Err(e) => panic!("create output: {e}"),
    };
    let mut harness = match Harness::new(
        &config,
        loopback(&config),
        std::io::BufReader::new(in_file),
        std::io::BufWriter::new(out_file),
    ) {
        Ok(h) => h,
        Err(e) => panic!("harness: {e}"),
    };
    match harness.run() {
        Ok(outcome) => assert_eq!(outcome, RunOutcome::Completed),
        Err(e) => panic!("run: {e}"),
    }
    drop(harness);

    let written = match std::fs::read_to_string(&out_path) {
        Ok(text) => text,
        Err(e) => panic!("read output: {e}"),
    };
    assert_eq!(written, "000000000000F00D\n-\n");
}

#[test]
fn empty_suite_completes_with_no_records() {
    let config = fast_config();
    let result = run_suite(&config, loopback(&config), "0\n.\n");
    assert_eq!(result.outcome, RunOutcome::Completed);
    assert_eq!(result.output, "");
    assert_eq!(result.stats.tests_completed, 0);
}
