//! Testbench driver CLI.
//!
//! This binary provides a single entry point for driving a test suite
//! against the built-in loopback model. It performs:
//! 1. **Setup:** Creates the log directory and initialises tracing.
//! 2. **Run:** Clocks the suite through the harness and writes the record file.
//! 3. **Reporting:** Prints run statistics and maps the outcome to an exit code.
//!
//! Exit codes: `0` on completion or device-requested finish, `1` on a fatal
//! parse or I/O error, `2` when the watchdog expired and the output is
//! partial.

use clap::{Parser, Subcommand};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::process;

use tbsim_core::Config;
use tbsim_core::driver::{Harness, RunOutcome};
use tbsim_core::dut::LoopbackDut;

/// Exit code for a run the watchdog had to cut short.
const EXIT_WATCHDOG: i32 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "tbsim",
    author,
    version,
    about = "Cycle-accurate handshake testbench driver",
    long_about = "Drive a test-vector suite through the clocked handshake protocol and collect \
the device's output records.\n\nExamples:\n  tbsim run -i test_vectors/suite_in.txt\n  tbsim run -i suite.txt -o out/records.txt --watchdog 500000"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a test-vector suite against the built-in loopback model.
    Run {
        /// Test-vector input file.
        #[arg(short, long)]
        input: String,

        /// Output record file (defaults to the configured logs/output.txt).
        #[arg(short, long)]
        output: Option<String>,

        /// JSON configuration file; defaults apply when omitted.
        #[arg(short, long)]
        config: Option<String>,

        /// Watchdog bound in half-cycles.
        #[arg(long)]
        watchdog: Option<u64>,

        /// Reset hold length in clock cycles.
        #[arg(long)]
        reset_cycles: Option<u32>,

        /// Consecutive output-absent cycles tolerated per record.
        #[arg(long)]
        gap_threshold: Option<u32>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            input,
            output,
            config,
            watchdog,
            reset_cycles,
            gap_threshold,
        } => cmd_run(
            &input,
            output,
            config.as_deref(),
            watchdog,
            reset_cycles,
            gap_threshold,
        ),
    }
}

/// Loads the configuration, applies flag overrides, runs the harness, and
/// exits with the mapped code.
fn cmd_run(
    input: &str,
    output: Option<String>,
    config_path: Option<&str>,
    watchdog: Option<u64>,
    reset_cycles: Option<u32>,
    gap_threshold: Option<u32>,
) {
    let mut config = load_config(config_path);
    if let Some(bound) = watchdog {
        config.protocol.watchdog_half_cycles = bound;
    }
    if let Some(cycles) = reset_cycles {
        config.protocol.reset_cycles = cycles;
    }
    if let Some(gap) = gap_threshold {
        config.protocol.output_gap_threshold = gap;
    }
    let output = output.unwrap_or_else(|| config.run.output.clone());

    // The log directory is created before the run, traces or not.
    if let Err(e) = fs::create_dir_all(&config.run.log_dir) {
        eprintln!(
            "[!] FATAL: could not create log directory '{}': {}",
            config.run.log_dir, e
        );
        process::exit(1);
    }

    println!("[*] Suite: {input}");
    println!(
        "    Records: {}  Reset: {} cycles  Watchdog: {} half-cycles  Gap: {}",
        output,
        config.protocol.reset_cycles,
        config.protocol.watchdog_half_cycles,
        config.protocol.output_gap_threshold
    );

    let in_file = File::open(input).unwrap_or_else(|e| {
        eprintln!("[!] FATAL: could not open input '{input}': {e}");
        process::exit(1);
    });
    let out_file = File::create(&output).unwrap_or_else(|e| {
        eprintln!("[!] FATAL: could not create output '{output}': {e}");
        process::exit(1);
    });

    let dut = LoopbackDut::new(&config.loopback);
    let mut harness = Harness::new(
        &config,
        dut,
        BufReader::new(in_file),
        BufWriter::new(out_file),
    )
    .unwrap_or_else(|e| {
        eprintln!("[!] FATAL: {e}");
        process::exit(1);
    });

    match harness.run() {
        Ok(outcome) => {
            harness.stats().print();
            match outcome {
                RunOutcome::Completed => println!("[*] Suite complete"),
                RunOutcome::DeviceFinish => println!("[*] Device requested finish"),
                RunOutcome::WatchdogExpired => {
                    eprintln!("[!] Watchdog expired; records are partial");
                    process::exit(EXIT_WATCHDOG);
                }
            }
        }
        Err(e) => {
            eprintln!("[!] FATAL: {e}");
            process::exit(1);
        }
    }
}

/// Reads a JSON config file, or returns the defaults when no path is given.
fn load_config(path: Option<&str>) -> Config {
    path.map_or_else(Config::default, |p| {
        let text = fs::read_to_string(p).unwrap_or_else(|e| {
            eprintln!("[!] FATAL: could not read config '{p}': {e}");
            process::exit(1);
        });
        Config::from_json(&text).unwrap_or_else(|e| {
            eprintln!("[!] FATAL: bad config '{p}': {e}");
            process::exit(1);
        })
    })
}
