//! Mimir pipeline binary.
//!
//! Runs the engine once in real time, or with `--determinism-check` three
//! times under simulated time, exiting nonzero when the replay checksums
//! diverge.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use mimir_bins::common::{init_logging, print_summary};
use mimir_core::config::{Burst, Mode, RunConfig};
use mimir_core::engine::{harness, Engine};

#[derive(Parser, Debug)]
#[command(version, about = "Didactic low-latency trading pipeline")]
struct Args {
    /// Run length in seconds
    #[arg(long = "duration-s", default_value_t = 20)]
    duration_s: u64,

    /// Base event rate in events/s
    #[arg(long, default_value_t = 100_000)]
    rate: u32,

    /// Number of synthetic symbols
    #[arg(long, default_value_t = 4)]
    symbols: u32,

    /// Burst window t=<s>,dur=<s>,x=<mult>; repeatable
    #[arg(long = "burst")]
    bursts: Vec<Burst>,

    /// Pipeline flavor: naive | optimized
    #[arg(long, default_value = "optimized")]
    mode: Mode,

    /// Feed PRNG seed
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// CPU core to pin to (best effort)
    #[arg(long)]
    affinity: Option<usize>,

    /// Report directory
    #[arg(long, default_value = "./out/run")]
    report: PathBuf,

    /// Run the simulated-time determinism harness instead of a single run
    #[arg(long = "determinism-check")]
    determinism_check: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(err) = init_logging(&args.log_level) {
        eprintln!("failed to initialize logging: {:#}", err);
        return ExitCode::FAILURE;
    }

    match run(args) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let determinism_check = args.determinism_check;
    let cfg = RunConfig {
        duration_s: args.duration_s,
        rate: args.rate,
        symbols: args.symbols,
        bursts: args.bursts,
        mode: args.mode,
        seed: args.seed,
        affinity: args.affinity,
        report_dir: args.report,
    };

    if determinism_check {
        let verdict = harness::determinism_check(&cfg)?;
        return Ok(if verdict.pass {
            ExitCode::SUCCESS
        } else {
            tracing::error!("determinism check failed: {:?}", verdict.runs);
            ExitCode::from(1)
        });
    }

    let result = Engine::new(cfg).run()?;
    print_summary(&result);
    Ok(ExitCode::SUCCESS)
}
