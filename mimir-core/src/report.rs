//! Report directory artifacts.
//!
//! Layout is fixed: `metrics.json`, `latency.csv`, `trades.csv`,
//! `run_fingerprint.txt` and `report.md` under one directory per run.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::errors::SetupError;
use crate::metrics::MetricsReport;
use crate::router::Router;

pub const LATENCY_CSV_HEADER: &str = "latency_ms";

pub fn create_report_dir(dir: &Path) -> Result<(), SetupError> {
    fs::create_dir_all(dir).map_err(|source| SetupError::ReportDir {
        dir: dir.to_path_buf(),
        source,
    })
}

/// Open `trades.csv` under the report directory and wrap it in a router.
/// Failing here is fatal; everything downstream only counts errors.
pub fn open_trade_router(dir: &Path) -> Result<Router<BufWriter<File>>, SetupError> {
    let path = dir.join("trades.csv");
    let file = File::create(&path).map_err(|source| SetupError::TradeSink {
        path: path.clone(),
        source,
    })?;
    Router::new(BufWriter::new(file)).map_err(|source| SetupError::TradeSink { path, source })
}

/// Write every artifact except `trades.csv`, which the router streams
/// during the run.
pub fn write_artifacts(dir: &Path, report: &MetricsReport, json: &str) -> Result<(), SetupError> {
    write_file(dir.join("metrics.json"), format!("{}\n", json))?;

    let samples = report.latency.samples();
    let mut latency_csv = String::with_capacity(LATENCY_CSV_HEADER.len() + samples.len() * 10);
    latency_csv.push_str(LATENCY_CSV_HEADER);
    latency_csv.push('\n');
    for sample in samples {
        latency_csv.push_str(&format!("{:.6}\n", sample));
    }
    write_file(dir.join("latency.csv"), latency_csv)?;

    let fp = &report.fingerprint;
    write_file(
        dir.join("run_fingerprint.txt"),
        format!(
            "seed={}\ncode_hash={}\nsymbols={}\nrate={}\nmode={}\n",
            fp.seed, fp.code_hash, fp.symbols, fp.rate, fp.mode
        ),
    )?;

    write_file(dir.join("report.md"), format!("Run report\n\n{}\n", json))?;
    Ok(())
}

fn write_file(path: PathBuf, contents: String) -> Result<(), SetupError> {
    fs::write(&path, contents).map_err(|source| SetupError::Artifact { path, source })
}
