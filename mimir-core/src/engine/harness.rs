//! Deterministic-replay harness.
//!
//! Runs the engine three times under simulated time with identical
//! arguments, each into its own report subdirectory, and compares FNV-1a
//! checksums of the rendered `metrics.json` bodies. Any divergence is a
//! nondeterminism bug somewhere in the pipeline.

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use crate::config::RunConfig;
use crate::engine::Engine;
use crate::errors::SetupError;
use crate::report;
use crate::utils::hash::fnv1a64;

/// Number of replay runs compared.
pub const RUNS: usize = 3;

/// Harness verdict, serialized to `determinism_result.json`.
#[derive(Debug, Serialize)]
pub struct DeterminismResult {
    pub pass: bool,
    /// Per-run checksum of the `metrics.json` body.
    pub runs: Vec<u64>,
}

/// Execute the three-run check. The per-run artifacts land in
/// `<report>/run{0,1,2}/`; the verdict lands next to them.
pub fn determinism_check(cfg: &RunConfig) -> Result<DeterminismResult> {
    report::create_report_dir(&cfg.report_dir)?;

    let mut runs = Vec::with_capacity(RUNS);
    for i in 0..RUNS {
        let mut run_cfg = cfg.clone();
        run_cfg.report_dir = cfg.report_dir.join(format!("run{}", i));
        let result = Engine::new(run_cfg).run_simulated()?;
        runs.push(fnv1a64(result.json.as_bytes()));
    }
    let pass = runs.windows(2).all(|pair| pair[0] == pair[1]);

    let verdict = DeterminismResult { pass, runs };
    let path = cfg.report_dir.join("determinism_result.json");
    let body = serde_json::to_string(&verdict)?;
    std::fs::write(&path, format!("{}\n", body))
        .map_err(|source| SetupError::Artifact { path, source })?;

    info!(pass = verdict.pass, "determinism check complete");
    Ok(verdict)
}
