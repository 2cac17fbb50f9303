//! Run metrics and the report JSON.
//!
//! `metrics.json` is a byte contract: the determinism harness checksums the
//! rendered line, so key order and the fixed-point formatting of every real
//! (three fractional digits) are frozen. The line is assembled by hand
//! because serde_json renders floats in shortest form, not fixed-point.

use std::fmt::Write as _;

use crate::config::Mode;
use crate::latency::LatencyRecorder;

/// Build-embedded short git SHA, or "unknown".
pub fn code_hash() -> &'static str {
    env!("MIMIR_CODE_HASH")
}

/// The tuple identifying a run configuration.
#[derive(Debug, Clone)]
pub struct Fingerprint {
    pub seed: u64,
    pub code_hash: String,
    pub symbols: u32,
    pub rate: u32,
    pub mode: Mode,
}

/// Counted, non-fatal pipeline errors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReliabilityCounters {
    pub drops: u64,
    pub queue_depth_max: u64,
    pub idempotency_violations: u64,
    pub exposure_blocks: u64,
}

/// Everything a run reports.
pub struct MetricsReport {
    pub fingerprint: Fingerprint,
    pub latency: LatencyRecorder,
    /// Events per second, reported against the configured duration.
    pub eps: f64,
    pub reliability: ReliabilityCounters,
    pub rss_mb: f64,
}

impl MetricsReport {
    /// Render the single-line report JSON.
    pub fn to_json(&self) -> String {
        let p = self.latency.percentiles();
        let mut out = String::with_capacity(512);
        let _ = write!(
            out,
            "{{ \"version\": \"1\", \"fingerprint\": {{ \"seed\": {}, \"code_hash\": \"{}\", \"symbols\": {}, \"rate\": {}, \"mode\": \"{}\" }}, ",
            self.fingerprint.seed,
            self.fingerprint.code_hash,
            self.fingerprint.symbols,
            self.fingerprint.rate,
            self.fingerprint.mode
        );
        let _ = write!(
            out,
            "\"latency_ms\": {{ \"p50\": {:.3}, \"p95\": {:.3}, \"p99\": {:.3}, \"max\": {:.3}, \"jitter_ratio\": {:.3} }}, ",
            p.p50, p.p95, p.p99, p.max, p.jitter_ratio
        );
        let _ = write!(out, "\"throughput\": {{ \"eps\": {:.3} }}, ", self.eps);
        let _ = write!(
            out,
            "\"reliability\": {{ \"drops\": {}, \"queue_depth_max\": {}, \"idempotency_violations\": {}, \"exposure_blocks\": {} }}, ",
            self.reliability.drops,
            self.reliability.queue_depth_max,
            self.reliability.idempotency_violations,
            self.reliability.exposure_blocks
        );
        let _ = write!(out, "\"resources\": {{ \"rss_mb\": {:.3} }} }}", self.rss_mb);
        out
    }
}
