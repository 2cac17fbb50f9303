//! Common initialization and output helpers.

use anyhow::Result;
use mimir_core::engine::EngineResult;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing. Output goes to stderr so stdout stays clean for
/// shell pipelines over the report artifacts.
pub fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

/// Print the final run summary.
pub fn print_summary(result: &EngineResult) {
    let p = result.report.latency.percentiles();
    let r = &result.report.reliability;

    tracing::info!("=== Run complete ===");
    tracing::info!("mode: {}", result.report.fingerprint.mode);
    tracing::info!("throughput: {:.0} events/s", result.report.eps);
    tracing::info!(
        "latency ms: p50={:.3} p95={:.3} p99={:.3} max={:.3} jitter={:.3}",
        p.p50,
        p.p95,
        p.p99,
        p.max,
        p.jitter_ratio
    );
    tracing::info!(
        "reliability: drops={} queue_depth_max={} idempotency_violations={} exposure_blocks={}",
        r.drops,
        r.queue_depth_max,
        r.idempotency_violations,
        r.exposure_blocks
    );
    tracing::info!("rss: {:.3} MB", result.report.rss_mb);
}
