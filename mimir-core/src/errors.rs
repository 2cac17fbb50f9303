//! Fatal setup failures.
//!
//! Everything that can go wrong after setup is a counted, non-fatal
//! condition surfaced through the reliability counters; only the report
//! directory and trade sink can abort a run.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to create report directory {dir}: {source}")]
    ReportDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open trade sink {path}: {source}")]
    TradeSink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write report artifact {path}: {source}")]
    Artifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
