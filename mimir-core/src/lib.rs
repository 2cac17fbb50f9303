//! Mimir Core - Didactic Low-Latency Trading Pipeline
//!
//! Mimir ingests a deterministic synthetic market-data stream, runs a
//! statistical signal strategy, enforces pre-trade risk gating, and emits
//! idempotent fills - all under measured end-to-end latency and reliability
//! budgets. Its purpose is to contrast a naive (locked, allocating) pipeline
//! against an optimized (lock-free, allocation-free) one on the same
//! workload, producing a reproducible metrics report.
//!
//! ## Architecture
//! - **Lock-free SPSC ring** hand-off in optimized mode, mutex FIFO in naive mode
//! - **Cache-line separated** producer/consumer counters
//! - **Zero heap allocations** on the optimized hot path
//! - **Deterministic replay**: simulated-time runs are byte-reproducible
//!
//! ## Data Flow
//!
//! ```text
//! MdFeed -> Transport (Ring | Locked) -> Strategy -> Risk -> Router -> trades.csv
//!                                                 \-> LatencyRecorder -> metrics.json
//! ```
//!
//! ## Core Modules
//! - `feed`: deterministic market-data generation
//! - `transport`: SPSC ring and locked FIFO queues
//! - `strategy`: per-symbol EWMA/EWVAR z-score signal
//! - `risk`: notional and daily-loss caps
//! - `router`: idempotent fill admission and trade emission
//! - `latency`: bounded-range histogram with percentile queries
//! - `metrics`: report composition (fingerprint, latency, reliability)
//! - `engine`: thread orchestration and the determinism harness
//! - `perf`: CPU affinity and RSS sampling

pub mod config;
pub mod engine;
pub mod errors;
pub mod feed;
pub mod latency;
pub mod metrics;
pub mod perf;
pub mod report;
pub mod risk;
pub mod router;
pub mod strategy;
pub mod transport;
pub mod utils;

// Re-export error types
pub use anyhow::{Error, Result};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{Burst, Mode, RunConfig};
    pub use crate::engine::{Engine, EngineResult};
    pub use crate::feed::{MdEvent, MdFeed};
    pub use crate::latency::LatencyRecorder;
    pub use crate::risk::{RiskGate, RiskVerdict};
    pub use crate::router::Router;
    pub use crate::strategy::{Decision, Side, ZScoreStrategy};
    pub use crate::transport::{LockedQueue, SpscRing, Transport};
    pub use crate::{Error, Result};
}
