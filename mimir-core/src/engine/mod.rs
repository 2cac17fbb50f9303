//! Engine orchestration: threads, timing, shutdown, queue draining.
//!
//! Two execution modes share one pipeline:
//!
//! - **Real time** runs a producer and a consumer on separate OS threads.
//!   The producer advances a virtual clock by one inter-event period per
//!   tick and sleeps until each scheduled instant; it never coalesces
//!   missed ticks, so under consumer pressure it falls behind wall time
//!   instead of bursting. The consumer yields on an empty transport and
//!   exits once the producer is done and the queue is drained.
//! - **Simulated time** runs both roles sequentially on one thread over the
//!   unbounded locked queue, stamping every latency sample at exactly 1 us.
//!   This is the mode the determinism harness replays.
//!
//! Lifecycle is `Init -> Running -> Draining -> Stopped`: the producer
//! flips the shared `done` flag (release) at its deadline, the consumer
//! observes it (acquire) against an empty transport and stops. There is no
//! other transition and no recovery path.

pub mod harness;

use std::fs::File;
use std::hint;
use std::io::{BufWriter, Write};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use tracing::{info, warn};

use crate::config::{Mode, RunConfig};
use crate::feed::{rate_with_bursts, MdEvent, MdFeed};
use crate::latency::{ns_to_ms, LatencyRecorder};
use crate::metrics::{code_hash, Fingerprint, MetricsReport, ReliabilityCounters};
use crate::perf;
use crate::report;
use crate::risk::RiskGate;
use crate::router::Router;
use crate::strategy::ZScoreStrategy;
use crate::transport::Transport;
use crate::utils::hash::OrderKey;

const NS_PER_S: u64 = 1_000_000_000;
/// Constant latency stamped on every simulated-time sample.
const SIMULATED_LATENCY_NS: u64 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Timing {
    RealTime,
    Simulated,
}

/// Shared run counters. One writer each; relaxed ordering is enough for the
/// gauges, while `done` pairs release with the consumer's acquire.
#[derive(Default)]
struct RunCounters {
    drops: AtomicU64,
    processed: AtomicU64,
    seq: AtomicU64,
    depth_max: AtomicU64,
    done: AtomicBool,
}

/// Consumer-side pipeline state, owned by whichever thread is consuming.
struct ConsumerState<W: Write> {
    strategy: ZScoreStrategy,
    risk: RiskGate,
    router: Router<W>,
    latency: LatencyRecorder,
    mode: Mode,
    seed: u64,
    timing: Timing,
}

impl<W: Write> ConsumerState<W> {
    fn on_event(&mut self, ev: MdEvent, counters: &RunCounters, start: Instant) -> Result<()> {
        let decision = self.strategy.on_mid(ev.symbol, ev.mid);

        if self.mode == Mode::Naive {
            // Intentional per-event allocation: the naive pipeline pays the
            // allocator on every tick. This is part of the workload under
            // measurement, not overhead to remove.
            let rendered = format!("{:.6}", decision.reason_score);
            hint::black_box(&rendered);
        }

        if let Some(side) = decision.side {
            if self
                .risk
                .check(ev.symbol, side, decision.qty, ev.mid)
                .is_allowed()
            {
                // Sequence numbers count fills, not events; pre-increment so
                // the first fill carries sequence 1.
                let sequence = counters.seq.fetch_add(1, Ordering::Relaxed) + 1;
                let key = OrderKey {
                    seed: self.seed,
                    symbol: ev.symbol as i32,
                    sequence,
                    side: side.signum(),
                };
                let excerpt = reason_excerpt(decision.reason_score);
                let filled = self.router.ioc_fill(
                    key.order_id(),
                    ev.ts_ns,
                    ev.symbol,
                    side,
                    decision.qty,
                    ev.mid,
                    ev.spread * 0.5,
                    &excerpt,
                )?;
                if filled {
                    self.risk.on_fill(ev.symbol, side, decision.qty, ev.mid);
                }
            }
        }

        let t1_ns = match self.timing {
            Timing::Simulated => ev.ts_ns + SIMULATED_LATENCY_NS,
            Timing::RealTime => start.elapsed().as_nanos() as u64,
        };
        self.latency.record(ns_to_ms(t1_ns.saturating_sub(ev.ts_ns)));
        counters.processed.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// First six characters of the fixed-point reason score.
fn reason_excerpt(score: f64) -> String {
    let mut excerpt = format!("{:.6}", score);
    excerpt.truncate(6);
    excerpt
}

/// Result of one engine run.
pub struct EngineResult {
    pub report: MetricsReport,
    /// The rendered `metrics.json` body, without the trailing newline.
    pub json: String,
}

/// Orchestrates one run of the pipeline described by a [`RunConfig`].
pub struct Engine {
    cfg: RunConfig,
}

impl Engine {
    pub fn new(cfg: RunConfig) -> Self {
        Self { cfg }
    }

    /// Two-thread wall-clock run.
    pub fn run(&self) -> Result<EngineResult> {
        self.run_inner(Timing::RealTime)
    }

    /// Single-thread simulated-time run; byte-reproducible for a fixed
    /// configuration.
    pub fn run_simulated(&self) -> Result<EngineResult> {
        self.run_inner(Timing::Simulated)
    }

    fn run_inner(&self, timing: Timing) -> Result<EngineResult> {
        let cfg = &self.cfg;
        report::create_report_dir(&cfg.report_dir)?;

        if let Some(core) = cfg.affinity {
            if let Err(err) = perf::cpu::pin_to_core(core) {
                warn!("affinity pin failed, continuing unpinned: {}", err);
            }
        }

        // Simulated time always buffers through the unbounded queue: the
        // producer finishes before the consumer starts, so a bounded ring
        // would measure nothing but its own drops.
        let transport = match (timing, cfg.mode) {
            (Timing::Simulated, _) | (Timing::RealTime, Mode::Naive) => Transport::locked(),
            (Timing::RealTime, Mode::Optimized) => Transport::ring(),
        };

        let mut feed = MdFeed::new(cfg.symbols, cfg.seed);
        let counters = RunCounters::default();
        let state = ConsumerState {
            strategy: ZScoreStrategy::new(cfg.symbols),
            risk: RiskGate::new(cfg.symbols),
            router: report::open_trade_router(&cfg.report_dir)?,
            latency: LatencyRecorder::new(),
            mode: cfg.mode,
            seed: cfg.seed,
            timing,
        };

        info!(
            mode = %cfg.mode,
            rate = cfg.rate,
            symbols = cfg.symbols,
            duration_s = cfg.duration_s,
            "engine starting"
        );
        let start = Instant::now();

        let state = match timing {
            Timing::Simulated => {
                produce(cfg, &mut feed, &transport, &counters, start, timing);
                let mut state = state;
                consume(&transport, &counters, &mut state, start)?;
                state
            }
            Timing::RealTime => {
                let transport = &transport;
                let counters = &counters;
                thread::scope(|s| -> Result<ConsumerState<BufWriter<File>>> {
                    let producer = s.spawn(|| {
                        produce(cfg, &mut feed, transport, counters, start, timing);
                    });
                    let consumer =
                        s.spawn(move || -> Result<ConsumerState<BufWriter<File>>> {
                            let mut state = state;
                            consume(transport, counters, &mut state, start)?;
                            Ok(state)
                        });
                    producer
                        .join()
                        .map_err(|_| anyhow!("producer thread panicked"))?;
                    consumer
                        .join()
                        .map_err(|_| anyhow!("consumer thread panicked"))?
                })?
            }
        };

        let ConsumerState {
            risk, mut router, latency, ..
        } = state;
        router.flush().context("failed to flush trade sink")?;

        let processed = counters.processed.load(Ordering::Relaxed);
        let reliability = ReliabilityCounters {
            drops: counters.drops.load(Ordering::Relaxed),
            queue_depth_max: counters.depth_max.load(Ordering::Relaxed),
            idempotency_violations: router.idempotency_violations(),
            exposure_blocks: risk.exposure_blocks(),
        };
        // Reported against the configured duration, not measured elapsed.
        let eps = processed as f64 / cfg.duration_s.max(1) as f64;
        let rss_mb = match timing {
            Timing::Simulated => 0.0,
            Timing::RealTime => perf::rss::rss_mb(),
        };

        let metrics = MetricsReport {
            fingerprint: Fingerprint {
                seed: cfg.seed,
                code_hash: code_hash().to_string(),
                symbols: cfg.symbols,
                rate: cfg.rate,
                mode: cfg.mode,
            },
            latency,
            eps,
            reliability,
            rss_mb,
        };
        let json = metrics.to_json();
        report::write_artifacts(&cfg.report_dir, &metrics, &json)?;

        info!(
            processed,
            drops = reliability.drops,
            eps = eps as u64,
            "engine stopped"
        );
        Ok(EngineResult {
            report: metrics,
            json,
        })
    }
}

/// Producer loop for both timings. One event per iteration, scheduled one
/// period forward; the real-time variant sleeps to each scheduled instant.
fn produce(
    cfg: &RunConfig,
    feed: &mut MdFeed,
    transport: &Transport,
    counters: &RunCounters,
    start: Instant,
    timing: Timing,
) {
    let duration_ns = cfg.duration_s * NS_PER_S;
    let mut virtual_ns: u64 = 0;
    while virtual_ns < duration_ns {
        let t_s = virtual_ns as f64 / 1e9;
        let rate = rate_with_bursts(cfg.rate, t_s, &cfg.bursts);
        let period_ns = ((1e9 / rate.max(1.0)) as u64).max(1);

        let mut ev = feed.next(t_s);
        ev.ts_ns = virtual_ns;
        if transport.push(ev) {
            let depth = transport.depth() as u64;
            if depth > counters.depth_max.load(Ordering::Relaxed) {
                counters.depth_max.store(depth, Ordering::Relaxed);
            }
        } else {
            counters.drops.fetch_add(1, Ordering::Relaxed);
        }

        virtual_ns += period_ns;
        if timing == Timing::RealTime {
            let next = start + Duration::from_nanos(virtual_ns);
            let now = Instant::now();
            if next > now {
                thread::sleep(next - now);
            }
        }
    }
    counters.done.store(true, Ordering::Release);
}

/// Consumer loop: drain the transport through the pipeline until the
/// producer is done and the queue is empty.
fn consume<W: Write>(
    transport: &Transport,
    counters: &RunCounters,
    state: &mut ConsumerState<W>,
    start: Instant,
) -> Result<()> {
    loop {
        match transport.pop() {
            Some(ev) => state.on_event(ev, counters, start)?,
            None => {
                if counters.done.load(Ordering::Acquire) && transport.depth() == 0 {
                    break;
                }
                if state.timing == Timing::RealTime {
                    thread::yield_now();
                }
            }
        }
    }
    Ok(())
}
