//! Idempotent fill admission and trade emission.
//!
//! The router admits at most one fill per order id. Fills execute
//! immediately at `mid +/- half_spread` and append one CSV record to the
//! sink; a duplicate id is counted and emits nothing. The sink is generic
//! over `io::Write` so tests can capture trades in memory while production
//! writes through a buffered file.

use std::collections::HashSet;
use std::io::{self, Write};

use crate::strategy::Side;

pub const TRADES_CSV_HEADER: &str = "ts,symbol,side,qty,px,reason_excerpt";

/// One emitted fill record.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub ts_ns: u64,
    pub symbol: u32,
    pub side: Side,
    pub qty: f64,
    pub px: f64,
    /// At most six characters of the decision's reason score.
    pub reason_excerpt: String,
}

pub struct Router<W: Write> {
    admitted: HashSet<u64>,
    sink: W,
    idempotency_violations: u64,
}

impl<W: Write> Router<W> {
    /// Writes the CSV header eagerly so a fill-free run still yields a
    /// well-formed file.
    pub fn new(mut sink: W) -> io::Result<Self> {
        writeln!(sink, "{}", TRADES_CSV_HEADER)?;
        Ok(Self {
            admitted: HashSet::new(),
            sink,
            idempotency_violations: 0,
        })
    }

    /// Admit and immediately fill an IOC order.
    ///
    /// Returns `Ok(false)` without emitting anything when `order_id` was
    /// already admitted; admission is terminal, there is no un-admit.
    #[allow(clippy::too_many_arguments)]
    pub fn ioc_fill(
        &mut self,
        order_id: u64,
        ts_ns: u64,
        symbol: u32,
        side: Side,
        qty: f64,
        mid: f64,
        half_spread: f64,
        reason_excerpt: &str,
    ) -> io::Result<bool> {
        if !self.admitted.insert(order_id) {
            self.idempotency_violations += 1;
            return Ok(false);
        }
        let px = match side {
            Side::Buy => mid + half_spread,
            Side::Sell => mid - half_spread,
        };
        let trade = Trade {
            ts_ns,
            symbol,
            side,
            qty,
            px,
            reason_excerpt: reason_excerpt.to_string(),
        };
        self.append(&trade)?;
        Ok(true)
    }

    fn append(&mut self, trade: &Trade) -> io::Result<()> {
        writeln!(
            self.sink,
            "{},{},{},{:.6},{:.6},{}",
            trade.ts_ns,
            trade.symbol,
            trade.side.signum(),
            trade.qty,
            trade.px,
            trade.reason_excerpt
        )
    }

    pub fn idempotency_violations(&self) -> u64 {
        self.idempotency_violations
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }

    /// Hand the sink back, e.g. to inspect captured trades in tests.
    pub fn into_sink(self) -> W {
        self.sink
    }
}
