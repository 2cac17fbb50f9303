//! Pre-trade risk gate.
//!
//! Two caps guard every candidate order: a per-trade notional cap and a
//! cumulative daily loss cap. Blocks are counted, never fatal. The gate is
//! the only writer of position and pnl state, and pnl only ever decreases
//! (every fill pays a flat cost).

use std::fmt;

use crate::strategy::Side;

pub const DEFAULT_PER_TRADE_CAP: f64 = 10_000.0;
pub const DEFAULT_DAILY_LOSS_CAP: f64 = 1_000.0;

/// Flat cost per fill as a fraction of notional.
const FILL_COST_FRAC: f64 = 0.01;

/// Why a check blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    PerTradeCap,
    DailyLossCap,
}

impl BlockReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            BlockReason::PerTradeCap => "per_trade_cap",
            BlockReason::DailyLossCap => "daily_loss_cap",
        }
    }
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a pre-trade check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskVerdict {
    Allowed,
    Blocked(BlockReason),
}

impl RiskVerdict {
    #[inline]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, RiskVerdict::Allowed)
    }

    /// Reason string for reporting; empty when allowed.
    pub const fn reason(&self) -> &'static str {
        match self {
            RiskVerdict::Allowed => "",
            RiskVerdict::Blocked(reason) => reason.as_str(),
        }
    }
}

/// Per-run risk state: positions, pnl, and the block counter.
pub struct RiskGate {
    per_trade_cap: f64,
    daily_loss_cap: f64,
    position: Vec<f64>,
    pnl: f64,
    exposure_blocks: u64,
}

impl RiskGate {
    pub fn new(symbols: u32) -> Self {
        Self::with_caps(symbols, DEFAULT_PER_TRADE_CAP, DEFAULT_DAILY_LOSS_CAP)
    }

    pub fn with_caps(symbols: u32, per_trade_cap: f64, daily_loss_cap: f64) -> Self {
        Self {
            per_trade_cap,
            daily_loss_cap,
            position: vec![0.0; symbols as usize],
            pnl: 0.0,
            exposure_blocks: 0,
        }
    }

    /// Gate one candidate order. Per-trade notional is checked before the
    /// daily loss cap; either block increments `exposure_blocks`.
    pub fn check(&mut self, _symbol: u32, _side: Side, qty: f64, px: f64) -> RiskVerdict {
        let notional = (qty * px).abs();
        if notional > self.per_trade_cap {
            self.exposure_blocks += 1;
            return RiskVerdict::Blocked(BlockReason::PerTradeCap);
        }
        if self.pnl <= -self.daily_loss_cap {
            self.exposure_blocks += 1;
            return RiskVerdict::Blocked(BlockReason::DailyLossCap);
        }
        RiskVerdict::Allowed
    }

    /// Apply an admitted fill. Callers must only invoke this after the
    /// router has admitted the order id.
    pub fn on_fill(&mut self, symbol: u32, side: Side, qty: f64, px: f64) {
        self.position[symbol as usize] += f64::from(side.signum()) * qty;
        self.pnl -= FILL_COST_FRAC * qty.abs() * px;
    }

    pub fn pnl(&self) -> f64 {
        self.pnl
    }

    pub fn position(&self, symbol: u32) -> f64 {
        self.position[symbol as usize]
    }

    pub fn exposure_blocks(&self) -> u64 {
        self.exposure_blocks
    }
}
