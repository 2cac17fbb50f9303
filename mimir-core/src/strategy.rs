//! Per-symbol streaming z-score strategy.
//!
//! Maintains an exponentially weighted mean and variance of one-tick
//! returns per symbol and enters when the standardized mean crosses the
//! entry threshold. The signal is contrarian: a mid below its smoothed mean
//! (negative z) buys, a mid above sells.

/// EWMA coefficient for returns.
pub const ALPHA: f64 = 0.2;
/// Entry threshold on |z|.
pub const Z_ENTRY: f64 = 1.5;

const EWVAR_INIT: f64 = 1e-6;
const EWVAR_FLOOR: f64 = 1e-12;

/// Order side. The discriminants double as the signed side factor used in
/// position updates, trade records and order-id hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Side {
    Buy = 1,
    Sell = -1,
}

impl Side {
    #[inline(always)]
    pub const fn signum(self) -> i32 {
        self as i32
    }
}

/// Strategy output for one tick. `side: None` is a hold and implies
/// `qty == 0`.
#[derive(Debug, Clone, Copy)]
pub struct Decision {
    pub side: Option<Side>,
    pub qty: f64,
    /// The z-score behind the decision, kept for the trade reason excerpt.
    pub reason_score: f64,
}

#[derive(Clone, Copy)]
struct SymbolStats {
    prev_mid: f64,
    ewma: f64,
    ewvar: f64,
}

/// Online per-symbol moment tracker emitting Buy/Sell/Hold decisions.
pub struct ZScoreStrategy {
    alpha: f64,
    z_entry: f64,
    stats: Vec<SymbolStats>,
}

impl ZScoreStrategy {
    pub fn new(symbols: u32) -> Self {
        Self::with_params(symbols, ALPHA, Z_ENTRY)
    }

    pub fn with_params(symbols: u32, alpha: f64, z_entry: f64) -> Self {
        Self {
            alpha,
            z_entry,
            stats: vec![
                SymbolStats {
                    prev_mid: 0.0,
                    ewma: 0.0,
                    // Tiny positive epsilon keeps the first-tick z finite.
                    ewvar: EWVAR_INIT,
                };
                symbols as usize
            ],
        }
    }

    /// Fold one mid observation into the symbol's moments and decide.
    pub fn on_mid(&mut self, symbol: u32, mid: f64) -> Decision {
        let s = &mut self.stats[symbol as usize];
        let ret = if s.prev_mid > 0.0 {
            (mid - s.prev_mid) / s.prev_mid
        } else {
            0.0
        };
        s.prev_mid = mid;

        let d = ret - s.ewma;
        s.ewma += self.alpha * d;
        s.ewvar = (1.0 - self.alpha) * (s.ewvar + self.alpha * d * d);

        let z = if s.ewvar > EWVAR_FLOOR {
            s.ewma / s.ewvar.sqrt()
        } else {
            0.0
        };

        let side = if z <= -self.z_entry {
            Some(Side::Buy)
        } else if z >= self.z_entry {
            Some(Side::Sell)
        } else {
            None
        };
        Decision {
            side,
            qty: if side.is_some() { 1.0 } else { 0.0 },
            reason_score: z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_is_a_hold_with_zero_z() {
        let mut strat = ZScoreStrategy::new(1);
        let d = strat.on_mid(0, 100.0);
        assert!(d.side.is_none());
        assert_eq!(d.qty, 0.0);
        assert_eq!(d.reason_score, 0.0);
    }

    #[test]
    fn declining_mids_trigger_contrarian_buy_first() {
        let mut strat = ZScoreStrategy::new(1);
        let mut mid = 100.0;
        let mut first_entry = None;
        for _ in 0..200 {
            mid *= 0.995;
            let d = strat.on_mid(0, mid);
            if d.side.is_some() {
                first_entry = d.side;
                break;
            }
        }
        assert_eq!(first_entry, Some(Side::Buy));
    }

    #[test]
    fn rising_mids_trigger_sell_first() {
        let mut strat = ZScoreStrategy::new(1);
        let mut mid = 100.0;
        let mut first_entry = None;
        for _ in 0..200 {
            mid *= 1.005;
            let d = strat.on_mid(0, mid);
            if d.side.is_some() {
                first_entry = d.side;
                break;
            }
        }
        assert_eq!(first_entry, Some(Side::Sell));
    }

    #[test]
    fn symbols_are_tracked_independently() {
        let mut strat = ZScoreStrategy::new(2);
        let mut falling = 100.0;
        for _ in 0..200 {
            falling *= 0.995;
            strat.on_mid(0, falling);
            // Symbol 1 never moves, so it must never fire.
            let steady = strat.on_mid(1, 50.0);
            assert!(steady.side.is_none());
        }
    }

    #[test]
    fn entry_qty_is_one_unit() {
        let mut strat = ZScoreStrategy::new(1);
        let mut mid = 100.0;
        for _ in 0..200 {
            mid *= 0.995;
            let d = strat.on_mid(0, mid);
            if let Some(side) = d.side {
                assert_eq!(side, Side::Buy);
                assert_eq!(d.qty, 1.0);
                assert!(d.reason_score <= -Z_ENTRY);
                return;
            }
        }
        panic!("strategy never entered on a monotone decline");
    }
}
