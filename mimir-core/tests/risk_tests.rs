//! Risk gate scenarios.

use mimir_core::risk::{BlockReason, RiskGate, RiskVerdict};
use mimir_core::strategy::Side;

#[test]
fn per_trade_notional_cap_blocks() {
    let mut risk = RiskGate::with_caps(2, 10.0, 1.0);
    // notional = 12 > 10
    let verdict = risk.check(0, Side::Buy, 2.0, 6.0);
    assert_eq!(verdict, RiskVerdict::Blocked(BlockReason::PerTradeCap));
    assert_eq!(verdict.reason(), "per_trade_cap");
    assert!(risk.exposure_blocks() >= 1);
}

#[test]
fn daily_loss_cap_blocks_after_accumulated_costs() {
    let mut risk = RiskGate::with_caps(2, 10.0, 1.0);
    assert!(risk.check(0, Side::Buy, 1.0, 5.0).is_allowed());
    // Each fill costs 1% of notional; 201 fills of 5 notional sink pnl
    // far past the 1.0 loss cap.
    for _ in 0..201 {
        risk.on_fill(0, Side::Buy, 1.0, 5.0);
    }
    let verdict = risk.check(1, Side::Sell, 0.5, 5.0);
    assert_eq!(verdict, RiskVerdict::Blocked(BlockReason::DailyLossCap));
    assert_eq!(verdict.reason(), "daily_loss_cap");
}

#[test]
fn blocked_inputs_stay_blocked() {
    let mut risk = RiskGate::with_caps(1, 10.0, 1.0);
    for i in 1..=5u64 {
        let verdict = risk.check(0, Side::Buy, 2.0, 6.0);
        assert!(!verdict.is_allowed());
        assert_eq!(risk.exposure_blocks(), i);
    }
}

#[test]
fn allowed_verdict_has_empty_reason() {
    let mut risk = RiskGate::new(1);
    let verdict = risk.check(0, Side::Buy, 1.0, 100.0);
    assert!(verdict.is_allowed());
    assert_eq!(verdict.reason(), "");
}

#[test]
fn fills_move_position_and_only_ever_cost() {
    let mut risk = RiskGate::new(2);
    risk.on_fill(0, Side::Buy, 2.0, 100.0);
    risk.on_fill(0, Side::Sell, 0.5, 100.0);
    assert_eq!(risk.position(0), 1.5);

    let pnl_after_two = risk.pnl();
    assert!(pnl_after_two < 0.0);
    risk.on_fill(1, Side::Buy, 1.0, 100.0);
    assert!(risk.pnl() < pnl_after_two);
}
