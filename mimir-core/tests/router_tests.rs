//! Router idempotence and trade formatting.

use mimir_core::router::{Router, TRADES_CSV_HEADER};
use mimir_core::strategy::Side;

#[test]
fn duplicate_order_id_emits_exactly_one_trade() {
    let mut router = Router::new(Vec::new()).unwrap();
    assert!(router
        .ioc_fill(42, 1_000, 0, Side::Buy, 1.0, 100.0, 0.005, "1.5012")
        .unwrap());
    assert!(!router
        .ioc_fill(42, 2_000, 0, Side::Buy, 1.0, 100.0, 0.005, "1.5012")
        .unwrap());
    assert_eq!(router.idempotency_violations(), 1);

    let csv = String::from_utf8(router.into_sink()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], TRADES_CSV_HEADER);
    assert_eq!(lines[1], "1000,0,1,1.000000,100.005000,1.5012");
}

#[test]
fn sell_fills_cross_below_mid() {
    let mut router = Router::new(Vec::new()).unwrap();
    assert!(router
        .ioc_fill(7, 0, 3, Side::Sell, 2.0, 50.0, 0.005, "-1.621")
        .unwrap());
    let csv = String::from_utf8(router.into_sink()).unwrap();
    let row = csv.lines().nth(1).unwrap();
    assert_eq!(row, "0,3,-1,2.000000,49.995000,-1.621");
}

#[test]
fn distinct_ids_all_fill() {
    let mut router = Router::new(Vec::new()).unwrap();
    for id in 0..10u64 {
        assert!(router
            .ioc_fill(id, id, 0, Side::Buy, 1.0, 100.0, 0.005, "2.0000")
            .unwrap());
    }
    assert_eq!(router.idempotency_violations(), 0);
    let csv = String::from_utf8(router.into_sink()).unwrap();
    // Header plus one row per admitted fill.
    assert_eq!(csv.lines().count(), 11);
}
