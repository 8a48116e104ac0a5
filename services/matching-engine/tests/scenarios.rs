//! End-to-end matching scenarios
//!
//! Drives the engine through its public surface only: registration, book
//! creation, submissions, cancels and aggregate queries.

use std::collections::BTreeMap;
use std::sync::Arc;

use matching_engine::{MatchingEngine, NullSink};
use types::prelude::*;

const BUY_QTYS: [u64; 10] = [4, 8, 6, 7, 5, 4, 8, 6, 7, 5];
const SELL_QTYS: [u64; 10] = [5, 10, 8, 7, 6, 5, 10, 8, 7, 6];

fn btc() -> AssetSymbol {
    AssetSymbol::new("BTC")
}

fn setup() -> MatchingEngine {
    let engine = MatchingEngine::new(Arc::new(NullSink));
    engine.create_book(btc(), Price::new(100), Price::new(200)).unwrap();
    for user in ["user1", "user2", "user3"] {
        engine.register_user(UserId::new(user), None);
    }
    engine
}

/// Rest ten buys at 140 and ten sells at 160
fn seed_ladder(engine: &MatchingEngine) {
    let user1 = UserId::new("user1");
    let user2 = UserId::new("user2");
    for qty in BUY_QTYS {
        engine
            .submit_limit(&user1, Side::Buy, &btc(), Quantity::new(qty), Price::new(140))
            .unwrap();
    }
    for qty in SELL_QTYS {
        engine
            .submit_limit(&user2, Side::Sell, &btc(), Quantity::new(qty), Price::new(160))
            .unwrap();
    }
}

fn single(price: i64, qty: u64) -> BTreeMap<Price, Quantity> {
    BTreeMap::from([(Price::new(price), Quantity::new(qty))])
}

#[test]
fn test_seeded_ladder_aggregates() {
    let engine = setup();
    seed_ladder(&engine);

    assert_eq!(engine.query_active(Side::Buy, &btc(), Price::new(0)).unwrap(), single(140, 60));
    assert_eq!(engine.query_active(Side::Sell, &btc(), Price::new(200)).unwrap(), single(160, 72));
}

#[test]
fn test_market_buy_sweeps_sells_in_fifo_order() {
    let engine = setup();
    seed_ladder(&engine);

    let report = engine
        .submit_market(&UserId::new("user3"), Side::Buy, &btc(), Quantity::new(40))
        .unwrap();

    let matched: Vec<u64> = report.fills.iter().map(|f| f.quantity.value()).collect();
    assert_eq!(matched, vec![5, 10, 8, 7, 6, 4]);
    assert!(report.fills.iter().all(|f| f.price == Price::new(160)));
    assert_eq!(report.status, OrderStatus::Filled);

    assert_eq!(engine.query_active(Side::Sell, &btc(), Price::new(200)).unwrap(), single(160, 32));
    assert_eq!(engine.query_active(Side::Buy, &btc(), Price::new(0)).unwrap(), single(140, 60));
}

#[test]
fn test_market_sell_sweeps_buys_in_fifo_order() {
    let engine = setup();
    seed_ladder(&engine);

    let report = engine
        .submit_market(&UserId::new("user3"), Side::Sell, &btc(), Quantity::new(30))
        .unwrap();

    let matched: Vec<u64> = report.fills.iter().map(|f| f.quantity.value()).collect();
    assert_eq!(matched, vec![4, 8, 6, 7, 5]);
    assert!(report.fills.iter().all(|f| f.price == Price::new(140)));

    assert_eq!(engine.query_active(Side::Buy, &btc(), Price::new(0)).unwrap(), single(140, 30));
    assert_eq!(engine.query_active(Side::Sell, &btc(), Price::new(200)).unwrap(), single(160, 72));
}

#[test]
fn test_both_sweeps_in_sequence() {
    let engine = setup();
    seed_ladder(&engine);
    let taker = UserId::new("user3");

    engine.submit_market(&taker, Side::Buy, &btc(), Quantity::new(40)).unwrap();
    engine.submit_market(&taker, Side::Sell, &btc(), Quantity::new(30)).unwrap();

    assert_eq!(engine.query_active(Side::Sell, &btc(), Price::new(200)).unwrap(), single(160, 32));
    assert_eq!(engine.query_active(Side::Buy, &btc(), Price::new(0)).unwrap(), single(140, 30));
}

#[test]
fn test_query_price_limit_filters_levels() {
    let engine = setup();
    let user = UserId::new("user1");
    for price in [110, 120, 130] {
        engine
            .submit_limit(&user, Side::Buy, &btc(), Quantity::new(1), Price::new(price))
            .unwrap();
    }
    for price in [170, 180, 190] {
        engine
            .submit_limit(&user, Side::Sell, &btc(), Quantity::new(1), Price::new(price))
            .unwrap();
    }

    let bids = engine.query_active(Side::Buy, &btc(), Price::new(120)).unwrap();
    assert_eq!(bids.keys().copied().collect::<Vec<_>>(), vec![Price::new(120), Price::new(130)]);

    let asks = engine.query_active(Side::Sell, &btc(), Price::new(180)).unwrap();
    assert_eq!(asks.keys().copied().collect::<Vec<_>>(), vec![Price::new(170), Price::new(180)]);

    assert!(engine.query_active(Side::Buy, &btc(), Price::new(500)).unwrap().is_empty());
}

#[test]
fn test_cancel_then_query() {
    let engine = setup();
    let user = UserId::new("user1");
    let keep = engine
        .submit_limit(&user, Side::Sell, &btc(), Quantity::new(3), Price::new(170))
        .unwrap();
    let drop = engine
        .submit_limit(&user, Side::Sell, &btc(), Quantity::new(9), Price::new(170))
        .unwrap();

    engine.cancel(drop.order_id).unwrap();
    assert_eq!(engine.query_active(Side::Sell, &btc(), Price::new(200)).unwrap(), single(170, 3));

    // The surviving order still trades first in line
    let report = engine
        .submit_limit(&UserId::new("user2"), Side::Buy, &btc(), Quantity::new(3), Price::new(170))
        .unwrap();
    assert_eq!(report.fills[0].maker_order_id, keep.order_id);
    assert!(engine.query_active(Side::Sell, &btc(), Price::new(200)).unwrap().is_empty());
}

#[test]
fn test_best_prices_recover_after_level_empties() {
    let engine = setup();
    let user = UserId::new("user1");
    engine.submit_limit(&user, Side::Sell, &btc(), Quantity::new(2), Price::new(150)).unwrap();
    engine.submit_limit(&user, Side::Sell, &btc(), Quantity::new(2), Price::new(175)).unwrap();

    engine
        .submit_limit(&UserId::new("user2"), Side::Buy, &btc(), Quantity::new(2), Price::new(150))
        .unwrap();

    let depth = engine.depth(&btc()).unwrap();
    assert_eq!(depth.best_ask, Some(Price::new(175)));
    assert_eq!(depth.best_bid, None);
}

#[test]
fn test_rejections() {
    let engine = setup();
    let user = UserId::new("user1");

    assert_eq!(
        engine.submit_limit(&UserId::new("mallory"), Side::Buy, &btc(), Quantity::new(1), Price::new(150)),
        Err(EngineError::UnauthorizedUser { user: UserId::new("mallory") })
    );
    assert!(matches!(
        engine.submit_limit(&user, Side::Buy, &btc(), Quantity::new(1), Price::new(250)),
        Err(EngineError::Validation(ValidationError::PriceOutOfBounds { .. }))
    ));
    assert_eq!(
        engine.submit_market(&user, Side::Buy, &btc(), Quantity::zero()),
        Err(EngineError::Validation(ValidationError::ZeroQuantity))
    );
    assert!(matches!(
        engine.create_book(btc(), Price::new(1), Price::new(2)),
        Err(EngineError::DuplicateAsset { .. })
    ));
    assert!(matches!(
        engine.create_book(AssetSymbol::new("ETH"), Price::new(10), Price::new(5)),
        Err(EngineError::Validation(ValidationError::InvalidRange { .. }))
    ));

    let depth = engine.depth(&btc()).unwrap();
    assert_eq!(depth.buy_depth, Quantity::zero());
    assert_eq!(depth.sell_depth, Quantity::zero());
}

#[test]
fn test_bounds_are_inclusive() {
    let engine = setup();
    let user = UserId::new("user1");

    assert!(engine.submit_limit(&user, Side::Buy, &btc(), Quantity::new(1), Price::new(100)).is_ok());
    assert!(engine.submit_limit(&user, Side::Sell, &btc(), Quantity::new(1), Price::new(200)).is_ok());
    assert_eq!(engine.query_active(Side::Buy, &btc(), Price::new(0)).unwrap(), single(100, 1));
    assert_eq!(engine.query_active(Side::Sell, &btc(), Price::new(200)).unwrap(), single(200, 1));
}
