//! Property-based tests for book invariants

use std::collections::HashMap;

use matching_engine::OrderBook;
use proptest::prelude::*;
use types::ids::{AssetSymbol, OrderId, UserId};
use types::numeric::{Price, Quantity};
use types::order::{OrderStatus, Side};

const MIN: i64 = 100;
const MAX: i64 = 120;

#[derive(Debug, Clone)]
enum Op {
    Limit { side: Side, qty: u64, price: i64 },
    Market { side: Side, qty: u64 },
    Cancel { nth: usize },
}

fn side() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Buy), Just(Side::Sell)]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (side(), 1u64..50, MIN..=MAX).prop_map(|(side, qty, price)| Op::Limit { side, qty, price }),
        2 => (side(), 1u64..80).prop_map(|(side, qty)| Op::Market { side, qty }),
        2 => (0usize..64).prop_map(|nth| Op::Cancel { nth }),
    ]
}

fn run(ops: &[Op]) -> (OrderBook, Vec<OrderId>) {
    let mut book = OrderBook::new(AssetSymbol::new("PROP"), Price::new(MIN), Price::new(MAX)).unwrap();
    let user = UserId::new("prop");
    let mut ids = Vec::new();

    for (i, op) in ops.iter().enumerate() {
        let id = OrderId::new(i as u64);
        match *op {
            Op::Limit { side, qty, price } => {
                book.submit_limit(id, user.clone(), side, Quantity::new(qty), Price::new(price), i as i64)
                    .unwrap();
                ids.push(id);
            }
            Op::Market { side, qty } => {
                book.submit_market(id, user.clone(), side, Quantity::new(qty), i as i64).unwrap();
            }
            Op::Cancel { nth } => {
                if let Some(&target) = ids.get(nth) {
                    let _ = book.cancel(target);
                }
            }
        }
        assert!(!book.is_crossed(), "book crossed after op {i}: {op:?}");
    }
    (book, ids)
}

proptest! {
    #[test]
    fn prop_book_never_crossed(ops in prop::collection::vec(op(), 1..120)) {
        let (book, _) = run(&ops);
        prop_assert!(!book.is_crossed());
    }

    #[test]
    fn prop_quantity_conserved(ops in prop::collection::vec(op(), 1..120)) {
        let (book, _) = run(&ops);

        for order in book.orders() {
            prop_assert!(order.check_invariant());
            prop_assert_eq!(order.filled_quantity() + order.remaining_quantity, order.quantity);
        }

        // Resting depth equals the remaining quantity of every live order
        for side in [Side::Buy, Side::Sell] {
            let live: u64 = book
                .orders()
                .filter(|o| o.side == side && o.is_live())
                .map(|o| o.remaining_quantity.value())
                .sum();
            let limit = match side {
                Side::Buy => Price::new(MIN),
                Side::Sell => Price::new(MAX),
            };
            let aggregated: u64 = book.query_active(side, limit).values().map(|q| q.value()).sum();
            prop_assert_eq!(live, aggregated);
        }

        // Each side of the tape fills the same total
        let bought: u64 = book.orders().filter(|o| o.side == Side::Buy).map(|o| o.filled_quantity().value()).sum();
        let sold: u64 = book.orders().filter(|o| o.side == Side::Sell).map(|o| o.filled_quantity().value()).sum();
        prop_assert_eq!(bought, sold);
    }

    #[test]
    fn prop_levels_queue_in_arrival_order(ops in prop::collection::vec(op(), 1..120)) {
        let (book, _) = run(&ops);
        let sequences: HashMap<OrderId, u64> = book.orders().map(|o| (o.order_id, o.sequence)).collect();

        for side in [Side::Buy, Side::Sell] {
            for price in MIN..=MAX {
                let queued = book.queued_at(side, Price::new(price));
                prop_assert!(queued.windows(2).all(|w| sequences[&w[0]] < sequences[&w[1]]));
                for id in &queued {
                    let order = book.order(id).unwrap();
                    prop_assert!(matches!(order.status, OrderStatus::Active | OrderStatus::PartiallyFilled));
                }
            }
        }
    }

    #[test]
    fn prop_fills_respect_taker_limit(
        resting in prop::collection::vec((1u64..20, MIN..=MAX), 1..40),
        qty in 1u64..200,
        limit in MIN..=MAX,
    ) {
        let mut book = OrderBook::new(AssetSymbol::new("PROP"), Price::new(MIN), Price::new(MAX)).unwrap();
        let maker = UserId::new("maker");
        for (i, (q, p)) in resting.iter().enumerate() {
            book.submit_limit(OrderId::new(i as u64), maker.clone(), Side::Sell, Quantity::new(*q), Price::new(*p), 0)
                .unwrap();
        }

        let report = book
            .submit_limit(OrderId::new(1_000), UserId::new("taker"), Side::Buy, Quantity::new(qty), Price::new(limit), 1)
            .unwrap();

        // Ascending prices, never above the taker's limit
        prop_assert!(report.fills.iter().all(|f| f.price <= Price::new(limit)));
        prop_assert!(report.fills.windows(2).all(|w| w[0].price <= w[1].price));
        prop_assert_eq!(report.filled_quantity() + report.remaining, Quantity::new(qty));
    }
}
