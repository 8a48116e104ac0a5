//! Order book for a single asset
//!
//! Couples the asset's arena and price ladder and runs price-time priority
//! matching against them. Every method assumes the caller holds the book's
//! lock; nothing here is shared.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;
use types::errors::{EngineError, ValidationError};
use types::fill::Fill;
use types::ids::{AssetSymbol, OrderId, UserId};
use types::numeric::{Price, Quantity};
use types::order::{Order, OrderKind, OrderStatus, Side};

use super::arena::{ArenaIndex, OrderArena};
use super::ladder::PriceLadder;
use crate::matching::{crossing, FillExecutor};

/// Result of submitting an order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitReport {
    pub order_id: OrderId,
    pub fills: Vec<Fill>,
    /// Unfilled quantity; resting for limit orders, discarded for market orders
    pub remaining: Quantity,
    pub status: OrderStatus,
}

impl SubmitReport {
    /// Quantity matched by this submission
    pub fn filled_quantity(&self) -> Quantity {
        self.fills.iter().map(|fill| fill.quantity).sum()
    }
}

/// Aggregate view of a book's two sides
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookDepth {
    pub asset: AssetSymbol,
    pub min_price: Price,
    pub max_price: Price,
    pub best_bid: Option<Price>,
    pub best_ask: Option<Price>,
    pub buy_depth: Quantity,
    pub sell_depth: Quantity,
}

/// Widest ladder a book may allocate, in ticks (`max - min + 1`)
pub const MAX_LADDER_TICKS: u64 = 1_000_000;

/// Number of ticks spanned by `[min_price, max_price]`, if it fits in a `u64`
pub fn ladder_ticks(min_price: Price, max_price: Price) -> Option<u64> {
    max_price
        .value()
        .checked_sub(min_price.value())
        .and_then(|span| span.checked_add(1))
        .and_then(|ticks| u64::try_from(ticks).ok())
}

/// Check book bounds: both non-negative, `min < max`, and no wider than
/// [`MAX_LADDER_TICKS`]
pub fn validate_range(min_price: Price, max_price: Price) -> Result<(), ValidationError> {
    let invalid = ValidationError::InvalidRange {
        min: min_price,
        max: max_price,
    };
    if min_price.is_negative() || max_price.is_negative() || min_price >= max_price {
        return Err(invalid);
    }
    match ladder_ticks(min_price, max_price) {
        Some(ticks) if ticks <= MAX_LADDER_TICKS => Ok(()),
        _ => Err(invalid),
    }
}

/// Order book for a single asset
#[derive(Debug)]
pub struct OrderBook {
    asset: AssetSymbol,
    arena: OrderArena,
    ladder: PriceLadder,
    executor: FillExecutor,
    /// Arrival sequence handed to the next accepted order
    next_sequence: u64,
}

impl OrderBook {
    /// Create an empty book with fixed price bounds
    pub fn new(asset: AssetSymbol, min_price: Price, max_price: Price) -> Result<Self, ValidationError> {
        validate_range(min_price, max_price)?;
        let ladder = PriceLadder::new(min_price, max_price).ok_or(ValidationError::InvalidRange {
            min: min_price,
            max: max_price,
        })?;
        Ok(Self {
            asset,
            arena: OrderArena::new(),
            ladder,
            executor: FillExecutor::new(0),
            next_sequence: 0,
        })
    }

    pub fn asset(&self) -> &AssetSymbol {
        &self.asset
    }

    pub fn min_price(&self) -> Price {
        self.ladder.min_price()
    }

    pub fn max_price(&self) -> Price {
        self.ladder.max_price()
    }

    pub fn best_bid(&self) -> Option<Price> {
        self.ladder.best_bid()
    }

    pub fn best_ask(&self) -> Option<Price> {
        self.ladder.best_ask()
    }

    /// Look up any order ever submitted to this book
    pub fn order(&self, order_id: &OrderId) -> Option<&Order> {
        self.arena.get(order_id)
    }

    /// Every order ever submitted to this book, in arrival order
    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.arena.iter()
    }

    /// Ids of the orders queued at one level, front first
    pub fn queued_at(&self, side: Side, price: Price) -> Vec<OrderId> {
        if !self.ladder.contains(price) {
            return Vec::new();
        }
        self.ladder
            .level(side, price)
            .iter(&self.arena)
            .map(|ix| self.arena.order(ix).order_id)
            .collect()
    }

    /// Whether the book currently has best bid >= best ask
    pub fn is_crossed(&self) -> bool {
        self.ladder.is_crossed()
    }

    /// Check a limit order against the book's bounds
    ///
    /// Also rejects a quantity that could not rest without overflowing its
    /// side's total. A level never holds more than its side, so this covers
    /// the level total too.
    pub fn validate_limit(&self, side: Side, quantity: Quantity, price: Price) -> Result<(), ValidationError> {
        self.validate_market(quantity)?;
        if !self.ladder.contains(price) {
            return Err(ValidationError::PriceOutOfBounds {
                price,
                min: self.min_price(),
                max: self.max_price(),
            });
        }
        let resting = self.ladder.depth(side);
        if resting.checked_add(quantity).is_none() {
            return Err(ValidationError::QuantityOverflow { quantity, resting });
        }
        Ok(())
    }

    pub fn validate_market(&self, quantity: Quantity) -> Result<(), ValidationError> {
        if quantity.is_zero() {
            return Err(ValidationError::ZeroQuantity);
        }
        Ok(())
    }

    /// Submit a limit order
    ///
    /// Matches against the opposite side while it crosses, then rests any
    /// remainder at the tail of its own price level.
    pub fn submit_limit(
        &mut self,
        order_id: OrderId,
        user: UserId,
        side: Side,
        quantity: Quantity,
        price: Price,
        timestamp: i64,
    ) -> Result<SubmitReport, ValidationError> {
        self.validate_limit(side, quantity, price)?;
        let order = self.new_order(order_id, user, side, OrderKind::Limit, quantity, price, timestamp);
        Ok(self.execute(order, timestamp))
    }

    /// Submit a market order
    ///
    /// Priced at the book's extreme bound for its side. Whatever cannot be
    /// matched right away is discarded, never rested.
    pub fn submit_market(
        &mut self,
        order_id: OrderId,
        user: UserId,
        side: Side,
        quantity: Quantity,
        timestamp: i64,
    ) -> Result<SubmitReport, ValidationError> {
        self.validate_market(quantity)?;
        let price = match side {
            Side::Buy => self.max_price(),
            Side::Sell => self.min_price(),
        };
        let order = self.new_order(order_id, user, side, OrderKind::Market, quantity, price, timestamp);
        Ok(self.execute(order, timestamp))
    }

    #[allow(clippy::too_many_arguments)]
    fn new_order(
        &mut self,
        order_id: OrderId,
        user: UserId,
        side: Side,
        kind: OrderKind,
        quantity: Quantity,
        price: Price,
        timestamp: i64,
    ) -> Order {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        Order::new(
            order_id,
            user,
            self.asset.clone(),
            side,
            kind,
            price,
            quantity,
            sequence,
            timestamp,
        )
    }

    fn execute(&mut self, order: Order, timestamp: i64) -> SubmitReport {
        let order_id = order.order_id;
        let kind = order.kind;
        let ix = self.arena.insert(order);

        let fills = self.sweep(ix, timestamp);

        if !self.arena.order(ix).is_filled() {
            match kind {
                OrderKind::Limit => self.ladder.rest(&mut self.arena, ix),
                OrderKind::Market => self.arena.order_mut(ix).cancel(),
            }
        }

        let order = self.arena.order(ix);
        debug!(
            asset = %self.asset,
            order_id = %order_id,
            side = %order.side,
            kind = ?kind,
            fills = fills.len(),
            remaining = %order.remaining_quantity,
            "Order executed"
        );

        SubmitReport {
            order_id,
            fills,
            remaining: order.remaining_quantity,
            status: order.status,
        }
    }

    /// Match the taker against the opposite side, best level first and FIFO
    /// within each level
    fn sweep(&mut self, taker: ArenaIndex, timestamp: i64) -> Vec<Fill> {
        let (taker_side, limit) = {
            let order = self.arena.order(taker);
            (order.side, order.price)
        };
        let maker_side = taker_side.opposite();
        let mut fills = Vec::new();

        while !self.arena.order(taker).is_filled() {
            let Some(level_price) = crossing::tradable_level(taker_side, limit, self.ladder.best(maker_side)) else {
                break;
            };

            while let Some(maker) = self.ladder.level(maker_side, level_price).front() {
                let wanted = self.arena.order(taker).remaining_quantity;
                if wanted.is_zero() {
                    break;
                }
                let quantity = wanted.min(self.arena.order(maker).remaining_quantity);

                self.arena.order_mut(maker).add_fill(quantity);
                self.arena.order_mut(taker).add_fill(quantity);
                self.ladder.record_fill(maker_side, level_price, quantity);

                fills.push(self.executor.execute(
                    &self.asset,
                    self.arena.order(taker),
                    self.arena.order(maker),
                    level_price,
                    quantity,
                    timestamp,
                ));

                if self.arena.order(maker).is_filled() {
                    self.ladder.unlink(&mut self.arena, maker);
                }
            }

            self.ladder.settle(maker_side, level_price);
        }

        fills
    }

    /// Cancel a resting order
    ///
    /// Fails with `OrderNotFound` when the id is unknown to this book or the
    /// order is already filled or cancelled.
    pub fn cancel(&mut self, order_id: OrderId) -> Result<Order, EngineError> {
        let ix = self
            .arena
            .index_of(&order_id)
            .filter(|&ix| self.arena.order(ix).is_live())
            .ok_or(EngineError::OrderNotFound { order_id })?;

        self.ladder.remove(&mut self.arena, ix);
        let order = self.arena.order_mut(ix);
        order.cancel();

        debug!(
            asset = %self.asset,
            order_id = %order_id,
            remaining = %order.remaining_quantity,
            "Order cancelled"
        );
        Ok(order.clone())
    }

    /// Aggregate resting quantity by price on one side
    pub fn query_active(&self, side: Side, price_limit: Price) -> BTreeMap<Price, Quantity> {
        self.ladder.aggregate(side, price_limit)
    }

    pub fn depth(&self) -> BookDepth {
        BookDepth {
            asset: self.asset.clone(),
            min_price: self.min_price(),
            max_price: self.max_price(),
            best_bid: self.ladder.best_bid(),
            best_ask: self.ladder.best_ask(),
            buy_depth: self.ladder.depth(Side::Buy),
            sell_depth: self.ladder.depth(Side::Sell),
        }
    }
}
