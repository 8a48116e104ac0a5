//! Price ladder
//!
//! Fixed-size array of price levels spanning a book's `[min_price, max_price]`
//! bounds, one level per tick and side (index = price - min_price). The best
//! bid and best ask are tracked as cursors that only move when the level under
//! them empties or a better level is populated, so best-price access never
//! rescans the ladder.

use std::collections::BTreeMap;
use types::numeric::{Price, Quantity};
use types::order::Side;

use super::arena::{ArenaIndex, OrderArena};
use super::price_level::PriceLevel;
use crate::matching::crossing;

#[derive(Debug)]
pub struct PriceLadder {
    min_price: Price,
    max_price: Price,
    bids: Vec<PriceLevel>,
    asks: Vec<PriceLevel>,
    /// Highest price with a non-empty buy queue
    hi_bid: Option<Price>,
    /// Lowest price with a non-empty sell queue
    lo_ask: Option<Price>,
    bid_depth: Quantity,
    ask_depth: Quantity,
}

impl PriceLadder {
    /// Allocate a ladder for already validated bounds
    ///
    /// Returns `None` when `min >= max` or the span does not fit in memory
    /// indices; width limits are the caller's job.
    pub fn new(min_price: Price, max_price: Price) -> Option<Self> {
        if min_price >= max_price {
            return None;
        }
        let size = max_price
            .value()
            .checked_sub(min_price.value())
            .and_then(|span| span.checked_add(1))
            .and_then(|ticks| usize::try_from(ticks).ok())?;
        Some(Self {
            min_price,
            max_price,
            bids: vec![PriceLevel::new(); size],
            asks: vec![PriceLevel::new(); size],
            hi_bid: None,
            lo_ask: None,
            bid_depth: Quantity::zero(),
            ask_depth: Quantity::zero(),
        })
    }

    pub fn min_price(&self) -> Price {
        self.min_price
    }

    pub fn max_price(&self) -> Price {
        self.max_price
    }

    /// Whether a price lies within the ladder bounds
    pub fn contains(&self, price: Price) -> bool {
        price >= self.min_price && price <= self.max_price
    }

    pub fn best_bid(&self) -> Option<Price> {
        self.hi_bid
    }

    pub fn best_ask(&self) -> Option<Price> {
        self.lo_ask
    }

    /// Best price on the given side
    pub fn best(&self, side: Side) -> Option<Price> {
        match side {
            Side::Buy => self.hi_bid,
            Side::Sell => self.lo_ask,
        }
    }

    /// Total resting quantity on one side
    pub fn depth(&self, side: Side) -> Quantity {
        match side {
            Side::Buy => self.bid_depth,
            Side::Sell => self.ask_depth,
        }
    }

    /// Whether the best bid meets or exceeds the best ask
    pub fn is_crossed(&self) -> bool {
        matches!((self.hi_bid, self.lo_ask), (Some(bid), Some(ask)) if crossing::crosses(bid, ask))
    }

    fn slot(&self, price: Price) -> usize {
        debug_assert!(self.contains(price), "price {price} outside ladder");
        (price.value() - self.min_price.value()) as usize
    }

    fn price_at(&self, slot: usize) -> Price {
        Price::new(self.min_price.value() + slot as i64)
    }

    pub fn level(&self, side: Side, price: Price) -> &PriceLevel {
        let slot = self.slot(price);
        match side {
            Side::Buy => &self.bids[slot],
            Side::Sell => &self.asks[slot],
        }
    }

    fn level_mut(&mut self, side: Side, price: Price) -> &mut PriceLevel {
        let slot = self.slot(price);
        match side {
            Side::Buy => &mut self.bids[slot],
            Side::Sell => &mut self.asks[slot],
        }
    }

    fn depth_mut(&mut self, side: Side) -> &mut Quantity {
        match side {
            Side::Buy => &mut self.bid_depth,
            Side::Sell => &mut self.ask_depth,
        }
    }

    /// Queue an order at the tail of its own price level
    ///
    /// Raises the best-bid (or lowers the best-ask) cursor when the order
    /// improves on it. The side total must have room for the order's
    /// remaining quantity; `OrderBook::validate_limit` checks that up front.
    pub fn rest(&mut self, arena: &mut OrderArena, ix: ArenaIndex) {
        let (side, price, quantity) = {
            let order = arena.order(ix);
            (order.side, order.price, order.remaining_quantity)
        };

        self.level_mut(side, price).push_back(arena, ix);
        *self.depth_mut(side) += quantity;

        match side {
            Side::Buy => {
                if self.hi_bid.map_or(true, |best| price > best) {
                    self.hi_bid = Some(price);
                }
            }
            Side::Sell => {
                if self.lo_ask.map_or(true, |best| price < best) {
                    self.lo_ask = Some(price);
                }
            }
        }
    }

    /// Account for a partial or full fill of a resting order
    pub(crate) fn record_fill(&mut self, side: Side, price: Price, quantity: Quantity) {
        self.level_mut(side, price).reduce(quantity);
        let depth = self.depth_mut(side);
        *depth = depth.saturating_sub(quantity);
    }

    /// Unlink a resting order without moving the best-price cursors
    ///
    /// Used mid-sweep; the caller settles the level once it is done with it.
    pub(crate) fn unlink(&mut self, arena: &mut OrderArena, ix: ArenaIndex) -> Option<Quantity> {
        let (side, price) = {
            let order = arena.order(ix);
            (order.side, order.price)
        };

        let removed = self.level_mut(side, price).unlink(arena, ix)?;
        let depth = self.depth_mut(side);
        *depth = depth.saturating_sub(removed);
        Some(removed)
    }

    /// Remove a resting order and advance the cursor past its level if the
    /// level emptied
    pub fn remove(&mut self, arena: &mut OrderArena, ix: ArenaIndex) -> Option<Quantity> {
        let (side, price) = {
            let order = arena.order(ix);
            (order.side, order.price)
        };

        let removed = self.unlink(arena, ix)?;
        self.settle(side, price);
        Some(removed)
    }

    /// Move the cursor of `side` off `price` if that level is now empty
    pub(crate) fn settle(&mut self, side: Side, price: Price) {
        if !self.level(side, price).is_empty() || self.best(side) != Some(price) {
            return;
        }

        let slot = self.slot(price);
        match side {
            Side::Buy => {
                self.hi_bid = (0..slot)
                    .rev()
                    .find(|&s| !self.bids[s].is_empty())
                    .map(|s| self.price_at(s));
            }
            Side::Sell => {
                self.lo_ask = (slot + 1..self.asks.len())
                    .find(|&s| !self.asks[s].is_empty())
                    .map(|s| self.price_at(s));
            }
        }
    }

    /// Aggregate resting quantity per non-empty level
    ///
    /// Buy side covers `[max(price_limit, min_price), hi_bid]`; sell side covers
    /// `[lo_ask, min(price_limit, max_price)]`.
    pub fn aggregate(&self, side: Side, price_limit: Price) -> BTreeMap<Price, Quantity> {
        let (low, high, levels) = match side {
            Side::Buy => match self.hi_bid {
                Some(best) => (price_limit.max(self.min_price), best, &self.bids),
                None => return BTreeMap::new(),
            },
            Side::Sell => match self.lo_ask {
                Some(best) => (best, price_limit.min(self.max_price), &self.asks),
                None => return BTreeMap::new(),
            },
        };

        if low > high {
            return BTreeMap::new();
        }

        (self.slot(low)..=self.slot(high))
            .filter(|&s| !levels[s].is_empty())
            .map(|s| (self.price_at(s), levels[s].total_quantity()))
            .collect()
    }
}
