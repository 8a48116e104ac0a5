//! Matching engine core
//!
//! Main coordinator: resolves the submitting user and the asset's book, runs
//! the book under its lock, and publishes the resulting fills.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;
use types::errors::EngineError;
use types::ids::{AssetSymbol, OrderId, UserId};
use types::numeric::{Price, Quantity};
use types::order::{Order, Side};

use crate::book::{BookDepth, OrderBook, SubmitReport};
use crate::events::{FillCallback, FillNotice, FillSink};
use crate::registry::{OrderBookRegistry, UserRegistry};

/// Main matching engine
pub struct MatchingEngine {
    users: UserRegistry,
    books: OrderBookRegistry,
    /// Which book holds each live order, so cancels need only the id
    locator: DashMap<OrderId, AssetSymbol>,
    next_order_id: AtomicU64,
    sink: Arc<dyn FillSink>,
}

impl MatchingEngine {
    /// Create an engine that publishes fill notices to `sink`
    pub fn new(sink: Arc<dyn FillSink>) -> Self {
        Self {
            users: UserRegistry::new(),
            books: OrderBookRegistry::new(),
            locator: DashMap::new(),
            next_order_id: AtomicU64::new(0),
            sink,
        }
    }

    pub fn users(&self) -> &UserRegistry {
        &self.users
    }

    pub fn books(&self) -> &OrderBookRegistry {
        &self.books
    }

    /// Register a user or replace its callback target
    ///
    /// Returns whether the user was already registered.
    pub fn register_user(&self, user: UserId, target: Option<String>) -> bool {
        self.users.register(user, target)
    }

    /// Create the order book for a new asset
    pub fn create_book(&self, asset: AssetSymbol, min_price: Price, max_price: Price) -> Result<(), EngineError> {
        self.books.create(asset, min_price, max_price)
    }

    /// Submit a limit order
    pub fn submit_limit(
        &self,
        user: &UserId,
        side: Side,
        asset: &AssetSymbol,
        quantity: Quantity,
        price: Price,
    ) -> Result<SubmitReport, EngineError> {
        self.users.require_registered(user)?;
        let shared = self.books.lookup(asset)?;
        let mut book = shared.lock();

        book.validate_limit(side, quantity, price)?;
        let order_id = self.allocate_order_id();
        let report = book.submit_limit(order_id, user.clone(), side, quantity, price, types::now_nanos())?;

        self.settle(asset, &report);
        Ok(report)
    }

    /// Submit a market order
    ///
    /// Any quantity the opposite side cannot absorb is discarded and reported
    /// in `remaining`.
    pub fn submit_market(
        &self,
        user: &UserId,
        side: Side,
        asset: &AssetSymbol,
        quantity: Quantity,
    ) -> Result<SubmitReport, EngineError> {
        self.users.require_registered(user)?;
        let shared = self.books.lookup(asset)?;
        let mut book = shared.lock();

        book.validate_market(quantity)?;
        let order_id = self.allocate_order_id();
        let report = book.submit_market(order_id, user.clone(), side, quantity, types::now_nanos())?;

        self.settle(asset, &report);
        Ok(report)
    }

    /// Cancel a resting order
    ///
    /// Returns the order as it stood when cancelled. Unknown, filled and
    /// already cancelled orders fail with `OrderNotFound`.
    pub fn cancel(&self, order_id: OrderId) -> Result<Order, EngineError> {
        let asset = self
            .locator
            .get(&order_id)
            .map(|entry| entry.value().clone())
            .ok_or(EngineError::OrderNotFound { order_id })?;

        let shared = self.books.lookup(&asset)?;
        let cancelled = shared.lock().cancel(order_id);
        self.locator.remove(&order_id);
        cancelled
    }

    /// Aggregate resting quantity by price on one side of an asset's book
    pub fn query_active(
        &self,
        side: Side,
        asset: &AssetSymbol,
        price_limit: Price,
    ) -> Result<BTreeMap<Price, Quantity>, EngineError> {
        self.with_book(asset, |book| book.query_active(side, price_limit))
    }

    /// Best prices and total resting quantity of an asset's book
    pub fn depth(&self, asset: &AssetSymbol) -> Result<BookDepth, EngineError> {
        self.with_book(asset, OrderBook::depth)
    }

    /// Run a read-only closure against an asset's book under its lock
    pub fn with_book<R>(&self, asset: &AssetSymbol, f: impl FnOnce(&OrderBook) -> R) -> Result<R, EngineError> {
        let shared = self.books.lookup(asset)?;
        let book = shared.lock();
        Ok(f(&book))
    }

    fn allocate_order_id(&self) -> OrderId {
        OrderId::new(self.next_order_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Book-keeping after a submission, still under the book lock
    fn settle(&self, asset: &AssetSymbol, report: &SubmitReport) {
        if !report.status.is_terminal() {
            self.locator.insert(report.order_id, asset.clone());
        }
        for fill in &report.fills {
            if fill.maker_remaining.is_zero() {
                self.locator.remove(&fill.maker_order_id);
            }
        }
        self.publish(report);
    }

    /// Address one notice per party per fill and hand them to the sink
    ///
    /// The taker's notice for the last fill reports the order's final status,
    /// so a market order whose remainder was discarded ends on `cancelled`.
    fn publish(&self, report: &SubmitReport) {
        let Some(last) = report.fills.len().checked_sub(1) else {
            return;
        };

        let mut notices = Vec::with_capacity(report.fills.len() * 2);
        for (i, fill) in report.fills.iter().enumerate() {
            let mut taker = FillCallback::for_taker(fill);
            if i == last {
                taker = taker.with_status(report.status);
            }
            for payload in [taker, FillCallback::for_maker(fill)] {
                match self.users.target(&payload.user) {
                    Some(target) => notices.push(FillNotice { target, payload }),
                    None => debug!(user = %payload.user, fill_id = %fill.fill_id, "No callback target, skipping notice"),
                }
            }
        }

        if !notices.is_empty() {
            self.sink.publish(notices);
        }
    }
}
