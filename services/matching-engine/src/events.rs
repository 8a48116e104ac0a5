//! Fill notification events
//!
//! The engine turns each fill into one callback payload per involved party
//! and hands them, already addressed, to a [`FillSink`]. Delivery itself
//! happens outside the engine.

use serde::{Deserialize, Serialize};
use types::fill::Fill;
use types::ids::{AssetSymbol, FillId, OrderId, UserId};
use types::numeric::{Price, Quantity};
use types::order::{OrderStatus, Side};

/// Version of the callback wire contract
pub const CALLBACK_SCHEMA_VERSION: u32 = 1;

/// Body posted to a user's callback target for one fill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillCallback {
    pub schema_version: u32,
    pub fill_id: FillId,
    pub sequence: u64,
    /// The receiving user's order
    pub order_id: OrderId,
    pub user: UserId,
    pub counterparty: UserId,
    pub asset: AssetSymbol,
    pub side: Side,
    pub quantity: Quantity,
    pub price: Price,
    /// Unfilled quantity of `order_id` after this fill
    pub remaining: Quantity,
    /// `filled` or `partially_filled` after this fill; the taker's last
    /// notice of a market order carries `cancelled` when its remainder was
    /// discarded
    pub status: OrderStatus,
}

impl FillCallback {
    /// Payload for the taker side of a fill
    pub fn for_taker(fill: &Fill) -> Self {
        Self::build(
            fill,
            fill.taker_order_id,
            &fill.taker_user,
            &fill.maker_user,
            fill.taker_side,
            fill.taker_remaining,
        )
    }

    /// Payload for the maker side of a fill
    pub fn for_maker(fill: &Fill) -> Self {
        Self::build(
            fill,
            fill.maker_order_id,
            &fill.maker_user,
            &fill.taker_user,
            fill.maker_side(),
            fill.maker_remaining,
        )
    }

    /// Replace the status with the order's terminal state
    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    fn build(
        fill: &Fill,
        order_id: OrderId,
        user: &UserId,
        counterparty: &UserId,
        side: Side,
        remaining: Quantity,
    ) -> Self {
        Self {
            schema_version: CALLBACK_SCHEMA_VERSION,
            fill_id: fill.fill_id,
            sequence: fill.sequence,
            order_id,
            user: user.clone(),
            counterparty: counterparty.clone(),
            asset: fill.asset.clone(),
            side,
            quantity: fill.quantity,
            price: fill.price,
            remaining,
            status: if remaining.is_zero() {
                OrderStatus::Filled
            } else {
                OrderStatus::PartiallyFilled
            },
        }
    }
}

/// A callback payload together with where it should be delivered
#[derive(Debug, Clone, PartialEq)]
pub struct FillNotice {
    pub target: String,
    pub payload: FillCallback,
}

/// Receiver of addressed fill notices
///
/// Called while the originating book is still locked, so implementations must
/// only enqueue. Notices arrive in fill generation order.
pub trait FillSink: Send + Sync {
    fn publish(&self, notices: Vec<FillNotice>);
}

/// Sink that discards every notice
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl FillSink for NullSink {
    fn publish(&self, _notices: Vec<FillNotice>) {}
}
