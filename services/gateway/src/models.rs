use crate::dispatcher::DispatchStats;
use matching_engine::SubmitReport;
use serde::{Deserialize, Serialize};
use types::fill::Fill;
use types::ids::{AssetSymbol, FillId, OrderId, UserId};
use types::numeric::{Price, Quantity};
use types::order::{Order, OrderStatus, Side};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user: UserId,
    pub already_registered: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookResponse {
    pub asset: AssetSymbol,
    pub min_price: Price,
    pub max_price: Price,
}

/// One execution as seen by the submitting order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillView {
    pub fill_id: FillId,
    pub maker_order_id: OrderId,
    pub price: Price,
    pub quantity: Quantity,
}

impl From<&Fill> for FillView {
    fn from(fill: &Fill) -> Self {
        Self {
            fill_id: fill.fill_id,
            maker_order_id: fill.maker_order_id,
            price: fill.price,
            quantity: fill.quantity,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub filled: Quantity,
    /// Resting for limit orders; discarded for market orders
    pub remaining: Quantity,
    pub fills: Vec<FillView>,
}

impl From<SubmitReport> for OrderResponse {
    fn from(report: SubmitReport) -> Self {
        Self {
            order_id: report.order_id,
            status: report.status,
            filled: report.filled_quantity(),
            remaining: report.remaining,
            fills: report.fills.iter().map(FillView::from).collect(),
        }
    }
}

/// Snapshot of a cancelled order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelResponse {
    pub order_id: OrderId,
    pub direction: Side,
    pub asset: AssetSymbol,
    pub user_id: UserId,
    pub price: Price,
    pub quantity: Quantity,
    /// Unfilled quantity removed from the book
    pub cancelled: Quantity,
}

impl From<Order> for CancelResponse {
    fn from(order: Order) -> Self {
        Self {
            order_id: order.order_id,
            direction: order.side,
            asset: order.asset,
            user_id: order.user,
            price: order.price,
            quantity: order.quantity,
            cancelled: order.remaining_quantity,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShutdownResponse {
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub books: Vec<AssetSymbol>,
    pub users: usize,
    pub dispatch: DispatchStats,
    pub dispatch_queued: usize,
}
