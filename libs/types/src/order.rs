//! Order lifecycle types
//!
//! An order moves Active → PartiallyFilled → Filled as it matches, or to
//! Cancelled when withdrawn. Filled and Cancelled are terminal.

use crate::ids::{AssetSymbol, OrderId, UserId};
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy order (bid)
    Buy,
    /// Sell order (ask)
    Sell,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a direction string is neither "buy" nor "sell"
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown side: {0}")]
pub struct ParseSideError(pub String);

impl FromStr for Side {
    type Err = ParseSideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            other => Err(ParseSideError(other.to_string())),
        }
    }
}

/// How the order was priced at submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    /// Rests at its limit price if not fully matched
    Limit,
    /// Priced at the book's extreme bound; never rests
    Market,
}

/// Order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Accepted, nothing matched yet
    Active,
    /// Partially matched
    PartiallyFilled,
    /// Completely matched (terminal)
    Filled,
    /// Withdrawn, or a market remainder that found no liquidity (terminal)
    Cancelled,
}

impl OrderStatus {
    /// Check if status is terminal (no further transitions possible)
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Filled | OrderStatus::Cancelled)
    }
}

/// An order as held by its book's arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub user: UserId,
    pub asset: AssetSymbol,
    pub side: Side,
    pub kind: OrderKind,
    /// Limit price, or the implicit extreme bound for market orders
    pub price: Price,
    pub quantity: Quantity,
    pub remaining_quantity: Quantity,
    /// Arrival sequence within the book; FIFO tie-break
    pub sequence: u64,
    pub status: OrderStatus,
    pub created_at: i64, // Unix nanos
}

impl Order {
    /// Create a new active order
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        order_id: OrderId,
        user: UserId,
        asset: AssetSymbol,
        side: Side,
        kind: OrderKind,
        price: Price,
        quantity: Quantity,
        sequence: u64,
        timestamp: i64,
    ) -> Self {
        Self {
            order_id,
            user,
            asset,
            side,
            kind,
            price,
            quantity,
            remaining_quantity: quantity,
            sequence,
            status: OrderStatus::Active,
            created_at: timestamp,
        }
    }

    /// Quantity matched so far
    pub fn filled_quantity(&self) -> Quantity {
        self.quantity.saturating_sub(self.remaining_quantity)
    }

    /// Check quantity invariant: filled + remaining = total
    pub fn check_invariant(&self) -> bool {
        self.filled_quantity() + self.remaining_quantity == self.quantity
    }

    pub fn is_filled(&self) -> bool {
        self.remaining_quantity.is_zero()
    }

    /// Whether the order can still be matched or cancelled
    pub fn is_live(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Record a fill and adjust status
    ///
    /// # Panics
    /// Panics if the fill would exceed the remaining quantity
    pub fn add_fill(&mut self, fill_quantity: Quantity) {
        assert!(
            fill_quantity <= self.remaining_quantity,
            "Fill would exceed order quantity"
        );

        self.remaining_quantity -= fill_quantity;
        self.status = if self.is_filled() {
            OrderStatus::Filled
        } else {
            OrderStatus::PartiallyFilled
        };
    }

    /// Cancel the order, keeping its remaining quantity for the record
    ///
    /// # Panics
    /// Panics if order is already in terminal state
    pub fn cancel(&mut self) {
        assert!(!self.status.is_terminal(), "Cannot cancel terminal order");
        self.status = OrderStatus::Cancelled;
    }
}
