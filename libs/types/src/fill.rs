//! Match execution records
//!
//! A fill is one matched quantity between a resting (maker) order and an
//! incoming (taker) order. It always executes at the maker's price.

use crate::ids::{AssetSymbol, FillId, OrderId, UserId};
use crate::numeric::{Price, Quantity};
use crate::order::Side;
use serde::{Deserialize, Serialize};

/// Immutable record of a single match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub fill_id: FillId,
    pub sequence: u64, // Per-book generation sequence
    pub asset: AssetSymbol,

    // Order references
    pub taker_order_id: OrderId,
    pub maker_order_id: OrderId,

    // Owners
    pub taker_user: UserId,
    pub maker_user: UserId,

    // Match details (side from taker perspective)
    pub taker_side: Side,
    pub price: Price,
    pub quantity: Quantity,

    // Remaining quantity of each order right after this fill
    pub taker_remaining: Quantity,
    pub maker_remaining: Quantity,

    pub executed_at: i64, // Unix nanos
}

impl Fill {
    /// Create a new fill
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sequence: u64,
        asset: AssetSymbol,
        taker_order_id: OrderId,
        maker_order_id: OrderId,
        taker_user: UserId,
        maker_user: UserId,
        taker_side: Side,
        price: Price,
        quantity: Quantity,
        taker_remaining: Quantity,
        maker_remaining: Quantity,
        executed_at: i64,
    ) -> Self {
        Self {
            fill_id: FillId::new(),
            sequence,
            asset,
            taker_order_id,
            maker_order_id,
            taker_user,
            maker_user,
            taker_side,
            price,
            quantity,
            taker_remaining,
            maker_remaining,
            executed_at,
        }
    }

    /// Side of the resting order
    pub fn maker_side(&self) -> Side {
        self.taker_side.opposite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_fill() -> Fill {
        Fill::new(
            1000,
            AssetSymbol::new("BTC"),
            OrderId::new(2),
            OrderId::new(1),
            UserId::new("taker"),
            UserId::new("maker"),
            Side::Buy,
            Price::new(160),
            Quantity::new(5),
            Quantity::new(3),
            Quantity::zero(),
            1708123456789000000,
        )
    }

    #[test]
    fn test_fill_creation() {
        let fill = sample_fill();
        assert_eq!(fill.sequence, 1000);
        assert_eq!(fill.maker_side(), Side::Sell);
        assert_eq!(fill.taker_remaining, Quantity::new(3));
        assert!(fill.maker_remaining.is_zero());
    }

    #[test]
    fn test_fill_serialization() {
        let fill = sample_fill();
        let json = serde_json::to_string(&fill).unwrap();
        let deserialized: Fill = serde_json::from_str(&json).unwrap();
        assert_eq!(fill, deserialized);
    }
}
