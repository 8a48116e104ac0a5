//! Crossing rules
//!
//! A bid and an ask cross when the bid is at or above the ask. An incoming
//! order trades against the opposite side's best level only while that level
//! is within the incoming order's limit.

use types::numeric::Price;
use types::order::Side;

/// Whether a bid and an ask overlap
pub fn crosses(bid: Price, ask: Price) -> bool {
    bid >= ask
}

/// Level an incoming order should trade against next
///
/// `opposite_best` is the best price on the other side of the book. Returns
/// None when that side is empty or its best price is beyond `limit`.
pub fn tradable_level(side: Side, limit: Price, opposite_best: Option<Price>) -> Option<Price> {
    opposite_best.filter(|&resting| match side {
        Side::Buy => crosses(limit, resting),
        Side::Sell => crosses(resting, limit),
    })
}
