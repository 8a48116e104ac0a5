//! Fill generation
//!
//! Stamps every match with the book's next generation sequence number.

use types::fill::Fill;
use types::ids::AssetSymbol;
use types::numeric::{Price, Quantity};
use types::order::Order;

/// Fill executor with per-book sequence generation
#[derive(Debug)]
pub struct FillExecutor {
    sequence_counter: u64,
}

impl FillExecutor {
    /// Create a new executor with starting sequence number
    pub fn new(starting_sequence: u64) -> Self {
        Self {
            sequence_counter: starting_sequence,
        }
    }

    /// Get next sequence number (monotonically increasing)
    fn next_sequence(&mut self) -> u64 {
        let seq = self.sequence_counter;
        self.sequence_counter += 1;
        seq
    }

    /// Record a match between taker and maker
    ///
    /// Both orders must already reflect the fill; the record captures their
    /// remaining quantities after it. `price` is the maker's price.
    pub fn execute(
        &mut self,
        asset: &AssetSymbol,
        taker: &Order,
        maker: &Order,
        price: Price,
        quantity: Quantity,
        timestamp: i64,
    ) -> Fill {
        debug_assert_eq!(maker.price, price, "fills execute at the maker's price");

        Fill::new(
            self.next_sequence(),
            asset.clone(),
            taker.order_id,
            maker.order_id,
            taker.user.clone(),
            maker.user.clone(),
            taker.side,
            price,
            quantity,
            taker.remaining_quantity,
            maker.remaining_quantity,
            timestamp,
        )
    }
}
