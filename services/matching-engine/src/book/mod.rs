//! Order book infrastructure module
//!
//! Contains the order arena, FIFO price levels, the bounded price ladder and
//! the per-asset order book that matches against them.

pub mod arena;
pub mod price_level;
pub mod ladder;
pub mod order_book;

pub use arena::{ArenaIndex, OrderArena};
pub use price_level::PriceLevel;
pub use ladder::PriceLadder;
pub use order_book::{ladder_ticks, validate_range, BookDepth, MAX_LADDER_TICKS, OrderBook, SubmitReport};
