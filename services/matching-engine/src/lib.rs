//! Matching Engine Service
//!
//! Price-bounded order books with price-time priority matching.
//!
//! Each asset owns one [`book::OrderBook`] behind its own lock: a fixed
//! ladder of FIFO price levels between the book's bounds, backed by an arena
//! of order records. The [`MatchingEngine`] ties the books to the user
//! registry and publishes fills to a [`events::FillSink`].
//!
//! **Key Invariants:**
//! - Price-time priority strictly enforced
//! - Fills execute at the resting order's price
//! - A book is never left crossed after a submission returns
//! - Conservation of quantity

pub mod book;
pub mod engine;
pub mod events;
pub mod matching;
pub mod registry;

pub use book::{BookDepth, OrderBook, SubmitReport};
pub use engine::MatchingEngine;
pub use events::{FillCallback, FillNotice, FillSink, NullSink};
pub use registry::{OrderBookRegistry, UserRegistry};
