//! Matching logic module
//!
//! Implements price-time priority crossing and fill generation

pub mod crossing;
pub mod executor;

pub use crossing::{crosses, tradable_level};
pub use executor::FillExecutor;
