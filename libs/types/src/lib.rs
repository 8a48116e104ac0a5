//! Types library for the matching engine
//!
//! This library provides the core type definitions shared by the matching
//! engine and the gateway in front of it.
//!
//! # Modules
//! - `ids`: Identifiers (OrderId, FillId, UserId, AssetSymbol)
//! - `numeric`: Integer tick types (Price, Quantity)
//! - `order`: Order lifecycle types
//! - `fill`: Match execution records
//! - `errors`: Error taxonomy

pub mod ids;
pub mod numeric;
pub mod order;
pub mod fill;
pub mod errors;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::order::*;
    pub use crate::fill::*;
    pub use crate::errors::*;
}

/// Current wall-clock time as Unix nanos
///
/// Saturates to 0 outside the range representable in an `i64`.
pub fn now_nanos() -> i64 {
    chrono::Utc::now().timestamp_nanos_opt().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_nanos_is_monotonic_enough() {
        let first = now_nanos();
        let second = now_nanos();
        assert!(first > 0);
        assert!(second >= first);
    }
}
