//! Error types for the matching engine
//!
//! Every rejection is a typed result returned to the caller; bad input never
//! takes the process down.

use crate::ids::{AssetSymbol, OrderId, UserId};
use crate::numeric::{Price, Quantity};
use thiserror::Error;

/// Top-level engine error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("User must be registered prior to placing an order: {user}")]
    UnauthorizedUser { user: UserId },

    #[error("Order book does not exist: {asset}")]
    UnknownAsset { asset: AssetSymbol },

    #[error("Order book already exists: {asset}")]
    DuplicateAsset { asset: AssetSymbol },

    #[error("Order not found: {order_id}")]
    OrderNotFound { order_id: OrderId },
}

/// Malformed price, quantity or range
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid price range [{min}, {max}]: bounds must be non-negative with min < max inside the ladder width limit")]
    InvalidRange { min: Price, max: Price },

    #[error("Price {price} is out of bounds [{min}, {max}]")]
    PriceOutOfBounds { price: Price, min: Price, max: Price },

    #[error("Quantity must be greater than zero")]
    ZeroQuantity,

    #[error("Quantity {quantity} would overflow the {resting} already resting on that side")]
    QuantityOverflow { quantity: Quantity, resting: Quantity },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::PriceOutOfBounds {
            price: Price::new(250),
            min: Price::new(100),
            max: Price::new(200),
        };
        assert_eq!(err.to_string(), "Price 250 is out of bounds [100, 200]");
    }

    #[test]
    fn test_engine_error_from_validation_error() {
        let engine_err: EngineError = ValidationError::ZeroQuantity.into();
        assert!(matches!(engine_err, EngineError::Validation(_)));
    }

    #[test]
    fn test_quantity_overflow_display() {
        let err = ValidationError::QuantityOverflow {
            quantity: Quantity::new(1),
            resting: Quantity::new(u64::MAX),
        };
        assert!(err.to_string().starts_with("Quantity 1 would overflow"));
    }

    #[test]
    fn test_order_not_found_display() {
        let err = EngineError::OrderNotFound { order_id: OrderId::new(9) };
        assert!(err.to_string().contains('9'));
    }
}
