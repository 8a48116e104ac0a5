pub mod admin;
pub mod book;
pub mod order;
pub mod user;

use crate::error::AppError;
use types::order::Side;

/// Parse a `buy`/`sell` path segment; anything else is treated as an unknown route
pub(crate) fn parse_side(direction: &str) -> Result<Side, AppError> {
    direction
        .parse()
        .map_err(|_| AppError::NotFound(format!("unknown direction `{direction}`")))
}
