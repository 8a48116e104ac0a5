use super::parse_side;
use crate::error::AppError;
use crate::models::{CancelResponse, OrderResponse};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use std::collections::BTreeMap;
use types::ids::{AssetSymbol, OrderId, UserId};
use types::numeric::{Price, Quantity};

/// `POST /limit/{user}/{side}/{asset}/{quantity}/{price}`
pub async fn submit_limit(
    State(state): State<AppState>,
    Path((user, direction, asset, quantity, price)): Path<(String, String, String, u64, i64)>,
) -> Result<Json<OrderResponse>, AppError> {
    state.ensure_accepting()?;
    let side = parse_side(&direction)?;

    let report = state.engine.submit_limit(
        &UserId::new(user),
        side,
        &AssetSymbol::new(asset),
        Quantity::new(quantity),
        Price::new(price),
    )?;
    Ok(Json(report.into()))
}

/// `POST /market/{user}/{side}/{asset}/{quantity}`
pub async fn submit_market(
    State(state): State<AppState>,
    Path((user, direction, asset, quantity)): Path<(String, String, String, u64)>,
) -> Result<Json<OrderResponse>, AppError> {
    state.ensure_accepting()?;
    let side = parse_side(&direction)?;

    let report = state.engine.submit_market(
        &UserId::new(user),
        side,
        &AssetSymbol::new(asset),
        Quantity::new(quantity),
    )?;
    Ok(Json(report.into()))
}

/// `POST /cancel/{order_id}`
pub async fn cancel_order(
    State(state): State<AppState>,
    Path(order_id): Path<u64>,
) -> Result<Json<CancelResponse>, AppError> {
    state.ensure_accepting()?;
    let order = state.engine.cancel(OrderId::new(order_id))?;
    Ok(Json(order.into()))
}

/// `GET /orders/{side}/{asset}/{price}`
///
/// Resting quantity per price: bids at or above `price`, asks at or below it.
pub async fn active_orders(
    State(state): State<AppState>,
    Path((direction, asset, price)): Path<(String, String, i64)>,
) -> Result<Json<BTreeMap<Price, Quantity>>, AppError> {
    let side = parse_side(&direction)?;
    let levels = state
        .engine
        .query_active(side, &AssetSymbol::new(asset), Price::new(price))?;
    Ok(Json(levels))
}
