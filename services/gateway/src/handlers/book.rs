use crate::error::AppError;
use crate::models::BookResponse;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use matching_engine::BookDepth;
use types::ids::AssetSymbol;
use types::numeric::Price;

/// `POST /books/{asset}/{min}/{max}`
pub async fn create_book(
    State(state): State<AppState>,
    Path((asset, min_price, max_price)): Path<(String, i64, i64)>,
) -> Result<Json<BookResponse>, AppError> {
    state.ensure_accepting()?;

    let asset = AssetSymbol::new(asset);
    let (min_price, max_price) = (Price::new(min_price), Price::new(max_price));
    state.engine.create_book(asset.clone(), min_price, max_price)?;

    Ok(Json(BookResponse {
        asset,
        min_price,
        max_price,
    }))
}

/// `GET /books`
pub async fn list_books(State(state): State<AppState>) -> Json<Vec<AssetSymbol>> {
    Json(state.engine.books().symbols())
}

/// `GET /depth/{asset}`
pub async fn depth(State(state): State<AppState>, Path(asset): Path<String>) -> Result<Json<BookDepth>, AppError> {
    Ok(Json(state.engine.depth(&AssetSymbol::new(asset))?))
}
