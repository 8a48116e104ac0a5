use crate::handlers::{admin, book, order, user};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/user/{user}", post(user::register))
        .route("/user/{user}/{*callback}", post(user::register_with_callback))
        .route("/books", get(book::list_books))
        .route("/books/{asset}/{min}/{max}", post(book::create_book))
        .route("/depth/{asset}", get(book::depth))
        .route("/limit/{user}/{side}/{asset}/{quantity}/{price}", post(order::submit_limit))
        .route("/market/{user}/{side}/{asset}/{quantity}", post(order::submit_market))
        .route("/orders/{side}/{asset}/{price}", get(order::active_orders))
        .route("/cancel/{order_id}", post(order::cancel_order))
        .route("/stats", get(admin::stats))
        .route("/shutdown", post(admin::shutdown))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
