use crate::models::{ShutdownResponse, StatsResponse};
use crate::state::AppState;
use axum::{extract::State, Json};

/// `POST /shutdown`: stop taking work; the server drains and exits
pub async fn shutdown(State(state): State<AppState>) -> Json<ShutdownResponse> {
    state.begin_shutdown();
    Json(ShutdownResponse {
        status: "shutting_down".to_string(),
    })
}

/// `GET /stats`
pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        books: state.engine.books().symbols(),
        users: state.engine.users().len(),
        dispatch: state.dispatcher.stats(),
        dispatch_queued: state.dispatcher.queued(),
    })
}
