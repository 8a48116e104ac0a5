use crate::models::RegisterResponse;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use types::ids::UserId;

/// `POST /user/{user}`: register without a callback target
pub async fn register(State(state): State<AppState>, Path(user): Path<String>) -> Json<RegisterResponse> {
    register_user(&state, user, None)
}

/// `POST /user/{user}/{*callback}`: register or replace the callback target
///
/// The callback is the rest of the path, e.g. `/user/alice/http://host:9000/fills`.
pub async fn register_with_callback(
    State(state): State<AppState>,
    Path((user, callback)): Path<(String, String)>,
) -> Json<RegisterResponse> {
    register_user(&state, user, Some(callback))
}

fn register_user(state: &AppState, user: String, callback: Option<String>) -> Json<RegisterResponse> {
    let user = UserId::new(user);
    let already_registered = state.engine.register_user(user.clone(), callback);
    Json(RegisterResponse {
        user,
        already_registered,
    })
}
