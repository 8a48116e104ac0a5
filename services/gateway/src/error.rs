use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use types::errors::{EngineError, ValidationError};

/// Central error type for the Gateway application
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Engine(err) => match err {
                EngineError::Validation(ValidationError::InvalidRange { .. }) => {
                    (StatusCode::BAD_REQUEST, "INVALID_RANGE")
                }
                EngineError::Validation(ValidationError::PriceOutOfBounds { .. }) => {
                    (StatusCode::BAD_REQUEST, "PRICE_OUT_OF_BOUNDS")
                }
                EngineError::Validation(ValidationError::ZeroQuantity) => {
                    (StatusCode::BAD_REQUEST, "ZERO_QUANTITY")
                }
                EngineError::Validation(ValidationError::QuantityOverflow { .. }) => {
                    (StatusCode::BAD_REQUEST, "QUANTITY_OVERFLOW")
                }
                EngineError::UnauthorizedUser { .. } => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED_USER"),
                EngineError::UnknownAsset { .. } => (StatusCode::NOT_FOUND, "UNKNOWN_ASSET"),
                EngineError::OrderNotFound { .. } => (StatusCode::NOT_FOUND, "ORDER_NOT_FOUND"),
                EngineError::DuplicateAsset { .. } => (StatusCode::CONFLICT, "DUPLICATE_ASSET"),
            },
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::ServiceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::warn!(error = %self, "Request refused");
        }

        let body = Json(json!({
            "error": code,
            "message": self.to_string()
        }));

        (status, body).into_response()
    }
}
