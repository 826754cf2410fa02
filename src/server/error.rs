use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Endpoint-level failures. Per-request fan-out failures are never surfaced
/// here; they live inside the report payload.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid RC_GO_COUNT header: {0}")]
    InvalidCount(String),
    #[error("Missing or empty RC_GO_URL header")]
    MissingUrl,
    #[error("Fan-out failed: {0}")]
    FanOut(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: u16,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidCount(_) | ApiError::MissingUrl => StatusCode::BAD_REQUEST,
            ApiError::FanOut(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = status.as_u16(), "{}", self);
        } else {
            tracing::warn!(code = status.as_u16(), "rejected request: {}", self);
        }

        let body = ErrorBody {
            error: self.to_string(),
            code: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}
