//! API error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

/// Error returned by API handlers as `{"error": message}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    /// 400 with the given message.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// 500 for a failed upload. The cause is logged, not returned.
    pub fn process_failed(cause: impl std::fmt::Display) -> Self {
        error!("Error processing file: {}", cause);
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Failed to process file".to_string(),
        }
    }

    /// 500 for a failed listing. The cause is logged, not returned.
    pub fn list_failed(cause: impl std::fmt::Display) -> Self {
        error!("Error retrieving cards: {}", cause);
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Failed to retrieve cards".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
