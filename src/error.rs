use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use savor_emissions::EmissionsError;
use thiserror::Error;

/// API error types with JSON responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<EmissionsError> for ApiError {
    fn from(err: EmissionsError) -> Self {
        match err {
            EmissionsError::InvalidInput(msg) => ApiError::InvalidInput(msg),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidInput(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, error, message) = match self {
            ApiError::InvalidInput(msg) => {
                tracing::debug!("Rejected request: {}", msg);
                (StatusCode::BAD_REQUEST, "InvalidInput", msg)
            }
        };

        let body = serde_json::json!({
            "error": error,
            "message": message,
        });

        (status_code, Json(body)).into_response()
    }
}
