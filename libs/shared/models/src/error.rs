use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Whether the process runs with `APP_ENV=production`; server-error detail
/// is suppressed there.
fn is_production() -> bool {
    std::env::var("APP_ENV")
        .map(|env| env == "production")
        .unwrap_or(false)
}

/// Application-level error taxonomy. Every variant maps 1:1 to a response
/// envelope so clients can tell "can't" from "didn't fill the form out".
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Validation failed on {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Date is in the past: {0}")]
    PastDate(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),

    #[error("External service error: {0}")]
    ExternalService(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Unauthenticated(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Validation { field, reason } => (
                StatusCode::BAD_REQUEST,
                format!("Invalid {}: {}", field, reason),
            ),
            AppError::PastDate(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Database(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            AppError::ExternalService(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
        };

        tracing::error!("Error: {}: {}", status, message);

        // Storage detail stays out of production responses.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR && is_production() {
            "Internal server error".to_string()
        } else {
            message
        };

        let mut body = json!({
            "success": false,
            "message": message,
        });

        if let AppError::Validation { field, reason } = &self {
            body["errors"] = json!({ field: reason });
        }

        (status, Json(body)).into_response()
    }
}
