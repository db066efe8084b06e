use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use profile_service::ServiceError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),
    #[error("Auth error: {0}")]
    Auth(#[from] auth::AuthError),
    #[error("Missing or malformed bearer credential.")]
    Unauthorized,
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Converts our custom `AppError` into an HTTP response.
///
/// Validation failures carry their reason to the client; storage failures
/// are logged and surface only as a generic message.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Service(ServiceError::InvalidArgument(reason)) => {
                (StatusCode::BAD_REQUEST, reason)
            }
            AppError::Service(ServiceError::Database(db_err)) => {
                tracing::error!(error = ?db_err, "Database error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal database error occurred".to_string(),
                )
            }
            AppError::Auth(_) | AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "A valid bearer token is required".to_string(),
            ),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
        };

        let body = Json(json!({ "message": error_message }));
        (status, body).into_response()
    }
}
