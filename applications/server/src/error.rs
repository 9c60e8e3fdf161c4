//! Server error types
use crate::validation::ValidationErrors;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Policy denial; the response body is always the same "Unauthorized"
    /// regardless of which rule failed
    #[error("Unauthorized")]
    Forbidden,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid input: {0}")]
    Validation(ValidationErrors),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

impl From<chorus_storage::StorageError> for ServerError {
    fn from(err: chorus_storage::StorageError) -> Self {
        match err {
            chorus_storage::StorageError::NotFound { entity, id } => {
                ServerError::NotFound(format!("{} {}", entity, id))
            }
            // A taken unique field is the caller's mistake, not a server
            // fault; surface it like any other field failure.
            chorus_storage::StorageError::Duplicate(field) => {
                let mut errors = ValidationErrors::new();
                errors.add(&field, format!("The {} has already been taken.", field));
                ServerError::Validation(errors)
            }
            other => ServerError::Storage(other.to_string()),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ServerError::Auth(msg) => (
                StatusCode::UNAUTHORIZED,
                json!({ "message": msg }),
            ),
            ServerError::Forbidden => (
                StatusCode::FORBIDDEN,
                json!({ "message": "Unauthorized" }),
            ),
            ServerError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                json!({ "message": msg }),
            ),
            ServerError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "message": msg }),
            ),
            ServerError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "message": "The given data was invalid.",
                    "errors": errors,
                }),
            ),
            ServerError::Storage(ref msg) => {
                tracing::error!("Storage error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Storage error" }),
                )
            }
            ServerError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Internal server error" }),
                )
            }
            ServerError::Io(ref e) => {
                tracing::error!("IO error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "IO error" }),
                )
            }
            ServerError::Jwt(ref e) => {
                tracing::warn!("JWT error: {:?}", e);
                (
                    StatusCode::UNAUTHORIZED,
                    json!({ "message": "Invalid token" }),
                )
            }
            ServerError::Bcrypt(ref e) => {
                tracing::error!("Bcrypt error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Password error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
