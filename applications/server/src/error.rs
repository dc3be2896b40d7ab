/// Server error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use devhub_core::{FieldErrors, HubError};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    /// Request body failed validation (400, field-keyed)
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Resource missing (404, field-keyed)
    #[error("Not found: {0}")]
    NotFound(FieldErrors),

    /// Caller may not touch the resource (403, field-keyed)
    #[error("Forbidden: {0}")]
    Forbidden(FieldErrors),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Authorization failed: {0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(HubError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

impl ServerError {
    pub fn validation(field: &str, message: &str) -> Self {
        Self::Validation(FieldErrors::single(field, message))
    }

    pub fn not_found(field: &str, message: &str) -> Self {
        Self::NotFound(FieldErrors::single(field, message))
    }

    pub fn forbidden(field: &str, message: &str) -> Self {
        Self::Forbidden(FieldErrors::single(field, message))
    }
}

impl From<FieldErrors> for ServerError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<HubError> for ServerError {
    /// Conflicts and misses become client errors; everything else stays internal.
    fn from(err: HubError) -> Self {
        match err {
            HubError::Validation(errors) => Self::Validation(errors),
            HubError::Conflict { entity, field } => {
                Self::Validation(FieldErrors::single(&field, conflict_message(&entity, &field)))
            }
            HubError::NotFound { entity, .. } => Self::NotFound(FieldErrors::single(
                entity.to_lowercase(),
                format!("{} not found", entity),
            )),
            other => Self::Database(other),
        }
    }
}

impl From<devhub_storage::StorageError> for ServerError {
    fn from(err: devhub_storage::StorageError) -> Self {
        HubError::from(err).into()
    }
}

fn conflict_message(entity: &str, field: &str) -> String {
    match (entity, field) {
        ("User", "email") => "Email already exists".to_string(),
        ("Profile", "handle") => "That handle already exists".to_string(),
        ("Profile", "user") => "Profile already exists for this user".to_string(),
        _ => format!("{} with this {} already exists", entity, field),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ServerError::Validation(errors) => {
                return (StatusCode::BAD_REQUEST, Json(errors)).into_response()
            }
            ServerError::NotFound(errors) => {
                return (StatusCode::NOT_FOUND, Json(errors)).into_response()
            }
            ServerError::Forbidden(errors) => {
                return (StatusCode::FORBIDDEN, Json(errors)).into_response()
            }
            ServerError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg),
            ServerError::Unauthorized(msg) => (StatusCode::FORBIDDEN, msg),
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ServerError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            ServerError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Configuration error".to_string(),
                )
            }
            ServerError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ServerError::Io(ref e) => {
                tracing::error!("IO error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "IO error".to_string())
            }
            ServerError::Jwt(ref e) => {
                tracing::warn!("JWT error: {:?}", e);
                (StatusCode::UNAUTHORIZED, "Invalid token".to_string())
            }
            ServerError::Bcrypt(ref e) => {
                tracing::error!("Bcrypt error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Password error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
