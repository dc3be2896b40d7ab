//! Error types for the DevHub client.

use devhub_core::FieldErrors;
use thiserror::Error;

/// Errors that can occur when talking to a DevHub server.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error response without a field-keyed body
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Authentication required but no token available
    #[error("Authentication required")]
    AuthRequired,

    /// The server rejected the stored token
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Request body was rejected (400)
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Requested resource does not exist (404)
    #[error("Not found: {0}")]
    NotFound(FieldErrors),

    /// Caller may not touch the resource (403)
    #[error("Forbidden: {0}")]
    Forbidden(FieldErrors),

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),
}

impl ClientError {
    /// The field-keyed mapping to show next to form inputs.
    ///
    /// Errors that did not come with a field-keyed body are reported under
    /// the `error` key.
    pub fn field_errors(&self) -> FieldErrors {
        match self {
            Self::Validation(errors) | Self::NotFound(errors) | Self::Forbidden(errors) => {
                errors.clone()
            }
            other => FieldErrors::single("error", other.to_string()),
        }
    }

    /// True for failures where no response from the server was received
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Request(_) | Self::ServerUnreachable(_))
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
