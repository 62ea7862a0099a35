//! Error handling for the device registry

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Message returned to clients for any storage failure
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing or malformed request input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Request conflicts with the current device state
    /// (duplicate serial number, already taken, not taken)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// No device with the requested serial number
    #[error("Not found: {0}")]
    NotFound(String),

    /// SQLx database error
    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

impl Error {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) | Error::Conflict(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Sqlx(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand back to the caller.
    /// Storage details stay in the server log.
    pub fn client_message(&self) -> String {
        match self {
            Error::Validation(msg) | Error::Conflict(msg) | Error::NotFound(msg) => msg.clone(),
            Error::Sqlx(_) => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Request failed");
        } else {
            tracing::warn!(status = %status, error = %self, "Request rejected");
        }

        let body = Json(json!({ "error": self.client_message() }));

        (status, body).into_response()
    }
}
