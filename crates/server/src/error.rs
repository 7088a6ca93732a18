use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use nodal_core::ValidationError;
use nodal_media::MediaError;
use nodal_store::StoreError;

/// Errors that can occur when running the Nodal server.
///
/// Every variant renders as a JSON body `{"error": ..., "details"?: ...}`.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// An I/O error (e.g. binding the listener).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The request was malformed or failed validation.
    #[error("{error}")]
    BadRequest {
        error: String,
        details: Option<String>,
    },

    /// The admin passcode did not match.
    #[error("{0}")]
    Unauthorized(String),

    /// The requested resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// An unexpected failure while handling a request.
    #[error("{error}")]
    Internal {
        error: String,
        details: Option<String>,
    },

    /// A blog store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServerError {
    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::BadRequest {
            error: error.into(),
            details: None,
        }
    }

    pub fn bad_request_with(error: impl Into<String>, details: impl ToString) -> Self {
        Self::BadRequest {
            error: error.into(),
            details: Some(details.to_string()),
        }
    }

    pub fn internal_with(error: impl Into<String>, details: impl ToString) -> Self {
        Self::Internal {
            error: error.into(),
            details: Some(details.to_string()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Config(_) | Self::Io(_) | Self::Internal { .. } | Self::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<ValidationError> for ServerError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::NotAnArray => Self::bad_request(err.to_string()),
            other => Self::bad_request_with("Invalid blog entry", other),
        }
    }
}

impl From<MediaError> for ServerError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::Empty | MediaError::TooLarge { .. } => {
                Self::bad_request_with("Failed to parse form data", err)
            }
            MediaError::InvalidContentType(_) => Self::bad_request("Only image files are allowed"),
            other => Self::internal_with("Failed to process image", other),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        let (message, details) = match self {
            Self::BadRequest { error, details } | Self::Internal { error, details } => {
                (error, details)
            }
            Self::Unauthorized(msg) | Self::NotFound(msg) | Self::Config(msg) => (msg, None),
            Self::Io(e) => (e.to_string(), None),
            Self::Store(e) => (e.to_string(), None),
        };

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %message, details = ?details, "request failed");
        }

        let body = match details {
            Some(details) => serde_json::json!({ "error": message, "details": details }),
            None => serde_json::json!({ "error": message }),
        };

        (status, axum::Json(body)).into_response()
    }
}
