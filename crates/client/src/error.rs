use thiserror::Error;

/// Errors returned by [`NodalClient`](crate::NodalClient).
#[derive(Debug, Error)]
pub enum Error {
    /// The request never got a response (refused, timed out, TLS failure).
    #[error("connection error: {0}")]
    Connection(String),

    /// The server answered with a non-success status and an error body.
    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        details: Option<String>,
    },

    /// The server answered with a non-success status and no readable body.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// A success response could not be decoded.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// The client could not be built or a URL could not be formed.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// HTTP status of the failed response, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether retrying the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Connection(_) => true,
            Self::Api { status, .. } | Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
