use thiserror::Error;

/// Errors that can occur while staging or storing an uploaded image.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The uploaded part contained no bytes.
    #[error("uploaded file is empty")]
    Empty,

    /// The uploaded part exceeds the maximum allowed size.
    #[error("file is larger than the maximum of {limit} bytes")]
    TooLarge {
        /// Maximum allowed size.
        limit: u64,
    },

    /// The content type is not an image type.
    #[error("invalid content type: {0}")]
    InvalidContentType(String),

    /// Reading or writing a local file failed.
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The remote image host rejected the upload or could not be reached.
    #[error("remote storage error: {0}")]
    Remote(String),

    /// The strategy is missing required settings.
    #[error("storage configuration error: {0}")]
    Configuration(String),
}
