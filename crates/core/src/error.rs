use thiserror::Error;

/// Reasons a bulk-replace payload is rejected before anything is written.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Blogs must be an array")]
    NotAnArray,

    #[error("blogs[{index}]: Title is required")]
    MissingTitle { index: usize },

    #[error("blogs[{index}]: {message}")]
    MalformedEntry { index: usize, message: String },
}
