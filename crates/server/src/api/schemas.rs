use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status indicator.
    #[schema(example = "ok")]
    pub status: String,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message.
    #[schema(example = "Blog not found")]
    pub error: String,
    /// Underlying cause, when there is one worth showing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Body of `POST /blogs`.
///
/// Both fields are kept loosely typed so that a wrong type produces the
/// endpoint's own error messages rather than a generic JSON rejection.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ReplaceBlogsRequest {
    /// The complete new collection, newest first.
    #[serde(default)]
    #[schema(value_type = Vec<nodal_core::BlogPostInput>)]
    pub blogs: serde_json::Value,
    /// Admin passcode, required when the server has one configured.
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub passcode: Option<serde_json::Value>,
}

/// Successful upload response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    /// Data URI, site-relative path, or absolute URL of the stored image.
    #[schema(example = "/blog-images/1760745600000-3f2a9c1d4b5e.png")]
    pub url: String,
}

/// Multipart form accepted by `POST /upload-image`.
#[derive(Debug, ToSchema)]
pub struct UploadForm {
    /// The image file. `file` is accepted as an alternative field name.
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}
