use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::MediaError;
use crate::staging::StagedImage;

/// Where uploaded image bytes end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageStrategy {
    /// Embedded in the returned reference as a base64 data URI.
    Inline,
    /// Written under the public directory and served as a static file.
    Disk,
    /// Uploaded to Cloudinary.
    Cloudinary,
}

impl StorageStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inline => "inline",
            Self::Disk => "disk",
            Self::Cloudinary => "cloudinary",
        }
    }
}

impl fmt::Display for StorageStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageStrategy {
    type Err = MediaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inline" | "base64" => Ok(Self::Inline),
            "disk" | "local" => Ok(Self::Disk),
            "cloudinary" => Ok(Self::Cloudinary),
            other => Err(MediaError::Configuration(format!(
                "unknown upload strategy: {other}"
            ))),
        }
    }
}

/// The reference returned to the client after a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredImage {
    /// Data URI, site-relative path, or absolute URL.
    pub url: String,
}

/// A storage strategy for uploaded images.
///
/// The staged temp file stays owned by the caller; implementations only read
/// it.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Which strategy this store implements.
    fn strategy(&self) -> StorageStrategy;

    /// Persist the staged image and return its public reference.
    async fn store(&self, image: &StagedImage) -> Result<StoredImage, MediaError>;
}
