use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use nodal_media::StorageStrategy;

/// Image upload configuration.
///
/// # Example
///
/// ```toml
/// [uploads]
/// strategy = "cloudinary"
///
/// [uploads.cloudinary]
/// cloud_name = "nodal"
/// api_key = "1234"
/// api_secret = "..."
/// folder = "blog"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct UploadsConfig {
    /// Explicit strategy. When unset, Cloudinary is used if its credentials
    /// are complete and the local disk otherwise.
    pub strategy: Option<StorageStrategy>,
    /// Directory for staged uploads. Defaults to the system temp directory.
    pub temp_dir: Option<String>,
    /// Cloudinary credentials.
    #[serde(default)]
    pub cloudinary: CloudinarySettings,
}

impl UploadsConfig {
    /// The strategy the server will run with.
    pub fn resolved_strategy(&self) -> StorageStrategy {
        self.strategy.unwrap_or(if self.cloudinary.is_complete() {
            StorageStrategy::Cloudinary
        } else {
            StorageStrategy::Disk
        })
    }

    pub fn temp_dir(&self) -> PathBuf {
        self.temp_dir
            .as_ref()
            .map_or_else(std::env::temp_dir, PathBuf::from)
    }
}

/// Cloudinary account settings.
#[derive(Debug, Deserialize)]
pub struct CloudinarySettings {
    pub cloud_name: Option<String>,
    pub api_key: Option<String>,
    /// Wrapped in [`SecretString`] so it is redacted in logs.
    pub api_secret: Option<SecretString>,
    /// Destination folder inside the account.
    pub folder: Option<String>,
    /// Override for the upload API host.
    pub api_base_url: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_cloudinary_timeout")]
    pub timeout_seconds: u64,
}

impl Default for CloudinarySettings {
    fn default() -> Self {
        Self {
            cloud_name: None,
            api_key: None,
            api_secret: None,
            folder: None,
            api_base_url: None,
            timeout_seconds: default_cloudinary_timeout(),
        }
    }
}

impl CloudinarySettings {
    /// Whether cloud name, key and secret are all present and non-empty.
    pub fn is_complete(&self) -> bool {
        let present = |v: Option<&str>| v.is_some_and(|s| !s.trim().is_empty());
        present(self.cloud_name.as_deref())
            && present(self.api_key.as_deref())
            && present(self.api_secret.as_ref().map(|s| s.expose_secret().as_str()))
    }
}

fn default_cloudinary_timeout() -> u64 {
    60
}
