use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::error::MediaError;
use crate::staging::StagedImage;
use crate::store::{ImageStore, StorageStrategy, StoredImage};

const DEFAULT_API_BASE_URL: &str = "https://api.cloudinary.com";

/// Credentials and placement for Cloudinary uploads.
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    /// Redacted in `Debug` output.
    pub api_secret: SecretString,
    /// Target folder; uploads go to the account root when unset.
    pub folder: Option<String>,
    /// Defaults to `https://api.cloudinary.com`.
    pub api_base_url: Option<String>,
    pub timeout: Duration,
}

impl CloudinaryConfig {
    pub fn new(
        cloud_name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            cloud_name: cloud_name.into(),
            api_key: api_key.into(),
            api_secret: SecretString::new(api_secret.into()),
            folder: None,
            api_base_url: None,
            timeout: Duration::from_secs(60),
        }
    }

    fn upload_url(&self) -> String {
        let base = self
            .api_base_url
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE_URL)
            .trim_end_matches('/');
        format!("{base}/v1_1/{}/image/upload", self.cloud_name)
    }
}

impl fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("folder", &self.folder)
            .field("api_base_url", &self.api_base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Compute an upload signature: the sorted `key=value` pairs joined with
/// `&`, followed by the API secret, hashed with SHA-256.
pub(crate) fn sign(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by_key(|(k, _)| *k);
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Uploads images to Cloudinary with a signed request and returns the
/// `secure_url` of the stored asset.
#[derive(Debug)]
pub struct CloudinaryImageStore {
    config: CloudinaryConfig,
    client: reqwest::Client,
}

impl CloudinaryImageStore {
    pub fn new(config: CloudinaryConfig) -> Result<Self, MediaError> {
        for (name, value) in [
            ("cloud_name", &config.cloud_name),
            ("api_key", &config.api_key),
            ("api_secret", config.api_secret.expose_secret()),
        ] {
            if value.trim().is_empty() {
                return Err(MediaError::Configuration(format!(
                    "cloudinary {name} is not configured"
                )));
            }
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MediaError::Configuration(e.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &CloudinaryConfig {
        &self.config
    }
}

#[async_trait]
impl ImageStore for CloudinaryImageStore {
    fn strategy(&self) -> StorageStrategy {
        StorageStrategy::Cloudinary
    }

    async fn store(&self, image: &StagedImage) -> Result<StoredImage, MediaError> {
        let bytes = image.read().await?;
        let timestamp = Utc::now().timestamp().to_string();

        let mut params = vec![("timestamp", timestamp.as_str())];
        if let Some(folder) = self.config.folder.as_deref() {
            params.push(("folder", folder));
        }
        let signature = sign(&params, self.config.api_secret.expose_secret());

        let part = Part::bytes(bytes)
            .file_name(image.file_name().unwrap_or("upload").to_owned())
            .mime_str(image.content_type())
            .map_err(|e| MediaError::InvalidContentType(e.to_string()))?;

        let mut form = Form::new()
            .part("file", part)
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        for (key, value) in params {
            form = form.text(key.to_owned(), value.to_owned());
        }

        let url = self.config.upload_url();
        debug!(%url, bytes = image.size(), "uploading image to cloudinary");

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| MediaError::Remote(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorResponse>().await {
                Ok(body) => body.error.message,
                Err(_) => status.to_string(),
            };
            warn!(%status, %message, "cloudinary rejected upload");
            return Err(MediaError::Remote(format!("HTTP {}: {message}", status.as_u16())));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| MediaError::Remote(format!("unexpected response: {e}")))?;

        Ok(StoredImage {
            url: body.secure_url,
        })
    }
}
