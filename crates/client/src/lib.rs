//! Nodal HTTP Client
//!
//! A typed Rust client for the Nodal blog backend.
//!
//! # Quick Start
//!
//! ```no_run
//! use nodal_client::NodalClient;
//! use nodal_core::BlogPostInput;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), nodal_client::Error> {
//!     let client = NodalClient::new("http://localhost:3001");
//!
//!     if client.health().await? {
//!         println!("Server is healthy");
//!     }
//!
//!     let posts = client.list_blogs().await?;
//!     println!("{} posts", posts.len());
//!
//!     let draft = BlogPostInput {
//!         title: Some("Hello".into()),
//!         content: Some("# Hello".into()),
//!         ..BlogPostInput::default()
//!     };
//!     let posts = client.replace_blogs(&[draft], Some("passcode")).await?;
//!     println!("now {} posts", posts.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! ```no_run
//! use nodal_client::NodalClientBuilder;
//! use std::time::Duration;
//!
//! let client = NodalClientBuilder::new("https://nodal.example.com/api")
//!     .timeout(Duration::from_secs(60))
//!     .build()
//!     .unwrap();
//! ```

mod error;

pub use error::Error;

// Re-exported so callers don't need a direct `nodal_core` dependency.
pub use nodal_core::{BlogPost, BlogPostInput};

use std::time::Duration;

use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Default request timeout. Uploads of large images need the headroom.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP client for the Nodal blog backend.
#[derive(Debug, Clone)]
pub struct NodalClient {
    client: Client,
    base_url: String,
}

/// Builder for configuring a [`NodalClient`].
#[derive(Debug)]
pub struct NodalClientBuilder {
    base_url: String,
    timeout: Duration,
    client: Option<Client>,
}

impl NodalClientBuilder {
    /// Create a new builder with the given base URL.
    ///
    /// The URL may include a path prefix such as `/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
            client: None,
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Use a custom reqwest Client. The timeout setting is then ignored.
    #[must_use]
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<NodalClient, Error> {
        let client = match self.client {
            Some(c) => c,
            None => Client::builder()
                .timeout(self.timeout)
                .build()
                .map_err(|e| Error::Configuration(e.to_string()))?,
        };

        Ok(NodalClient {
            client,
            base_url: self.base_url,
        })
    }
}

/// Error body returned by the server for every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Serialize)]
struct ReplaceRequest<'a> {
    blogs: &'a [BlogPostInput],
    #[serde(skip_serializing_if = "Option::is_none")]
    passcode: Option<&'a str>,
}

#[derive(Deserialize)]
struct UploadResponse {
    url: String,
}

impl NodalClient {
    /// Create a new client with default configuration.
    ///
    /// # Panics
    ///
    /// Panics if the default HTTP client cannot be built (no TLS backend).
    pub fn new(base_url: impl Into<String>) -> Self {
        NodalClientBuilder::new(base_url)
            .build()
            .expect("default client configuration should not fail")
    }

    /// Create a builder for advanced configuration.
    pub fn builder(base_url: impl Into<String>) -> NodalClientBuilder {
        NodalClientBuilder::new(base_url)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join an endpoint onto the base URL.
    fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{endpoint}", self.base_url)
        } else {
            format!("{}/{endpoint}", self.base_url)
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, Error> {
        if response.status().is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| Error::Deserialization(e.to_string()))
        } else {
            Err(Self::api_error(response).await)
        }
    }

    async fn api_error(response: Response) -> Error {
        let status = response.status();
        match response.json::<ErrorResponse>().await {
            Ok(body) => Error::Api {
                status: status.as_u16(),
                message: body.error,
                details: body.details,
            },
            Err(_) => Error::Http {
                status: status.as_u16(),
                message: status.to_string(),
            },
        }
    }

    // =========================================================================
    // Health
    // =========================================================================

    /// Check if the server is healthy.
    pub async fn health(&self) -> Result<bool, Error> {
        let response = self
            .client
            .get(self.url("/health"))
            .send()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        Ok(response.status().is_success())
    }

    // =========================================================================
    // Blogs
    // =========================================================================

    /// List every post, newest first.
    ///
    /// An empty blog is seeded by the server, so this never returns an empty
    /// list unless seeding is disabled.
    pub async fn list_blogs(&self) -> Result<Vec<BlogPost>, Error> {
        let response = self
            .client
            .get(self.url("/blogs"))
            .send()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        Self::decode(response).await
    }

    /// Replace the whole collection and return the result.
    ///
    /// Identifiers and timestamps are assigned by the server; any the caller
    /// holds are discarded.
    pub async fn replace_blogs(
        &self,
        posts: &[BlogPostInput],
        passcode: Option<&str>,
    ) -> Result<Vec<BlogPost>, Error> {
        let response = self
            .client
            .post(self.url("/blogs"))
            .json(&ReplaceRequest {
                blogs: posts,
                passcode,
            })
            .send()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        Self::decode(response).await
    }

    /// Fetch one post. Returns `None` if it does not exist.
    pub async fn get_blog(&self, id: &str) -> Result<Option<BlogPost>, Error> {
        let mut url =
            Url::parse(&self.url("/blogs")).map_err(|e| Error::Configuration(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| Error::Configuration(format!("cannot add a path to {}", self.base_url)))?
            .push(id);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::decode(response).await.map(Some)
    }

    // =========================================================================
    // Uploads
    // =========================================================================

    /// Upload an image and return the reference the server stored it under.
    ///
    /// Depending on the server's strategy this is a data URI, a site-relative
    /// path, or an absolute URL.
    pub async fn upload_image(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, Error> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_owned())
            .mime_str(content_type)
            .map_err(|e| Error::Configuration(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("image", part);

        let response = self
            .client
            .post(self.url("/upload-image"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        let uploaded: UploadResponse = Self::decode(response).await?;
        Ok(uploaded.url)
    }
}
