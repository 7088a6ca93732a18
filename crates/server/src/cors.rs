use std::sync::Arc;

use axum::http::HeaderValue;
use axum::http::request::Parts;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::config::CorsConfig;

/// Decides which browser origins may call the API.
///
/// Exact matches against the configured origins always pass. Outside
/// production, any `http://localhost*` origin passes too.
#[derive(Debug, Clone)]
pub struct OriginPolicy {
    origins: Vec<String>,
    production: bool,
}

impl OriginPolicy {
    pub fn new(config: &CorsConfig, production: bool) -> Self {
        Self {
            origins: config.origins(),
            production,
        }
    }

    pub fn allows(&self, origin: &str) -> bool {
        self.origins.iter().any(|o| o == origin)
            || (!self.production && origin.starts_with("http://localhost"))
    }
}

/// Build the CORS layer. Credentials are allowed, so methods and headers
/// mirror the preflight request instead of using wildcards.
pub fn cors_layer(policy: OriginPolicy) -> CorsLayer {
    let policy = Arc::new(policy);
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _: &Parts| {
                origin.to_str().is_ok_and(|o| policy.allows(o))
            },
        ))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}
