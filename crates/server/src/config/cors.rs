use serde::Deserialize;

/// Cross-origin request policy.
///
/// The deployed front end is listed via `frontend_url`; local development
/// servers are in `allowed_origins` by default.
#[derive(Debug, Deserialize)]
pub struct CorsConfig {
    /// Origin of the deployed front end, e.g. `https://nodal.example.com`.
    pub frontend_url: Option<String>,
    /// Additional exact origins to allow.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            frontend_url: None,
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl CorsConfig {
    /// Every exact origin that is allowed, front end first.
    pub fn origins(&self) -> Vec<String> {
        self.frontend_url
            .iter()
            .chain(&self.allowed_origins)
            .map(|o| o.trim_end_matches('/').to_owned())
            .filter(|o| !o.is_empty())
            .collect()
    }
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".to_owned(),
        "http://localhost:3000".to_owned(),
    ]
}
