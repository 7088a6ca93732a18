mod admin;
mod cors;
mod database;
mod env;
mod server;
mod telemetry;
mod uploads;

#[cfg(test)]
mod tests;

pub use admin::*;
pub use cors::*;
pub use database::*;
pub use server::*;
pub use telemetry::*;
pub use uploads::*;

use std::path::Path;

use serde::Deserialize;

use crate::error::ServerError;

/// Top-level configuration for the Nodal server, loaded from a TOML file.
#[derive(Debug, Default, Deserialize)]
pub struct NodalConfig {
    /// HTTP server bind configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Blog store backend configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Cross-origin policy.
    #[serde(default)]
    pub cors: CorsConfig,
    /// Bulk-replace passcode.
    #[serde(default)]
    pub admin: AdminConfig,
    /// Image upload strategy and credentials.
    #[serde(default)]
    pub uploads: UploadsConfig,
    /// OpenTelemetry distributed tracing configuration.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl NodalConfig {
    /// Parse a configuration document.
    pub fn from_toml(contents: &str) -> Result<Self, ServerError> {
        toml::from_str(contents).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Load the file at `path`, or the defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self, ServerError> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Self::from_toml(&contents)
        } else {
            Self::from_toml("")
        }
    }

    /// Apply overrides from the process environment.
    pub fn apply_process_env(&mut self) -> Result<(), ServerError> {
        self.apply_env(|key| std::env::var(key).ok())
    }
}
