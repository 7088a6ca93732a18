use serde::Deserialize;

/// HTTP server bind configuration.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Graceful shutdown timeout in seconds.
    ///
    /// In-flight requests get this long to finish after a termination signal;
    /// past it the process exits with status 1.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_seconds: u64,
    /// Directory served as static files. Disk-stored uploads land in its
    /// `blog-images` subdirectory.
    #[serde(default = "default_public_dir")]
    pub public_dir: String,
    /// Production mode tightens the CORS policy.
    #[serde(default)]
    pub production: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            shutdown_timeout_seconds: default_shutdown_timeout(),
            public_dir: default_public_dir(),
            production: false,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

fn default_port() -> u16 {
    3001
}

fn default_shutdown_timeout() -> u64 {
    10
}

fn default_public_dir() -> String {
    "public".to_owned()
}
