use serde::Deserialize;

/// Configuration for the blog store backend.
#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    /// Which backend to use: `"memory"` or `"postgres"`.
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Connection URL for the `postgres` backend.
    pub url: Option<String>,

    /// Maximum number of pooled connections.
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,

    /// Schema holding the posts table.
    #[serde(default = "default_schema")]
    pub schema: String,

    /// Prefix applied to table names.
    #[serde(default = "default_table_prefix")]
    pub table_prefix: String,

    /// `PostgreSQL` SSL mode (`disable`, `prefer`, `require`, ...).
    pub ssl_mode: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            url: None,
            pool_size: default_pool_size(),
            schema: default_schema(),
            table_prefix: default_table_prefix(),
            ssl_mode: None,
        }
    }
}

fn default_backend() -> String {
    "memory".to_owned()
}

fn default_pool_size() -> u32 {
    5
}

fn default_schema() -> String {
    "public".to_owned()
}

fn default_table_prefix() -> String {
    "nodal_".to_owned()
}
