use std::sync::Arc;

use nodal_store::BlogStore;
use nodal_store_memory::MemoryBlogStore;
#[cfg(feature = "postgres")]
use nodal_store_postgres::{PostgresBlogStore, PostgresConfig};

use crate::config::DatabaseConfig;
use crate::error::ServerError;

/// Build the `PostgreSQL` store settings from the `[database]` section.
#[cfg(feature = "postgres")]
pub fn postgres_config(config: &DatabaseConfig) -> Result<PostgresConfig, ServerError> {
    let url = config.url.as_deref().ok_or_else(|| {
        ServerError::Config("postgres backend requires [database] url or DATABASE_URL".into())
    })?;

    Ok(PostgresConfig {
        url: url.to_owned(),
        pool_size: config.pool_size,
        schema: config.schema.clone(),
        table_prefix: config.table_prefix.clone(),
        ssl_mode: config.ssl_mode.clone(),
    })
}

/// Create a blog store from the given configuration.
///
/// The `postgres` store connects lazily, so this never touches the network.
pub fn create_store(config: &DatabaseConfig) -> Result<Arc<dyn BlogStore>, ServerError> {
    let store: Arc<dyn BlogStore> = match config.backend.as_str() {
        "memory" => Arc::new(MemoryBlogStore::new()),
        #[cfg(feature = "postgres")]
        "postgres" => Arc::new(PostgresBlogStore::new(postgres_config(config)?)),
        other => {
            return Err(ServerError::Config(format!(
                "unknown database backend: {other} (is the feature enabled?)"
            )));
        }
    };
    Ok(store)
}
