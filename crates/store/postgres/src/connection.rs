use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use tokio::sync::Mutex;
use tracing::{debug, info};

use nodal_store::error::StoreError;

use crate::config::PostgresConfig;
use crate::migrations;

/// Build `PgConnectOptions` from a [`PostgresConfig`], applying the SSL mode
/// when configured.
pub(crate) fn build_connect_options(config: &PostgresConfig) -> Result<PgConnectOptions, StoreError> {
    if config.url.trim().is_empty() {
        return Err(StoreError::Connection(
            "database connection string is not configured".into(),
        ));
    }

    let mut options: PgConnectOptions = config
        .url
        .parse()
        .map_err(|e: sqlx::Error| StoreError::Connection(e.to_string()))?;

    if let Some(ref mode) = config.ssl_mode {
        let ssl_mode = match mode.as_str() {
            "disable" => PgSslMode::Disable,
            "prefer" => PgSslMode::Prefer,
            "require" => PgSslMode::Require,
            "verify-ca" => PgSslMode::VerifyCa,
            "verify-full" => PgSslMode::VerifyFull,
            other => {
                return Err(StoreError::Connection(format!("unknown ssl_mode: {other}")));
            }
        };
        options = options.ssl_mode(ssl_mode);
    }

    Ok(options)
}

/// Lazily opens and memoizes the process-wide connection pool.
///
/// The first [`connect`](Self::connect) opens the pool and runs migrations;
/// later calls hand back the same pool for as long as it is open. Whether a
/// pool is reusable is decided from the pool's own state, so a pool closed
/// during shutdown is never handed out again. Failures propagate to the
/// caller unchanged; nothing is retried here.
pub struct ConnectionManager {
    config: PostgresConfig,
    pool: Mutex<Option<PgPool>>,
}

impl ConnectionManager {
    pub fn new(config: PostgresConfig) -> Self {
        Self {
            config,
            pool: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &PostgresConfig {
        &self.config
    }

    /// Return the open pool, establishing it first if needed.
    pub async fn connect(&self) -> Result<PgPool, StoreError> {
        let mut slot = self.pool.lock().await;

        if let Some(pool) = slot.as_ref()
            && !pool.is_closed()
        {
            return Ok(pool.clone());
        }

        let options = build_connect_options(&self.config)?;
        let pool = PgPoolOptions::new()
            .max_connections(self.config.pool_size)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        migrations::run_migrations(&pool, &self.config)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        info!(
            schema = %self.config.schema,
            table_prefix = %self.config.table_prefix,
            "connected to PostgreSQL"
        );

        *slot = Some(pool.clone());
        Ok(pool)
    }

    /// Whether an open pool is currently cached.
    pub async fn is_connected(&self) -> bool {
        self.pool
            .lock()
            .await
            .as_ref()
            .is_some_and(|pool| !pool.is_closed())
    }

    /// Close and forget the cached pool, if any.
    pub async fn close(&self) {
        let pool = self.pool.lock().await.take();
        match pool {
            Some(pool) if !pool.is_closed() => {
                pool.close().await;
                info!("PostgreSQL connection closed");
            }
            Some(_) => debug!("PostgreSQL pool was already closed"),
            None => debug!("no PostgreSQL connection to close"),
        }
    }
}
