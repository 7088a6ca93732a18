use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, Row};
use tracing::debug;
use uuid::Uuid;

use nodal_core::{BlogId, BlogPost, NewBlogPost};
use nodal_store::error::StoreError;
use nodal_store::store::BlogStore;

use crate::config::PostgresConfig;
use crate::connection::ConnectionManager;

const COLUMNS: &str =
    "id, title, content, date, author_name, author_profile_picture, created_at, updated_at";

fn backend(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

fn post_from_row(row: &PgRow) -> Result<BlogPost, StoreError> {
    let decode = |e: sqlx::Error| StoreError::Corrupt(e.to_string());
    Ok(BlogPost {
        id: BlogId::from_uuid(row.try_get::<Uuid, _>("id").map_err(decode)?),
        title: row.try_get("title").map_err(decode)?,
        content: row.try_get("content").map_err(decode)?,
        date: row.try_get("date").map_err(decode)?,
        author_name: row.try_get("author_name").map_err(decode)?,
        author_profile_picture: row.try_get("author_profile_picture").map_err(decode)?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at").map_err(decode)?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at").map_err(decode)?,
    })
}

/// PostgreSQL-backed implementation of [`BlogStore`].
///
/// The pool is opened lazily through a [`ConnectionManager`] on the first
/// operation, so constructing the store never touches the network.
/// `replace_all` runs its delete and inserts in a single transaction.
pub struct PostgresBlogStore {
    connections: ConnectionManager,
}

impl PostgresBlogStore {
    /// Create a store for the given configuration without connecting.
    pub fn new(config: PostgresConfig) -> Self {
        Self {
            connections: ConnectionManager::new(config),
        }
    }

    /// Access the underlying connection manager.
    pub fn connections(&self) -> &ConnectionManager {
        &self.connections
    }

    fn table(&self) -> String {
        self.connections.config().posts_table()
    }

    async fn insert_all(
        &self,
        conn: &mut PgConnection,
        posts: &[NewBlogPost],
    ) -> Result<u64, StoreError> {
        let table = self.table();
        let query = format!(
            "INSERT INTO {table} \
             (id, title, content, date, author_name, author_profile_picture, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7)"
        );
        let now = Utc::now();

        let mut written = 0;
        for new in posts {
            let result = sqlx::query(&query)
                .bind(BlogId::generate().as_uuid())
                .bind(&new.title)
                .bind(&new.content)
                .bind(&new.date)
                .bind(&new.author_name)
                .bind(&new.author_profile_picture)
                .bind(now)
                .execute(&mut *conn)
                .await
                .map_err(backend)?;
            written += result.rows_affected();
        }
        Ok(written)
    }
}

#[async_trait]
impl BlogStore for PostgresBlogStore {
    async fn list(&self) -> Result<Vec<BlogPost>, StoreError> {
        let pool = self.connections.connect().await?;
        let table = self.table();
        let query = format!("SELECT {COLUMNS} FROM {table} ORDER BY created_at DESC, seq ASC");

        let rows = sqlx::query(&query)
            .fetch_all(&pool)
            .await
            .map_err(backend)?;

        rows.iter().map(post_from_row).collect()
    }

    async fn get(&self, id: &BlogId) -> Result<Option<BlogPost>, StoreError> {
        let pool = self.connections.connect().await?;
        let table = self.table();
        let query = format!("SELECT {COLUMNS} FROM {table} WHERE id = $1");

        let row = sqlx::query(&query)
            .bind(id.as_uuid())
            .fetch_optional(&pool)
            .await
            .map_err(backend)?;

        row.as_ref().map(post_from_row).transpose()
    }

    async fn insert_many(&self, posts: &[NewBlogPost]) -> Result<u64, StoreError> {
        let pool = self.connections.connect().await?;
        let mut tx = pool.begin().await.map_err(backend)?;
        let written = self.insert_all(&mut tx, posts).await?;
        tx.commit().await.map_err(backend)?;
        Ok(written)
    }

    async fn replace_all(&self, posts: &[NewBlogPost]) -> Result<u64, StoreError> {
        let pool = self.connections.connect().await?;
        let table = self.table();

        let mut tx = pool.begin().await.map_err(backend)?;
        let deleted = sqlx::query(&format!("DELETE FROM {table}"))
            .execute(&mut *tx)
            .await
            .map_err(backend)?
            .rows_affected();
        let written = self.insert_all(&mut tx, posts).await?;
        tx.commit().await.map_err(backend)?;

        debug!(deleted, written, "replaced blog collection");
        Ok(written)
    }

    async fn close(&self) {
        self.connections.close().await;
    }
}
