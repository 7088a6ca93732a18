use sqlx::PgPool;

use crate::config::PostgresConfig;

/// Run database migrations, creating the posts table if it does not exist.
///
/// `seq` records insertion order so posts written in one batch (which share
/// a `created_at`) list in the order they were submitted.
///
/// # Errors
///
/// Returns a [`sqlx::Error`] if any DDL statement fails.
pub async fn run_migrations(pool: &PgPool, config: &PostgresConfig) -> Result<(), sqlx::Error> {
    let posts_table = config.posts_table();

    let create_posts = format!(
        "CREATE TABLE IF NOT EXISTS {posts_table} (
            id UUID PRIMARY KEY,
            seq BIGSERIAL NOT NULL,
            title TEXT NOT NULL CHECK (title <> ''),
            content TEXT NOT NULL,
            date TEXT,
            author_name TEXT,
            author_profile_picture TEXT,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )"
    );

    let create_order_idx = format!(
        "CREATE INDEX IF NOT EXISTS {}blog_posts_newest_idx ON {posts_table} (created_at DESC, seq ASC)",
        config.table_prefix
    );

    sqlx::query(&create_posts).execute(pool).await?;
    sqlx::query(&create_order_idx).execute(pool).await?;

    Ok(())
}
