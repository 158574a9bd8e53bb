pub mod schema;

pub use schema::{create_schema, seed_default_moods};

use crate::error::AppResult;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

/// Creates a SQLite connection pool and applies the session pragmas
pub async fn create_pool(database_url: &str) -> AppResult<SqlitePool> {
    // An in-memory database exists per connection; cap the pool at one so
    // every query sees the same database.
    let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    Ok(pool)
}

/// Connects, creates missing tables and seeds the default mood set
pub async fn init_database(database_url: &str) -> AppResult<SqlitePool> {
    let pool = create_pool(database_url).await?;

    create_schema(&pool).await?;
    seed_default_moods(&pool).await?;

    tracing::info!(url = %database_url, "Database ready");

    Ok(pool)
}
