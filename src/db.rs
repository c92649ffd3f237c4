//! Database pool configuration and schema bootstrap

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::error::Result;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS phones (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        model TEXT NOT NULL CHECK (length(trim(model)) > 0),
        model_key TEXT NOT NULL UNIQUE,
        price TEXT NOT NULL,
        storage TEXT NOT NULL
    )
"#;

/// Open (creating if missing) the SQLite database and make sure the schema exists
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        // SQLite is single-writer, but can have multiple readers
        .max_connections(5)
        // Don't wait too long for a connection
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await?;

    ensure_schema(&pool).await?;
    info!(database_url, "catalog database ready");
    Ok(pool)
}

/// Single-connection in-memory database; every connection to `:memory:` is a fresh db
pub async fn connect_in_memory() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    ensure_schema(&pool).await?;
    Ok(pool)
}

/// Idempotent; safe to run on every startup
pub async fn ensure_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(SCHEMA).execute(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let pool = connect_in_memory().await.unwrap();
        ensure_schema(&pool).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM phones")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_schema_rejects_blank_model() {
        let pool = connect_in_memory().await.unwrap();
        let result = sqlx::query(
            "INSERT INTO phones (model, model_key, price, storage) VALUES ('  ', '  ', '$1', '1GB')",
        )
        .execute(&pool)
        .await;
        assert!(result.is_err());
    }
}
