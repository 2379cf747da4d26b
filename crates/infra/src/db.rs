use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

const SCHEMA: [&str; 4] = [
    r#"
    CREATE TABLE IF NOT EXISTS stock (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        item TEXT NOT NULL,
        item_type TEXT NOT NULL,
        size TEXT NOT NULL,
        quantity INTEGER NOT NULL CHECK (quantity >= 0),
        UNIQUE (item, item_type, size)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS workers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS foremen (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS report (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        worker_name TEXT NOT NULL,
        foreman_name TEXT NOT NULL,
        item TEXT NOT NULL,
        item_type TEXT NOT NULL,
        size TEXT NOT NULL,
        quantity INTEGER NOT NULL CHECK (quantity > 0)
    )
    "#,
];

/// Open a pool on `database_url`, creating the database file if it is missing.
///
/// In-memory databases get a single connection that is never reaped: every
/// query sees the same database, and it lives as long as the pool.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("invalid database url {database_url}"))?
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(5));

    pool_options(database_url)
        .connect_with(options)
        .await
        .with_context(|| format!("failed to open database at {database_url}"))
}

fn pool_options(database_url: &str) -> SqlitePoolOptions {
    let pool = SqlitePoolOptions::new().acquire_timeout(Duration::from_secs(10));

    if database_url.contains(":memory:") {
        pool.max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        pool.max_connections(5)
    }
}

/// Create the inventory tables when they do not exist yet.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .context("failed to create inventory schema")?;
    }

    info!("inventory schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn schema_creation_is_idempotent() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        ensure_schema(&pool).await.unwrap();
        ensure_schema(&pool).await.unwrap();

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(tables, vec!["foremen", "report", "stock", "workers"]);
    }

    #[tokio::test]
    async fn in_memory_pool_keeps_its_only_connection() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        let options = pool.options();

        assert_eq!(options.get_max_connections(), 1);
        assert_eq!(options.get_min_connections(), 1);
        assert_eq!(options.get_idle_timeout(), None);
        assert_eq!(options.get_max_lifetime(), None);
    }

    #[test]
    fn file_pool_keeps_default_reaping() {
        let options = pool_options("sqlite://inventory.db");

        assert_eq!(options.get_max_connections(), 5);
        assert_eq!(options.get_min_connections(), 0);
        assert!(options.get_idle_timeout().is_some());
    }

    #[tokio::test]
    async fn negative_stock_is_refused_by_schema() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        ensure_schema(&pool).await.unwrap();

        let result = sqlx::query(
            "INSERT INTO stock (item, item_type, size, quantity) VALUES ('Cap', '', 'S', -1)",
        )
        .execute(&pool)
        .await;
        assert!(result.is_err());
    }
}
