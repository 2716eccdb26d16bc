mod models;
mod seeders;

pub use models::*;
pub use seeders::{insert_property, sample_properties, seed_sample_properties, NewProperty, SAMPLE_PROPERTY_COUNT};

use anyhow::{Context, Result};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::str::FromStr;
use tracing::info;

use crate::config::DatabaseConfig;

pub type DbPool = SqlitePool;

/// Execute a SQL migration file, properly handling comments
async fn execute_sql(pool: &SqlitePool, sql: &str) -> Result<()> {
    for statement in sql.split(';') {
        // Strip SQL comment lines (lines starting with --)
        let cleaned: String = statement
            .lines()
            .filter(|line| !line.trim().starts_with("--"))
            .collect::<Vec<_>>()
            .join("\n");
        let trimmed = cleaned.trim();
        if !trimmed.is_empty() {
            sqlx::query(trimmed).execute(pool).await?;
        }
    }
    Ok(())
}

/// Build the connection pool without touching the database.
///
/// Connections are opened on first use, so an unreachable database surfaces
/// in [`check_connection`] or in the first query rather than here.
pub fn connect(config: &DatabaseConfig) -> Result<DbPool> {
    let options = SqliteConnectOptions::from_str(&config.url)
        .with_context(|| format!("Invalid database URL: {}", config.url))?
        .create_if_missing(true);

    info!("Using database {}", config.url);

    Ok(SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_lazy_with(options))
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn check_connection(pool: &SqlitePool) -> Result<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .context("Database connectivity check failed")?;
    Ok(())
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    info!("Running database migrations...");

    // Migration 001: properties and items tables
    execute_sql(pool, include_str!("../../migrations/001_initial.sql")).await?;

    info!("Migrations completed");
    Ok(())
}

/// Empty, migrated in-memory database.
#[cfg(test)]
pub(crate) async fn test_pool() -> DbPool {
    // A single connection that never expires, since each in-memory
    // connection is its own database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}

/// In-memory database holding the sample listings.
#[cfg(test)]
pub(crate) async fn seeded_test_pool() -> DbPool {
    let pool = test_pool().await;
    seed_sample_properties(&pool).await.unwrap();
    pool
}
