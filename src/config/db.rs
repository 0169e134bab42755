// src/config/db.rs
// DOCUMENTATION: Database connection pool initialization
// PURPOSE: Setup and manage the SQLite pool backing the venue cache

use crate::config::Config;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

/// Initialize SQLite connection pool
/// DOCUMENTATION: Creates the database file if missing
/// Called once during application startup in main.rs
pub async fn init_db_pool(config: &Config) -> Result<SqlitePool, sqlx::Error> {
    log::info!("Initializing database pool: {}", config.database_url);

    let options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);

    // An in-memory database lives and dies with its connection
    let in_memory = config.database_url.contains(":memory:");
    let max_connections = if in_memory {
        1
    } else {
        config.db_max_connections.max(1)
    };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connection_timeout))
        .idle_timeout((!in_memory).then(|| Duration::from_secs(300)))
        .max_lifetime((!in_memory).then(|| Duration::from_secs(1800)))
        .connect_with(options)
        .await?;

    // Verify connection works
    sqlx::query("SELECT 1").execute(&pool).await?;

    log::info!("Database pool initialized successfully");
    Ok(pool)
}
