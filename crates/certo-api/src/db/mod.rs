//! # Database Layer (optional)
//!
//! PostgreSQL persistence behind the in-memory store. Absent
//! `DATABASE_URL`, the service runs in in-memory-only mode — the same
//! split the rest of the configuration follows: fully functional locally
//! with zero external services, durable in deployment.

pub mod credentials;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Errors during database initialization.
#[derive(Debug, thiserror::Error)]
pub enum DbInitError {
    /// Connecting the pool failed.
    #[error("database connection failed: {0}")]
    Connect(#[from] sqlx::Error),

    /// Running embedded migrations failed.
    #[error("database migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Initialize the connection pool from `DATABASE_URL` and run embedded
/// migrations. Returns `None` when no database is configured.
pub async fn init_pool() -> Result<Option<PgPool>, DbInitError> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) if !url.trim().is_empty() => url,
        _ => {
            tracing::info!("DATABASE_URL not set — credentials are stored in memory only");
            return Ok(None);
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::info!("database pool initialized and migrations applied");
    Ok(Some(pool))
}
