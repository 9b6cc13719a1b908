//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! ## Architecture
//!
//! AppState holds only Certo-owned concerns:
//! - **Credentials** — the credential store (Certo's single table of
//!   durable truth)
//! - **Learn source** — typed access to the learning platform for
//!   course shape, progress facts, and display data
//!
//! Course content, progress, and user profiles are NOT stored here. That
//! data lives in the learning platform and is re-read through
//! `certo-learn-client` whenever it is needed.

use sqlx::PgPool;
use url::Url;

use certo_learn_client::{FixtureLearn, LearnSource};
use certo_render::RenderConfig;
use certo_store::CredentialStore;

use crate::auth::SecretToken;
use crate::db;

/// Application configuration.
///
/// Built once at startup (see `main.rs`) and injected here; business
/// logic never reads the ambient environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Shared service secret for bearer authentication.
    /// If `None`, secret checking is disabled (development mode).
    pub auth_token: Option<SecretToken>,
    /// Issuer identity and verification base URL for rendered
    /// certificates.
    pub issuer: RenderConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            auth_token: None,
            issuer: RenderConfig::new(
                "Certo Credentials",
                Url::parse("http://localhost:8080").expect("static default URL is valid"),
            ),
        }
    }
}

/// Shared application state accessible to all route handlers.
///
/// Clone-friendly: the store and fixture share data through `Arc`
/// internals, and `PgPool` is itself a handle.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The credential store. Owns the uniqueness invariants.
    pub credentials: CredentialStore,
    /// The learning platform: live client or in-memory fixture.
    pub learn: LearnSource,
    /// PostgreSQL connection pool for durable persistence. When `None`,
    /// the service operates in in-memory-only mode.
    pub db_pool: Option<PgPool>,
    /// Application configuration.
    pub config: AppConfig,
}

impl AppState {
    /// Create a state with default configuration, an empty fixture
    /// learning platform, and no database. This is the test and
    /// local-development constructor.
    pub fn new() -> Self {
        Self::with_config(
            AppConfig::default(),
            LearnSource::Fixture(FixtureLearn::new()),
            None,
        )
    }

    /// Create a state with the given configuration, learn source, and
    /// optional database pool.
    pub fn with_config(
        config: AppConfig,
        learn: LearnSource,
        db_pool: Option<PgPool>,
    ) -> Self {
        Self {
            credentials: CredentialStore::new(),
            learn,
            db_pool,
            config,
        }
    }

    /// Hydrate the in-memory credential store from the database.
    ///
    /// Called once on startup when a database pool is available, so that
    /// reads stay fast and synchronous while Postgres provides
    /// durability across restarts.
    pub async fn hydrate_from_db(&self) -> Result<(), String> {
        let pool = match &self.db_pool {
            Some(pool) => pool,
            None => return Ok(()),
        };

        let records = db::credentials::load_all(pool)
            .await
            .map_err(|e| format!("failed to load credentials: {e}"))?;
        let loaded = self
            .credentials
            .hydrate(records)
            .map_err(|e| format!("credential table violates store invariants: {e}"))?;

        tracing::info!(credentials = loaded, "hydrated credential store from database");
        Ok(())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
