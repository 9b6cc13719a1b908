//! # certo-api — Binary Entry Point
//!
//! Starts the Axum HTTP server. All configuration is read from the
//! environment here, once, and handed to the application as explicit
//! structs — nothing below this file touches ambient env.
//!
//! ## Environment
//!
//! - `PORT` — listen port (default 8080)
//! - `AUTH_TOKEN` — shared bearer secret; unset disables secret checking
//! - `CERT_ISSUER_NAME` — issuer shown on certificates (default "Certo Credentials")
//! - `CERT_ISSUER_TAGLINE` — optional issuer tagline
//! - `CERT_VERIFY_BASE_URL` — public base URL printed in certificate
//!   footers (default `http://localhost:{port}`)
//! - `DATABASE_URL` — Postgres; unset means in-memory only
//! - `LEARN_*` — learning platform endpoints (see `certo-learn-client`);
//!   without `LEARN_API_TOKEN` the in-memory fixture is used

use anyhow::Context;
use url::Url;

use certo_api::auth::SecretToken;
use certo_api::state::{AppConfig, AppState};
use certo_learn_client::{FixtureLearn, LearnApiConfig, LearnClient, LearnSource};
use certo_render::RenderConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Build configuration from environment.
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let auth_token = std::env::var("AUTH_TOKEN").ok().map(SecretToken::new);
    if auth_token.is_none() {
        tracing::warn!("AUTH_TOKEN not set — bearer secret checking is disabled");
    }

    let issuer_name = std::env::var("CERT_ISSUER_NAME")
        .unwrap_or_else(|_| "Certo Credentials".to_string());
    let verify_base_url = match std::env::var("CERT_VERIFY_BASE_URL") {
        Ok(raw) => Url::parse(&raw).context("CERT_VERIFY_BASE_URL is not a valid URL")?,
        Err(_) => Url::parse(&format!("http://localhost:{port}"))
            .context("default verification URL failed to parse")?,
    };
    let mut issuer = RenderConfig::new(issuer_name, verify_base_url);
    issuer.issuer_tagline = std::env::var("CERT_ISSUER_TAGLINE").ok().filter(|t| !t.is_empty());

    let config = AppConfig {
        port,
        auth_token,
        issuer,
    };

    // Learning platform: live client when configured, fixture otherwise.
    let learn = match LearnApiConfig::from_env() {
        Ok(learn_config) => {
            tracing::info!("learning platform client configured");
            let client =
                LearnClient::new(learn_config).context("failed to create learning platform client")?;
            LearnSource::Remote(client)
        }
        Err(e) => {
            tracing::warn!(
                "learning platform client not configured ({e}) — using the in-memory fixture; \
                 issuance will find no courses until one is seeded"
            );
            LearnSource::Fixture(FixtureLearn::new())
        }
    };

    // Database pool (optional — absent means in-memory only).
    let db_pool = certo_api::db::init_pool()
        .await
        .context("database initialization failed")?;

    let state = AppState::with_config(config, learn, db_pool);

    // Hydrate the credential store from the database (if connected).
    state
        .hydrate_from_db()
        .await
        .map_err(anyhow::Error::msg)
        .context("database hydration failed")?;

    let app = certo_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("certo-api listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
