//! # certo-api — Axum API Services for Certo
//!
//! Certo is the credential subsystem beside the learning platform: it
//! decides whether a learner has earned a course-completion credential,
//! mints it exactly once, lets any third party verify it without an
//! account, and renders it as a downloadable certificate.
//!
//! ## API Surface
//!
//! | Route                            | Module                  | Auth      |
//! |----------------------------------|-------------------------|-----------|
//! | `POST /v1/credentials`           | [`routes::credentials`] | learner   |
//! | `GET /v1/credentials`            | [`routes::credentials`] | learner   |
//! | `GET /v1/credentials/:id/document` | [`routes::credentials`] | learner |
//! | `GET /verify/:code`              | [`routes::verify`]      | none      |
//! | `GET /health/*`                  | here                    | none      |
//! | `GET /openapi.json`              | [`openapi`]             | learner   |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → AuthMiddleware → RateLimitMiddleware → Handler
//! ```
//!
//! The verification route runs the same stack minus auth: its entire
//! purpose is third-party lookup without credentials.

pub mod auth;
pub mod db;
pub mod error;
pub mod extractors;
pub mod issuance;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::middleware::from_fn;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::AuthConfig;
use crate::middleware::metrics::ApiMetrics;
use crate::middleware::rate_limit::{RateLimitConfig, RateLimiter};
use crate::state::AppState;

pub use error::AppError;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes (`/health/*`) and the verification route are mounted
/// outside the auth middleware so they remain accessible without
/// credentials; both still share the metrics and rate-limit layers.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        token: state.config.auth_token.clone(),
    };
    let metrics = ApiMetrics::new();
    let limiter = RateLimiter::new(RateLimitConfig::default());

    // Authenticated learner routes.
    let api = Router::new()
        .merge(routes::credentials::router())
        .merge(openapi::router())
        .layer(from_fn(middleware::rate_limit::rate_limit_middleware))
        .layer(from_fn(auth::auth_middleware))
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum::Extension(auth_config))
        .layer(axum::Extension(metrics.clone()))
        .layer(axum::Extension(limiter.clone()))
        .with_state(state.clone());

    // Public verification.
    let public = Router::new()
        .merge(routes::verify::router())
        .layer(from_fn(middleware::rate_limit::rate_limit_middleware))
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum::Extension(metrics))
        .layer(axum::Extension(limiter))
        .with_state(state);

    // Unauthenticated health probes.
    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(public).merge(api)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — returns 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}
