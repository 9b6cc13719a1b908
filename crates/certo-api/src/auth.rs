//! # Authentication Middleware
//!
//! Bearer-token authentication identifying the calling learner.
//!
//! ## Token Format
//!
//! ```text
//! Bearer {user_id}:{secret}    — configured mode (AUTH_TOKEN set)
//! Bearer {user_id}             — development mode (AUTH_TOKEN unset)
//! ```
//!
//! The service sits behind the learning platform's session gateway, which
//! exchanges a session for this service token; the shared secret is
//! compared in constant time. The user id travels in the token rather
//! than a header so a caller can never claim one identity to the gateway
//! and another to this service.
//!
//! Unlike the rest of the API, identity is always required: issuance and
//! listing are meaningless without a learner. Only `/verify/*` and the
//! health probes are mounted outside this middleware.
//!
//! ## CallerIdentity
//!
//! Every authenticated request gets a [`CallerIdentity`] injected into
//! the request extensions. Handlers extract it via the
//! `FromRequestParts` impl.

use axum::extract::Request;
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use subtle::ConstantTimeEq;
use uuid::Uuid;
use zeroize::{Zeroize, ZeroizeOnDrop};

use certo_core::UserId;

use crate::error::{AppError, ErrorBody, ErrorDetail};

// ── SecretToken ─────────────────────────────────────────────────────────────

/// The shared service secret. Zeroized on drop; `Debug` is redacted so
/// the secret cannot leak through config logging.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretToken(String);

impl SecretToken {
    /// Wrap a secret string.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Access the secret for comparison.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecretToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretToken([REDACTED])")
    }
}

// ── CallerIdentity ──────────────────────────────────────────────────────────

/// Identity of the authenticated learner, available to all route
/// handlers via Axum's `FromRequestParts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerIdentity {
    /// The authenticated learner.
    pub user_id: UserId,
}

/// Extracts the identity the auth middleware injected into extensions.
/// Returns 401 if no identity is present (middleware didn't run or
/// failed).
#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .copied()
            .ok_or_else(|| AppError::Unauthorized("no caller identity in request context".into()))
    }
}

// ── Auth Configuration ──────────────────────────────────────────────────────

/// Auth configuration injected into request extensions.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// The expected shared secret. `None` disables secret checking
    /// (development mode); the user id in the token is still required.
    pub token: Option<SecretToken>,
}

// ── Token Validation ────────────────────────────────────────────────────────

/// Constant-time comparison of bearer secrets.
///
/// Prevents timing side-channels that could reveal secret length or
/// prefix. When lengths differ, performs a dummy comparison to avoid
/// leaking length information through timing variance.
fn constant_time_secret_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Parse a bearer token in format `{user_id}:{secret}` (configured mode)
/// or `{user_id}` (development mode, `expected` is `None`).
pub fn parse_bearer_token(
    provided: &str,
    expected: Option<&SecretToken>,
) -> Result<CallerIdentity, String> {
    let (user_part, secret_part) = match provided.split_once(':') {
        Some((user, secret)) => (user, Some(secret)),
        None => (provided, None),
    };

    let user_id = user_part
        .parse::<Uuid>()
        .map(UserId::from_uuid)
        .map_err(|e| format!("invalid user id in bearer token: {e}"))?;

    if let Some(expected) = expected {
        let secret = secret_part
            .ok_or_else(|| "token missing secret — expected user_id:secret".to_string())?;
        if !constant_time_secret_eq(secret, expected.as_str()) {
            return Err("invalid bearer token".into());
        }
    }

    Ok(CallerIdentity { user_id })
}

// ── Middleware ──────────────────────────────────────────────────────────────

/// Extract and validate the Bearer token from the Authorization header.
///
/// Parses the token to extract [`CallerIdentity`] and injects it into
/// request extensions for downstream handlers. A missing header is
/// always a 401 — even with secret checking disabled, the service needs
/// to know which learner is calling.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let config = request.extensions().get::<AuthConfig>().cloned();
    let expected = config.as_ref().and_then(|c| c.token.as_ref());

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match auth_header {
        Some(header_value) if header_value.starts_with("Bearer ") => {
            let provided = &header_value[7..];
            match parse_bearer_token(provided, expected) {
                Ok(identity) => {
                    request.extensions_mut().insert(identity);
                    next.run(request).await
                }
                Err(msg) => {
                    tracing::warn!(reason = %msg, "authentication failed: invalid bearer token");
                    unauthorized_response(&msg)
                }
            }
        }
        Some(_) => {
            tracing::warn!("authentication failed: non-Bearer authorization scheme");
            unauthorized_response("authorization header must use Bearer scheme")
        }
        None => {
            tracing::warn!("authentication failed: missing authorization header");
            unauthorized_response("missing authorization header")
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    let body = ErrorBody {
        error: ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
            details: None,
        },
    };
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::middleware::from_fn;
    use axum::routing::get;
    use axum::Router;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    /// Build a minimal router with the auth middleware and a handler that
    /// echoes the caller's user id.
    fn test_app(token: Option<SecretToken>) -> Router {
        let auth_config = AuthConfig { token };
        Router::new()
            .route(
                "/whoami",
                get(|caller: CallerIdentity| async move { caller.user_id.to_string() }),
            )
            .layer(from_fn(auth_middleware))
            .layer(axum::Extension(auth_config))
    }

    async fn body_string(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn valid_token_injects_identity() {
        let app = test_app(Some(SecretToken::new("svc-secret")));
        let user = Uuid::new_v4();

        let request = Request::builder()
            .uri("/whoami")
            .header("Authorization", format!("Bearer {user}:svc-secret"))
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, user.to_string());
    }

    #[tokio::test]
    async fn wrong_secret_is_rejected() {
        let app = test_app(Some(SecretToken::new("svc-secret")));

        let request = Request::builder()
            .uri("/whoami")
            .header("Authorization", format!("Bearer {}:wrong", Uuid::new_v4()))
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn missing_secret_is_rejected_when_configured() {
        let app = test_app(Some(SecretToken::new("svc-secret")));

        let request = Request::builder()
            .uri("/whoami")
            .header("Authorization", format!("Bearer {}", Uuid::new_v4()))
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn development_mode_accepts_bare_user_id() {
        let app = test_app(None);
        let user = Uuid::new_v4();

        let request = Request::builder()
            .uri("/whoami")
            .header("Authorization", format!("Bearer {user}"))
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, user.to_string());
    }

    #[tokio::test]
    async fn missing_header_is_rejected_even_in_development_mode() {
        let app = test_app(None);

        let request = Request::builder()
            .uri("/whoami")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = body_string(response).await;
        let err: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(err["error"]["code"], "UNAUTHORIZED");
        assert!(err["error"]["message"].as_str().unwrap().contains("missing"));
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_rejected() {
        let app = test_app(Some(SecretToken::new("svc-secret")));

        let request = Request::builder()
            .uri("/whoami")
            .header("Authorization", "Basic dXNlcjpwYXNz")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn garbage_user_id_is_rejected() {
        let app = test_app(Some(SecretToken::new("svc-secret")));

        let request = Request::builder()
            .uri("/whoami")
            .header("Authorization", "Bearer not-a-uuid:svc-secret")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn parse_accepts_valid_configured_token() {
        let user = Uuid::new_v4();
        let secret = SecretToken::new("s3cret");
        let identity =
            parse_bearer_token(&format!("{user}:s3cret"), Some(&secret)).unwrap();
        assert_eq!(identity.user_id.as_uuid(), user);
    }

    #[test]
    fn parse_rejects_secret_with_different_length() {
        let user = Uuid::new_v4();
        let secret = SecretToken::new("s3cret");
        assert!(parse_bearer_token(&format!("{user}:s3cret-longer"), Some(&secret)).is_err());
        assert!(parse_bearer_token(&format!("{user}:s3"), Some(&secret)).is_err());
    }

    #[test]
    fn secret_token_debug_is_redacted() {
        let token = SecretToken::new("super-secret-value");
        let debug = format!("{token:?}");
        assert!(!debug.contains("super-secret-value"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn constant_time_eq_basic_behavior() {
        assert!(constant_time_secret_eq("abc", "abc"));
        assert!(!constant_time_secret_eq("abc", "abd"));
        assert!(!constant_time_secret_eq("abc", "abcd"));
        assert!(constant_time_secret_eq("", ""));
    }
}
