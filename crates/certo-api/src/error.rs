//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps domain errors from certo-store, certo-learn-client, and
//! certo-render to HTTP status codes with structured JSON bodies.
//! Internal and upstream-outage details are never exposed to clients.
//!
//! `NotEligible` is special: it is an expected business outcome, not a
//! fault, and its response body carries the structured completion detail
//! (`percentage`, `completed_count`, `total_count`) so callers can show
//! concrete progress rather than a bare failure.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use certo_completion::Evaluation;
use certo_learn_client::LearnApiError;
use certo_render::RenderError;
use certo_store::StoreError;

/// Structured JSON error response body.
///
/// All error responses use this format for consistency across the API
/// surface. The `details` field carries additional context for business
/// outcomes like `NOT_ELIGIBLE` and is omitted for 500-class errors to
/// prevent information leakage.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// The error payload.
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "NOT_ELIGIBLE").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional structured context, present only for client-facing
    /// business outcomes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request validation failed (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Request body could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Authentication failure — missing or invalid token (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authorization failure — insufficient permissions (403).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Conflict with current resource state (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The learner has not completed the course (400). Carries the full
    /// evaluation so the response can show concrete progress.
    #[error("not eligible: completed {}/{} lessons ({}%)",
        .0.completed_count, .0.total_count, .0.percentage)]
    NotEligible(Evaluation),

    /// A collaborator service or the database is unavailable (503).
    /// Retryable; details are logged but not returned to the client.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Internal server error (500). Message is logged but not returned
    /// to the client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::NotEligible(_) => (StatusCode::BAD_REQUEST, "NOT_ELIGIBLE"),
            Self::ServiceUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
            }
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal or upstream-outage details to clients.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            Self::ServiceUnavailable(_) => {
                "A dependent service is unavailable; please retry".to_string()
            }
            other => other.to_string(),
        };

        // Log suppressed details for operator visibility.
        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::ServiceUnavailable(_) => tracing::warn!(error = %self, "service unavailable"),
            _ => {}
        }

        let details = match &self {
            Self::NotEligible(eval) => Some(serde_json::json!({
                "percentage": eval.percentage,
                "completed_count": eval.completed_count,
                "total_count": eval.total_count,
            })),
            _ => None,
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Collaborator failures surface as retryable 503s; contract mismatches
/// (undecodable bodies, unexpected 4xx from a peer service) are internal
/// faults.
impl From<LearnApiError> for AppError {
    fn from(err: LearnApiError) -> Self {
        if err.is_retryable() {
            Self::ServiceUnavailable(err.to_string())
        } else {
            Self::Internal(err.to_string())
        }
    }
}

/// Store errors on the issuance path are internal: the only reachable
/// variant is code-space exhaustion, which indicates a broken RNG.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Render failures are internal and retryable; they never affect the
/// credential itself.
impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    fn evaluation() -> Evaluation {
        Evaluation {
            eligible: false,
            completed_count: 12,
            total_count: 15,
            percentage: 80,
        }
    }

    #[test]
    fn status_codes_match_variants() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (
                AppError::Validation("x".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
            ),
            (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            (
                AppError::Unauthorized("x".into()),
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
            ),
            (AppError::Forbidden("x".into()), StatusCode::FORBIDDEN, "FORBIDDEN"),
            (AppError::Conflict("x".into()), StatusCode::CONFLICT, "CONFLICT"),
            (
                AppError::NotEligible(evaluation()),
                StatusCode::BAD_REQUEST,
                "NOT_ELIGIBLE",
            ),
            (
                AppError::ServiceUnavailable("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
            ),
            (
                AppError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
            ),
        ];
        for (err, status, code) in cases {
            let (s, c) = err.status_and_code();
            assert_eq!(s, status);
            assert_eq!(c, code);
        }
    }

    #[test]
    fn not_eligible_display_shows_progress() {
        let msg = format!("{}", AppError::NotEligible(evaluation()));
        assert!(msg.contains("12/15"));
        assert!(msg.contains("80%"));
    }

    /// Helper to extract status and body from a Response.
    async fn response_parts(err: AppError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn not_eligible_body_carries_structured_details() {
        let (status, body) = response_parts(AppError::NotEligible(evaluation())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error.code, "NOT_ELIGIBLE");

        let details = body.error.details.unwrap();
        assert_eq!(details["percentage"], 80);
        assert_eq!(details["completed_count"], 12);
        assert_eq!(details["total_count"], 15);
    }

    #[tokio::test]
    async fn internal_response_hides_details() {
        let (status, body) = response_parts(AppError::Internal("db password wrong".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(
            !body.error.message.contains("db password"),
            "internal error details must not leak: {}",
            body.error.message
        );
        assert!(body.error.details.is_none());
    }

    #[tokio::test]
    async fn service_unavailable_response_hides_details() {
        let (status, body) =
            response_parts(AppError::ServiceUnavailable("progress at 10.0.0.3 down".into()))
                .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(!body.error.message.contains("10.0.0.3"));
        assert!(body.error.message.contains("retry"));
    }

    #[tokio::test]
    async fn not_found_response_keeps_message() {
        let (status, body) = response_parts(AppError::NotFound("credential abc".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.error.message.contains("credential abc"));
    }

    #[test]
    fn learn_api_errors_classify_by_retryability() {
        let transport = LearnApiError::ApiError {
            endpoint: "GET /x".into(),
            status: 503,
            body: String::new(),
        };
        assert!(matches!(
            AppError::from(transport),
            AppError::ServiceUnavailable(_)
        ));

        let contract = LearnApiError::ApiError {
            endpoint: "GET /x".into(),
            status: 400,
            body: String::new(),
        };
        assert!(matches!(AppError::from(contract), AppError::Internal(_)));
    }

    #[test]
    fn store_error_maps_to_internal() {
        let err = AppError::from(StoreError::CodeSpaceExhausted);
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn render_error_maps_to_internal() {
        let err = AppError::from(RenderError::FieldTooLong {
            field: "recipient name",
            max: 100,
        });
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn error_body_skips_absent_details() {
        let body = ErrorBody {
            error: ErrorDetail {
                code: "TEST".to_string(),
                message: "test message".to_string(),
                details: None,
            },
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("details"));
    }
}
