//! # Public Verification Endpoint
//!
//! The entire point of this route is third-party trust without an
//! account: anyone holding a verification code can confirm a credential
//! against the store. Mounted outside the auth middleware.
//!
//! Both malformed and unknown codes answer `200 {"valid": false}` — an
//! invalid code is a normal result integrators branch on, never a 4xx.
//! Only genuine collaborator outages produce error statuses.
//!
//! The success view is deliberately minimal: recipient name, course
//! title/description, issue date. No internal ids, no email, and no way
//! to enumerate the holder's other credentials from a single code.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use certo_core::VerificationCode;

use crate::error::AppError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Public verification result.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerifyResponse {
    /// Whether the code resolves to an issued credential.
    pub valid: bool,
    /// The credential holder, present when `valid`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<VerifiedRecipient>,
    /// The completed course, present when `valid`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<VerifiedCourse>,
    /// Issue date, present when `valid`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<DateTime<Utc>>,
}

impl VerifyResponse {
    fn invalid() -> Self {
        Self {
            valid: false,
            recipient: None,
            course: None,
            issued_at: None,
        }
    }
}

/// Public view of the credential holder.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerifiedRecipient {
    /// Display name.
    pub name: String,
}

/// Public view of the completed course.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerifiedCourse {
    /// Course title.
    pub title: String,
    /// Course description, when the catalog carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the public verification router.
pub fn router() -> Router<AppState> {
    Router::new().route("/verify/:code", get(verify_credential))
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

/// GET /verify/:code — Verify a credential by its public code.
///
/// A credential that resolves but whose user or course the directory no
/// longer knows is NOT `valid: false` — the credential stands; the
/// display data is temporarily unavailable, which is a 503.
#[utoipa::path(
    get,
    path = "/verify/{code}",
    params(("code" = String, Path, description = "Verification code")),
    responses(
        (status = 200, description = "Verification result — check the `valid` field",
            body = VerifyResponse),
        (status = 503, description = "Directory temporarily unavailable",
            body = crate::error::ErrorBody),
    ),
    tag = "verify"
)]
pub async fn verify_credential(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<VerifyResponse>, AppError> {
    let code = match VerificationCode::parse(&code) {
        Ok(code) => code,
        Err(_) => return Ok(Json(VerifyResponse::invalid())),
    };

    let record = match state.credentials.find_by_code(&code) {
        Some(record) => record,
        None => return Ok(Json(VerifyResponse::invalid())),
    };

    let recipient = state
        .learn
        .user_display(record.user_id)
        .await?
        .ok_or_else(|| {
            AppError::ServiceUnavailable(format!(
                "directory has no display entry for user {}",
                record.user_id
            ))
        })?;
    let course = state
        .learn
        .course_display(record.course_id)
        .await?
        .ok_or_else(|| {
            AppError::ServiceUnavailable(format!(
                "directory has no display entry for course {}",
                record.course_id
            ))
        })?;

    Ok(Json(VerifyResponse {
        valid: true,
        recipient: Some(VerifiedRecipient {
            name: recipient.name,
        }),
        course: Some(VerifiedCourse {
            title: course.title,
            description: course.description,
        }),
        issued_at: Some(record.issued_at),
    }))
}
