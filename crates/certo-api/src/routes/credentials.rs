//! # Credential Endpoints (authenticated)
//!
//! The learner-facing surface: request issuance, list held credentials,
//! and download the rendered certificate document.
//!
//! ## Endpoints
//!
//! - `POST /v1/credentials` — Issue (or idempotently re-return) a
//!   credential for a completed course.
//! - `GET /v1/credentials` — The caller's credentials, newest first.
//! - `GET /v1/credentials/:id/document` — The certificate PDF,
//!   owner-only.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use certo_core::{CourseId, CredentialId, VerificationCode};
use certo_render::CertificateData;
use certo_store::{CompletionSnapshot, CredentialRecord};

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::extractors::extract_json;
use crate::issuance::{self, IssueOutcome};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request body for credential issuance.
#[derive(Debug, Deserialize, ToSchema)]
pub struct IssueCredentialRequest {
    /// The course to issue a credential for.
    #[schema(value_type = Uuid)]
    pub course_id: CourseId,
}

/// A credential as returned to its holder.
///
/// The completion snapshot comes from the immutable record; the course
/// title is resolved from the directory at response time and omitted if
/// the directory has no display entry.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CredentialView {
    /// Credential identifier.
    #[schema(value_type = Uuid)]
    pub id: CredentialId,
    /// The course the credential attests.
    #[schema(value_type = Uuid)]
    pub course_id: CourseId,
    /// The public verification code.
    #[schema(value_type = String)]
    pub verification_code: VerificationCode,
    /// When the credential was issued.
    pub issued_at: DateTime<Utc>,
    /// Completion metrics frozen at issuance.
    #[schema(value_type = Object)]
    pub snapshot: CompletionSnapshot,
    /// Course title at response time, if the directory knows the course.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_title: Option<String>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the credentials router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/credentials",
            get(list_credentials).post(issue_credential),
        )
        .route("/v1/credentials/:id/document", get(download_document))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Assemble a holder-facing view from a record.
///
/// Directory outages degrade the optional title rather than failing a
/// request whose credential work already committed.
async fn view_of(state: &AppState, record: CredentialRecord) -> CredentialView {
    let course_title = match state.learn.course_display(record.course_id).await {
        Ok(display) => display.map(|d| d.title),
        Err(e) => {
            tracing::warn!(course_id = %record.course_id, error = %e,
                "course display unavailable; returning view without title");
            None
        }
    };

    CredentialView {
        id: record.id,
        course_id: record.course_id,
        verification_code: record.verification_code,
        issued_at: record.issued_at,
        snapshot: record.snapshot,
        course_title,
    }
}

/// POST /v1/credentials — Issue a credential for a completed course.
///
/// Responds 201 whether the credential was created by this call or
/// idempotently re-returned: the response body is identical either way,
/// including the verification code. An incomplete course is a 400
/// `NOT_ELIGIBLE` with structured progress details.
#[utoipa::path(
    post,
    path = "/v1/credentials",
    request_body = IssueCredentialRequest,
    responses(
        (status = 201, description = "Credential issued (or idempotently returned)",
            body = CredentialView),
        (status = 400, description = "Learner has not completed the course (NOT_ELIGIBLE)",
            body = crate::error::ErrorBody),
        (status = 404, description = "Course not found", body = crate::error::ErrorBody),
        (status = 422, description = "Course has no lessons", body = crate::error::ErrorBody),
    ),
    tag = "credentials"
)]
pub async fn issue_credential(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<IssueCredentialRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CredentialView>), AppError> {
    let req = extract_json(body)?;

    match issuance::issue(&state, caller.user_id, req.course_id).await? {
        IssueOutcome::Issued { record, .. } => {
            let view = view_of(&state, record).await;
            Ok((StatusCode::CREATED, Json(view)))
        }
        IssueOutcome::NotEligible(evaluation) => Err(AppError::NotEligible(evaluation)),
    }
}

/// GET /v1/credentials — List the caller's credentials, newest first.
#[utoipa::path(
    get,
    path = "/v1/credentials",
    responses(
        (status = 200, description = "The caller's credentials, newest first",
            body = Vec<CredentialView>),
    ),
    tag = "credentials"
)]
pub async fn list_credentials(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<Vec<CredentialView>>, AppError> {
    let records = state.credentials.list_by_user(caller.user_id);
    let mut views = Vec::with_capacity(records.len());
    for record in records {
        views.push(view_of(&state, record).await);
    }
    Ok(Json(views))
}

/// GET /v1/credentials/:id/document — Download the certificate PDF.
///
/// Owner-only: a credential id belonging to another learner responds
/// 404, identically to an id that does not exist, so the endpoint leaks
/// nothing about which ids are real.
#[utoipa::path(
    get,
    path = "/v1/credentials/{id}/document",
    params(("id" = Uuid, Path, description = "Credential ID")),
    responses(
        (status = 200, description = "Certificate document (application/pdf)"),
        (status = 404, description = "Credential not found (or not owned by the caller)",
            body = crate::error::ErrorBody),
    ),
    tag = "credentials"
)]
pub async fn download_document(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let id = CredentialId::from_uuid(id);
    let record = state
        .credentials
        .find_by_id(id)
        .filter(|record| record.user_id == caller.user_id)
        .ok_or_else(|| AppError::NotFound(format!("credential {id} not found")))?;

    // The document needs real display data; unlike the JSON view there is
    // no degraded rendering, so a directory miss is a retryable outage.
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

    let data = CertificateData {
        recipient_name: recipient.name,
        course_title: course.title,
        course_description: course.description,
        issued_at: record.issued_at,
        verification_code: record.verification_code.clone(),
    };
    let bytes = certo_render::render_certificate(&state.config.issuer, &data)?;

    let disposition = format!(
        "attachment; filename=\"certificate-{}.pdf\"",
        record.verification_code
    );
    let mut response = (StatusCode::OK, bytes).into_response();
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
    response.headers_mut().insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .map_err(|e| AppError::Internal(format!("invalid disposition header: {e}")))?,
    );
    Ok(response)
}
