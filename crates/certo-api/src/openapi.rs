//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Certo — Course Credential Service",
        version = "0.3.2",
        description = "Credential issuance, public verification, and certificate document rendering for the learning platform.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        crate::routes::credentials::issue_credential,
        crate::routes::credentials::list_credentials,
        crate::routes::credentials::download_document,
        crate::routes::verify::verify_credential,
    ),
    components(schemas(
        // DTOs
        crate::routes::credentials::IssueCredentialRequest,
        crate::routes::credentials::CredentialView,
        crate::routes::verify::VerifyResponse,
        crate::routes::verify::VerifiedRecipient,
        crate::routes::verify::VerifiedCourse,
        // Error types
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "credentials", description = "Credential issuance and documents (authenticated)"),
        (name = "verify", description = "Public credential verification"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_contains_all_routes() {
        let spec = ApiDoc::openapi();
        let paths: Vec<&String> = spec.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| p.as_str() == "/v1/credentials"));
        assert!(paths
            .iter()
            .any(|p| p.as_str() == "/v1/credentials/{id}/document"));
        assert!(paths.iter().any(|p| p.as_str() == "/verify/{code}"));
    }
}
