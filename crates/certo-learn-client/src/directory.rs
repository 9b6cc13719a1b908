//! Typed client for the user/course directory service (the Identity
//! Source).
//!
//! Display data is resolved at response time, never stored on credential
//! records, so a learner who changes their name sees the new name on
//! both the credential view and the rendered certificate.

use serde::{Deserialize, Serialize};

use certo_core::{CourseId, UserId};

use crate::error::LearnApiError;

/// API path prefix for the directory service.
const API_PREFIX: &str = "directory/api/v1";

/// How a user is displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDisplay {
    /// Full display name.
    pub name: String,
    /// Primary email address. Used on authenticated surfaces only — the
    /// public verification view never exposes it.
    #[serde(default)]
    pub email: Option<String>,
}

/// How a course is displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDisplay {
    /// Course title.
    pub title: String,
    /// Optional longer description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Client for the directory service.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    http: reqwest::Client,
    base_url: url::Url,
}

impl DirectoryClient {
    pub(crate) fn new(http: reqwest::Client, base_url: url::Url) -> Self {
        Self { http, base_url }
    }

    /// Resolve a user's display data.
    ///
    /// Calls `GET {base_url}/directory/api/v1/users/{id}/display`.
    /// Returns `None` when the directory does not know the user.
    pub async fn user_display(
        &self,
        user_id: UserId,
    ) -> Result<Option<UserDisplay>, LearnApiError> {
        let endpoint = format!("GET /users/{user_id}/display");
        let url = format!("{}{}/users/{user_id}/display", self.base_url, API_PREFIX);
        self.fetch_display(endpoint, url).await
    }

    /// Resolve a course's display data.
    ///
    /// Calls `GET {base_url}/directory/api/v1/courses/{id}/display`.
    /// Returns `None` when the directory does not know the course.
    pub async fn course_display(
        &self,
        course_id: CourseId,
    ) -> Result<Option<CourseDisplay>, LearnApiError> {
        let endpoint = format!("GET /courses/{course_id}/display");
        let url = format!("{}{}/courses/{course_id}/display", self.base_url, API_PREFIX);
        self.fetch_display(endpoint, url).await
    }

    /// Shared GET-then-decode path for both display lookups.
    async fn fetch_display<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: String,
        url: String,
    ) -> Result<Option<T>, LearnApiError> {
        let resp = crate::retry::retry_send(|| self.http.get(&url).send())
            .await
            .map_err(|e| LearnApiError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(LearnApiError::ApiError {
                endpoint,
                status,
                body,
            });
        }

        resp.json()
            .await
            .map(Some)
            .map_err(|e| LearnApiError::Deserialization {
                endpoint,
                source: e,
            })
    }
}
