//! Typed client for the lesson progress service (the Progress Source).
//!
//! Progress is the one input Certo must never cache: eligibility is
//! re-evaluated from a fresh completion set on every issuance attempt,
//! so a learner who just finished their last lesson is eligible on the
//! very next call.

use std::collections::HashSet;

use serde::Deserialize;

use certo_core::{CourseId, LessonId, UserId};

use crate::error::LearnApiError;

/// API path prefix for the progress service.
const API_PREFIX: &str = "progress/api/v1";

/// Response from the completed-lessons endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompletedLessonsResponse {
    #[serde(default)]
    lesson_ids: Vec<LessonId>,
}

/// Client for the lesson progress service.
#[derive(Debug, Clone)]
pub struct ProgressClient {
    http: reqwest::Client,
    base_url: url::Url,
}

impl ProgressClient {
    pub(crate) fn new(http: reqwest::Client, base_url: url::Url) -> Self {
        Self { http, base_url }
    }

    /// Fetch the set of lesson ids a learner has completed in a course.
    ///
    /// Calls `GET {base_url}/progress/api/v1/users/{user}/courses/{course}/completed-lessons`.
    /// An unknown user or course yields an empty set — the progress
    /// service reports completion facts, not enrollment existence.
    pub async fn completed_lesson_ids(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<HashSet<LessonId>, LearnApiError> {
        let endpoint = format!("GET /users/{user_id}/courses/{course_id}/completed-lessons");
        let url = format!(
            "{}{}/users/{user_id}/courses/{course_id}/completed-lessons",
            self.base_url, API_PREFIX
        );

        let resp = crate::retry::retry_send(|| self.http.get(&url).send())
            .await
            .map_err(|e| LearnApiError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(HashSet::new());
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

        let body: CompletedLessonsResponse =
            resp.json()
                .await
                .map_err(|e| LearnApiError::Deserialization {
                    endpoint,
                    source: e,
                })?;

        Ok(body.lesson_ids.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_deserializes_and_dedupes() {
        let lesson = uuid::Uuid::new_v4();
        let json = serde_json::json!({ "lessonIds": [lesson, lesson, uuid::Uuid::new_v4()] });
        let body: CompletedLessonsResponse = serde_json::from_value(json).unwrap();
        let set: HashSet<LessonId> = body.lesson_ids.into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn missing_lesson_ids_defaults_to_empty() {
        let body: CompletedLessonsResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(body.lesson_ids.is_empty());
    }
}
