//! Typed client for the course catalog service.
//!
//! The catalog owns course shape: an ordered set of modules, each an
//! ordered set of lesson ids. Certo reads it for exactly one purpose —
//! enumerating the lessons a course requires, which is the denominator
//! of completion evaluation.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use certo_core::{CourseId, LessonId, ModuleId};

use crate::error::LearnApiError;

/// API path prefix for the catalog service.
const API_PREFIX: &str = "catalog/api/v1";

/// A module within a course outline: an ordered group of lessons.
///
/// Fields use `#[serde(default)]` for resilience against schema
/// evolution in the live catalog service; additional fields the service
/// returns are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleOutline {
    /// Module identifier.
    pub id: ModuleId,
    /// Lesson ids in presentation order.
    #[serde(default)]
    pub lesson_ids: Vec<LessonId>,
}

/// The shape of a course as the catalog reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseOutline {
    /// Course identifier.
    pub id: CourseId,
    /// Modules in presentation order.
    #[serde(default)]
    pub modules: Vec<ModuleOutline>,
}

impl CourseOutline {
    /// Flatten the outline into the set of required lesson ids.
    ///
    /// Lesson ids repeated across modules (shared lessons) count once.
    pub fn required_lesson_ids(&self) -> HashSet<LessonId> {
        self.modules
            .iter()
            .flat_map(|m| m.lesson_ids.iter().copied())
            .collect()
    }
}

/// Client for the course catalog service.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: url::Url,
}

impl CatalogClient {
    pub(crate) fn new(http: reqwest::Client, base_url: url::Url) -> Self {
        Self { http, base_url }
    }

    /// Fetch a course outline.
    ///
    /// Calls `GET {base_url}/catalog/api/v1/courses/{id}/outline`.
    /// Returns `None` when the catalog does not know the course.
    pub async fn course_outline(
        &self,
        course_id: CourseId,
    ) -> Result<Option<CourseOutline>, LearnApiError> {
        let endpoint = format!("GET /courses/{course_id}/outline");
        let url = format!(
            "{}{}/courses/{course_id}/outline",
            self.base_url, API_PREFIX
        );

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

#[cfg(test)]
mod tests {
    use super::*;

    fn outline_with(lessons_per_module: &[usize]) -> CourseOutline {
        CourseOutline {
            id: CourseId::new(),
            modules: lessons_per_module
                .iter()
                .map(|&n| ModuleOutline {
                    id: ModuleId::new(),
                    lesson_ids: (0..n).map(|_| LessonId::new()).collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn required_lessons_flatten_across_modules() {
        let outline = outline_with(&[3, 3, 3, 3, 3]);
        assert_eq!(outline.required_lesson_ids().len(), 15);
    }

    #[test]
    fn shared_lessons_count_once() {
        let shared = LessonId::new();
        let outline = CourseOutline {
            id: CourseId::new(),
            modules: vec![
                ModuleOutline {
                    id: ModuleId::new(),
                    lesson_ids: vec![shared, LessonId::new()],
                },
                ModuleOutline {
                    id: ModuleId::new(),
                    lesson_ids: vec![shared],
                },
            ],
        };
        assert_eq!(outline.required_lesson_ids().len(), 2);
    }

    #[test]
    fn empty_course_has_no_required_lessons() {
        let outline = outline_with(&[]);
        assert!(outline.required_lesson_ids().is_empty());
    }

    #[test]
    fn outline_deserializes_from_camel_case() {
        let json = serde_json::json!({
            "id": uuid::Uuid::new_v4(),
            "modules": [
                { "id": uuid::Uuid::new_v4(), "lessonIds": [uuid::Uuid::new_v4()] },
                { "id": uuid::Uuid::new_v4() }
            ]
        });
        let outline: CourseOutline = serde_json::from_value(json).unwrap();
        assert_eq!(outline.modules.len(), 2);
        assert_eq!(outline.modules[0].lesson_ids.len(), 1);
        // Missing lessonIds defaults to empty, not an error.
        assert!(outline.modules[1].lesson_ids.is_empty());
    }
}
