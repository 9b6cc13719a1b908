//! # certo-learn-client — Typed Client for the Learning Platform
//!
//! Certo issues credentials *about* data it does not own: which lessons a
//! course requires, which lessons a learner has completed, and how users
//! and courses are displayed. This crate is the only authorized path to
//! that data — route handlers never issue raw HTTP requests.
//!
//! Three collaborator services are consumed, each behind its own
//! sub-client:
//!
//! - **Catalog** — course shape (modules and lesson ids). Supplies the
//!   denominator for completion evaluation.
//! - **Progress** — the set of lesson ids a learner has completed.
//!   Queried fresh on every issuance attempt; never cached here.
//! - **Directory** — user and course display data, resolved at response
//!   time so credential records never duplicate mutable metadata.
//!
//! ## Remote vs fixture
//!
//! [`LearnSource`] dispatches between the live [`LearnClient`] and
//! [`FixtureLearn`], the in-memory implementation used by tests and
//! local development. The API layer holds a `LearnSource`, so every
//! code path above this crate is exercised identically in both modes.

pub mod catalog;
pub mod config;
pub mod directory;
pub mod error;
pub mod fixture;
pub mod progress;
pub(crate) mod retry;

pub use catalog::{CourseOutline, ModuleOutline};
pub use config::LearnApiConfig;
pub use directory::{CourseDisplay, UserDisplay};
pub use error::LearnApiError;
pub use fixture::FixtureLearn;

use std::collections::HashSet;
use std::time::Duration;

use certo_core::{CourseId, LessonId, UserId};

/// Top-level learning platform client. Holds sub-clients for each
/// collaborator service, all sharing one HTTP client with bearer auth.
#[derive(Debug, Clone)]
pub struct LearnClient {
    catalog: catalog::CatalogClient,
    progress: progress::ProgressClient,
    directory: directory::DirectoryClient,
}

impl LearnClient {
    /// Create a new client from configuration.
    pub fn new(config: LearnApiConfig) -> Result<Self, LearnApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::AUTHORIZATION,
                    reqwest::header::HeaderValue::from_str(&format!(
                        "Bearer {}",
                        config.api_token
                    ))
                    .map_err(|_| LearnApiError::Config(config::ConfigError::MissingToken))?,
                );
                headers
            })
            .build()
            .map_err(|e| LearnApiError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            catalog: catalog::CatalogClient::new(http.clone(), config.catalog_url),
            progress: progress::ProgressClient::new(http.clone(), config.progress_url),
            directory: directory::DirectoryClient::new(http, config.directory_url),
        })
    }

    /// Access the catalog sub-client.
    pub fn catalog(&self) -> &catalog::CatalogClient {
        &self.catalog
    }

    /// Access the progress sub-client.
    pub fn progress(&self) -> &progress::ProgressClient {
        &self.progress
    }

    /// Access the directory sub-client.
    pub fn directory(&self) -> &directory::DirectoryClient {
        &self.directory
    }
}

/// The learning platform as seen by the rest of the workspace: either the
/// live HTTP client or the in-memory fixture.
#[derive(Debug, Clone)]
pub enum LearnSource {
    /// Live collaborator services over HTTP.
    Remote(LearnClient),
    /// In-memory fixture for tests and local development.
    Fixture(FixtureLearn),
}

impl LearnSource {
    /// Fetch a course's outline. `None` means the course does not exist.
    pub async fn course_outline(
        &self,
        course_id: CourseId,
    ) -> Result<Option<CourseOutline>, LearnApiError> {
        match self {
            Self::Remote(client) => client.catalog().course_outline(course_id).await,
            Self::Fixture(fixture) => Ok(fixture.course_outline(course_id)),
        }
    }

    /// Fetch the set of lesson ids a learner has completed in a course.
    pub async fn completed_lesson_ids(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<HashSet<LessonId>, LearnApiError> {
        match self {
            Self::Remote(client) => {
                client
                    .progress()
                    .completed_lesson_ids(user_id, course_id)
                    .await
            }
            Self::Fixture(fixture) => Ok(fixture.completed_lesson_ids(user_id, course_id)),
        }
    }

    /// Resolve a user's display data. `None` means the directory does not
    /// know the user.
    pub async fn user_display(
        &self,
        user_id: UserId,
    ) -> Result<Option<UserDisplay>, LearnApiError> {
        match self {
            Self::Remote(client) => client.directory().user_display(user_id).await,
            Self::Fixture(fixture) => Ok(fixture.user_display(user_id)),
        }
    }

    /// Resolve a course's display data. `None` means the directory does
    /// not know the course.
    pub async fn course_display(
        &self,
        course_id: CourseId,
    ) -> Result<Option<CourseDisplay>, LearnApiError> {
        match self {
            Self::Remote(client) => client.directory().course_display(course_id).await,
            Self::Fixture(fixture) => Ok(fixture.course_display(course_id)),
        }
    }
}
