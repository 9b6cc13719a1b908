//! In-memory learning platform fixture.
//!
//! The fixture backs [`crate::LearnSource::Fixture`] and serves two
//! purposes: it is the test double for every integration test in the
//! workspace, and it is what the API binary falls back to when no
//! collaborator credentials are configured, so `certo-api` runs locally
//! with zero external services.
//!
//! Cloning shares the underlying data, matching the live client's
//! cheap-clone behavior.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;

use certo_core::{CourseId, LessonId, UserId};

use crate::catalog::CourseOutline;
use crate::directory::{CourseDisplay, UserDisplay};

#[derive(Debug, Default)]
struct FixtureData {
    courses: HashMap<CourseId, CourseOutline>,
    completed: HashMap<(UserId, CourseId), HashSet<LessonId>>,
    users: HashMap<UserId, UserDisplay>,
    course_display: HashMap<CourseId, CourseDisplay>,
}

/// In-memory stand-in for the catalog, progress, and directory services.
#[derive(Debug, Default)]
pub struct FixtureLearn {
    data: Arc<RwLock<FixtureData>>,
}

impl Clone for FixtureLearn {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl FixtureLearn {
    /// Create an empty fixture.
    pub fn new() -> Self {
        Self::default()
    }

    // -- Seeding ------------------------------------------------------------

    /// Register a course outline.
    pub fn put_course(&self, outline: CourseOutline) {
        self.data.write().courses.insert(outline.id, outline);
    }

    /// Replace a course's outline (simulates course content edits).
    pub fn replace_course(&self, outline: CourseOutline) {
        self.put_course(outline);
    }

    /// Remove a course entirely.
    pub fn remove_course(&self, course_id: CourseId) {
        let mut data = self.data.write();
        data.courses.remove(&course_id);
        data.course_display.remove(&course_id);
    }

    /// Set the full completed-lesson set for a learner in a course.
    pub fn set_completed(
        &self,
        user_id: UserId,
        course_id: CourseId,
        lessons: impl IntoIterator<Item = LessonId>,
    ) {
        self.data
            .write()
            .completed
            .insert((user_id, course_id), lessons.into_iter().collect());
    }

    /// Mark a single additional lesson completed.
    pub fn complete_lesson(&self, user_id: UserId, course_id: CourseId, lesson_id: LessonId) {
        self.data
            .write()
            .completed
            .entry((user_id, course_id))
            .or_default()
            .insert(lesson_id);
    }

    /// Register a user's display data.
    pub fn put_user(&self, user_id: UserId, display: UserDisplay) {
        self.data.write().users.insert(user_id, display);
    }

    /// Register a course's display data.
    pub fn put_course_display(&self, course_id: CourseId, display: CourseDisplay) {
        self.data.write().course_display.insert(course_id, display);
    }

    // -- Reads (mirror the live client surface) -----------------------------

    /// Course outline, or `None` if unknown.
    pub fn course_outline(&self, course_id: CourseId) -> Option<CourseOutline> {
        self.data.read().courses.get(&course_id).cloned()
    }

    /// Completed lesson set; unknown (user, course) pairs read as empty.
    pub fn completed_lesson_ids(&self, user_id: UserId, course_id: CourseId) -> HashSet<LessonId> {
        self.data
            .read()
            .completed
            .get(&(user_id, course_id))
            .cloned()
            .unwrap_or_default()
    }

    /// User display, or `None` if unknown.
    pub fn user_display(&self, user_id: UserId) -> Option<UserDisplay> {
        self.data.read().users.get(&user_id).cloned()
    }

    /// Course display, or `None` if unknown.
    pub fn course_display(&self, course_id: CourseId) -> Option<CourseDisplay> {
        self.data.read().course_display.get(&course_id).cloned()
    }
}
