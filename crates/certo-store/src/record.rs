//! # Credential Record Types
//!
//! The immutable credential record and the completion snapshot frozen
//! into it at issuance time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use certo_completion::Evaluation;
use certo_core::{CourseId, CredentialId, UserId, VerificationCode};

/// Completion metrics captured at the moment of issuance.
///
/// Stored on the record so that later changes to course content (lessons
/// added or removed) cannot retroactively alter what an already-issued
/// credential attests to. The snapshot is the only course-derived data
/// the record carries; display metadata (titles, names) is resolved at
/// read time instead, to avoid staleness duplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionSnapshot {
    /// Required lessons the learner had completed at issuance.
    pub completed_lessons: u32,
    /// Lessons the course required at issuance.
    pub total_lessons: u32,
    /// floor(100 × completed / total) at issuance. Always 100 under the
    /// default all-lessons policy.
    pub percentage: u8,
}

impl From<Evaluation> for CompletionSnapshot {
    fn from(eval: Evaluation) -> Self {
        Self {
            completed_lessons: eval.completed_count as u32,
            total_lessons: eval.total_count as u32,
            percentage: eval.percentage,
        }
    }
}

/// A course-completion credential.
///
/// Created exactly once by the issuance flow on a successful evaluation;
/// immutable thereafter. The `(user_id, course_id)` pair is the natural
/// key — [`crate::CredentialStore`] guarantees at most one record per
/// pair. `verification_code` is the opaque public handle used by the
/// unauthenticated verification endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Surrogate identifier, assigned at creation.
    pub id: CredentialId,
    /// The learner this credential was issued to.
    pub user_id: UserId,
    /// The course this credential attests completion of.
    pub course_id: CourseId,
    /// Opaque public lookup token. Globally unique, never reused.
    pub verification_code: VerificationCode,
    /// When the credential was created.
    pub issued_at: DateTime<Utc>,
    /// Completion metrics frozen at issuance.
    pub snapshot: CompletionSnapshot,
}
