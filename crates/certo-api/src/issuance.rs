//! # Credential Issuance
//!
//! The orchestration at the center of the service: resolve what the
//! course requires, resolve what the learner has completed, evaluate,
//! and — exactly once per (user, course) — mint a credential.
//!
//! ## Idempotence & concurrency
//!
//! The store's atomic `create_if_absent` is the sole synchronization
//! primitive. No lock is held across an await: both collaborator reads
//! complete before the store is touched, and the durable write-through
//! happens after the in-memory create has already decided the winner.
//! Re-running the flow after eligibility never mints a second credential
//! or a second verification code.
//!
//! ## Eligibility is an outcome, not an error
//!
//! A learner at 80% is a normal, expected result the UI must be able to
//! display, so [`IssueOutcome::NotEligible`] carries the full evaluation
//! back to the route layer, which converts it into the structured
//! `NOT_ELIGIBLE` response.

use certo_completion::{CompletionError, Evaluation};
use certo_core::{CourseId, UserId};
use certo_store::{CompletionSnapshot, CredentialRecord};

use crate::db;
use crate::error::AppError;
use crate::state::AppState;

/// Result of an issuance attempt that did not fail outright.
#[derive(Debug)]
pub enum IssueOutcome {
    /// The learner holds a credential — minted by this call
    /// (`was_created`) or returned idempotently from an earlier one.
    Issued {
        /// The credential record.
        record: CredentialRecord,
        /// Whether this call created the record.
        was_created: bool,
    },
    /// The learner has not completed the course. Carries the evaluation
    /// so callers can show concrete progress.
    NotEligible(Evaluation),
}

/// Run the issuance flow for one learner and course.
///
/// Progress is read fresh on every attempt — a learner who just finished
/// their last lesson is eligible on the very next call. Completion
/// metrics are frozen into the record's snapshot at creation; later
/// course edits never alter an issued credential.
pub async fn issue(
    state: &AppState,
    user_id: UserId,
    course_id: CourseId,
) -> Result<IssueOutcome, AppError> {
    let outline = state
        .learn
        .course_outline(course_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("course {course_id} not found")))?;
    let required = outline.required_lesson_ids();

    let completed = state.learn.completed_lesson_ids(user_id, course_id).await?;

    let evaluation = match certo_completion::evaluate(&required, &completed) {
        Ok(evaluation) => evaluation,
        Err(CompletionError::NoContent) => {
            return Err(AppError::Validation(format!(
                "course {course_id} has no lessons; a credential can never be issued for it"
            )));
        }
        Err(other) => return Err(AppError::Internal(other.to_string())),
    };

    if !evaluation.eligible {
        return Ok(IssueOutcome::NotEligible(evaluation));
    }

    let (record, was_created) =
        state
            .credentials
            .create_if_absent(user_id, course_id, CompletionSnapshot::from(evaluation))?;

    if was_created {
        tracing::info!(
            user_id = %user_id,
            course_id = %course_id,
            credential_id = %record.id,
            percentage = record.snapshot.percentage,
            "credential issued"
        );
    }

    // Durable write-through runs on every successful issuance, not only
    // on first creation: `ON CONFLICT DO NOTHING` is idempotent, so a
    // write that failed last time is healed by the caller's retry.
    if let Some(pool) = &state.db_pool {
        db::credentials::insert_if_absent(pool, &record)
            .await
            .map_err(|e| {
                AppError::ServiceUnavailable(format!("credential persistence failed: {e}"))
            })?;
    }

    Ok(IssueOutcome::Issued {
        record,
        was_created,
    })
}
