//! # certo-completion — Completion Evaluation
//!
//! The pure leaf of the credential pipeline: given the set of lesson ids a
//! course requires and the set a learner has completed, decide whether a
//! credential may be issued and at what completion percentage.
//!
//! This crate has no side effects and no I/O. Evaluation is deterministic
//! and safe to call repeatedly and concurrently; everything stateful
//! (progress queries, credential persistence) lives in the layers above.
//!
//! ## Policy
//!
//! The default policy requires *all* lessons — a learner at 14 of 15 is
//! not eligible. [`CompletionPolicy::PercentThreshold`] exists as an
//! explicit opt-in for embedders that want a lower bar; nothing in this
//! workspace substitutes it silently.
//!
//! ## Degenerate courses
//!
//! A course with zero required lessons can never produce a credential.
//! Evaluating an empty required set fails with [`CompletionError::NoContent`]
//! rather than producing a vacuous 100%.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use certo_core::LessonId;

/// Errors from completion evaluation.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CompletionError {
    /// The course has no required lessons, so no completion ratio exists.
    #[error("course has no lessons; completion cannot be evaluated")]
    NoContent,

    /// A percent-threshold policy was constructed with a value above 100.
    #[error("invalid completion threshold {0} (expected 0–100)")]
    InvalidThreshold(u8),
}

/// Eligibility policy applied by [`evaluate_with_policy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionPolicy {
    /// Every required lesson must be completed. This is the source
    /// behavior and the only policy the HTTP surface exposes.
    #[default]
    AllLessons,
    /// Eligible once the completion percentage reaches the given value.
    /// Validated at evaluation time; values above 100 are rejected.
    PercentThreshold(u8),
}

/// The outcome of evaluating a learner's progress against a course.
///
/// `percentage` is floor(100 × completed / total), so a learner one
/// lesson short of a large course still reads 99, never a rounded 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Whether the policy is satisfied.
    pub eligible: bool,
    /// Number of required lessons the learner has completed.
    pub completed_count: usize,
    /// Number of lessons the course requires.
    pub total_count: usize,
    /// floor(100 × completed_count / total_count).
    pub percentage: u8,
}

/// Evaluate with the default [`CompletionPolicy::AllLessons`] policy.
///
/// See [`evaluate_with_policy`] for the full contract.
pub fn evaluate(
    required: &HashSet<LessonId>,
    completed: &HashSet<LessonId>,
) -> Result<Evaluation, CompletionError> {
    evaluate_with_policy(required, completed, CompletionPolicy::AllLessons)
}

/// Evaluate a learner's completed lesson set against a course's required
/// lesson set.
///
/// Only lessons in the required set count: stray completed ids (lessons
/// removed from the course, or ids from another course) do not inflate
/// the numerator. An empty required set fails with
/// [`CompletionError::NoContent`].
pub fn evaluate_with_policy(
    required: &HashSet<LessonId>,
    completed: &HashSet<LessonId>,
    policy: CompletionPolicy,
) -> Result<Evaluation, CompletionError> {
    let total_count = required.len();
    if total_count == 0 {
        return Err(CompletionError::NoContent);
    }

    let completed_count = required.intersection(completed).count();
    let percentage = (100 * completed_count / total_count) as u8;

    let eligible = match policy {
        CompletionPolicy::AllLessons => completed_count == total_count,
        CompletionPolicy::PercentThreshold(threshold) => {
            if threshold > 100 {
                return Err(CompletionError::InvalidThreshold(threshold));
            }
            percentage >= threshold
        }
    };

    Ok(Evaluation {
        eligible,
        completed_count,
        total_count,
        percentage,
    })
}
