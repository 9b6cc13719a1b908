//! # Validation Errors
//!
//! Structured errors for domain-primitive validation, built with
//! `thiserror`. Errors carry the rejected input so operators can diagnose
//! misconfiguration without guesswork.

use thiserror::Error;

/// Validation errors for domain primitives.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// The string is not a well-formed verification code (expected 22
    /// base64url characters).
    #[error("invalid verification code: \"{0}\" (expected 22 URL-safe base64 characters)")]
    InvalidVerificationCode(String),
}
