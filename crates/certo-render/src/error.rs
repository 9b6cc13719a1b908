//! Rendering errors.

use thiserror::Error;

/// Errors from certificate rendering.
///
/// All variants are retryable in the sense that rendering never mutates
/// the credential; a failed render can simply be requested again once
/// the offending input is fixed.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RenderError {
    /// A text field exceeds the space the fixed layout reserves for it.
    #[error("{field} exceeds the {max}-character layout limit")]
    FieldTooLong {
        /// Which field overflowed.
        field: &'static str,
        /// The limit that was exceeded.
        max: usize,
    },
}
