//! Error types for learning platform API calls.

use thiserror::Error;

/// Errors from learning platform API calls.
///
/// `Http` and `ApiError` are infrastructure failures the caller may
/// retry; `Deserialization` indicates a contract mismatch between this
/// client and the deployed collaborator and is not retryable.
#[derive(Error, Debug)]
pub enum LearnApiError {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("HTTP request to {endpoint} failed: {source}")]
    Http {
        /// The logical endpoint, e.g. `GET /courses/{id}/outline`.
        endpoint: String,
        /// The underlying reqwest error.
        source: reqwest::Error,
    },

    /// The collaborator returned a non-success status.
    #[error("{endpoint} returned status {status}: {body}")]
    ApiError {
        /// The logical endpoint.
        endpoint: String,
        /// HTTP status code returned.
        status: u16,
        /// Response body, for operator diagnostics.
        body: String,
    },

    /// The response body did not match the expected schema.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        /// The logical endpoint.
        endpoint: String,
        /// The underlying reqwest error.
        source: reqwest::Error,
    },

    /// Client construction or configuration failure.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl LearnApiError {
    /// Whether a retry of the same call could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { .. } => true,
            Self::ApiError { status, .. } => *status >= 500,
            Self::Deserialization { .. } | Self::Config(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_carries_context() {
        let err = LearnApiError::ApiError {
            endpoint: "GET /courses/abc/outline".to_string(),
            status: 502,
            body: "bad gateway".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("GET /courses/abc/outline"));
        assert!(msg.contains("502"));
        assert!(msg.contains("bad gateway"));
    }

    #[test]
    fn retryability_classification() {
        let server_side = LearnApiError::ApiError {
            endpoint: "x".into(),
            status: 503,
            body: String::new(),
        };
        assert!(server_side.is_retryable());

        let client_side = LearnApiError::ApiError {
            endpoint: "x".into(),
            status: 400,
            body: String::new(),
        };
        assert!(!client_side.is_retryable());

        let config = LearnApiError::Config(crate::config::ConfigError::MissingToken);
        assert!(!config.is_retryable());
    }
}
