//! Learning platform client configuration.
//!
//! Configures base URLs for each collaborator service. Override via
//! environment variables or explicit construction for staging/testing.

use url::Url;

/// Configuration for connecting to the learning platform services.
///
/// Custom `Debug` implementation redacts the `api_token` field to
/// prevent credential leakage in log output.
#[derive(Clone)]
pub struct LearnApiConfig {
    /// Base URL for the course catalog service.
    pub catalog_url: Url,
    /// Base URL for the lesson progress service.
    pub progress_url: Url,
    /// Base URL for the user/course directory service.
    pub directory_url: Url,
    /// Bearer token for service-to-service authentication.
    pub api_token: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for LearnApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LearnApiConfig")
            .field("catalog_url", &self.catalog_url)
            .field("progress_url", &self.progress_url)
            .field("directory_url", &self.directory_url)
            .field("api_token", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl LearnApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `LEARN_CATALOG_URL` (default: `http://catalog.learn.svc:8080`)
    /// - `LEARN_PROGRESS_URL` (default: `http://progress.learn.svc:8080`)
    /// - `LEARN_DIRECTORY_URL` (default: `http://directory.learn.svc:8080`)
    /// - `LEARN_API_TOKEN` (required)
    /// - `LEARN_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_token = std::env::var("LEARN_API_TOKEN").map_err(|_| ConfigError::MissingToken)?;

        Ok(Self {
            catalog_url: env_url("LEARN_CATALOG_URL", "http://catalog.learn.svc:8080")?,
            progress_url: env_url("LEARN_PROGRESS_URL", "http://progress.learn.svc:8080")?,
            directory_url: env_url("LEARN_DIRECTORY_URL", "http://directory.learn.svc:8080")?,
            api_token,
            timeout_secs: std::env::var("LEARN_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        })
    }

    /// Create a configuration pointing to local mock servers (for testing).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if the localhost URL cannot be
    /// parsed (should not occur for valid port numbers, but avoids
    /// `expect()`).
    pub fn local_mock(base_port: u16, token: &str) -> Result<Self, ConfigError> {
        let make_url = |port: u16| -> Result<Url, ConfigError> {
            Url::parse(&format!("http://127.0.0.1:{port}"))
                .map_err(|e| ConfigError::InvalidUrl("localhost".to_string(), e.to_string()))
        };
        Ok(Self {
            catalog_url: make_url(base_port)?,
            progress_url: make_url(base_port + 1)?,
            directory_url: make_url(base_port + 2)?,
            api_token: token.to_string(),
            timeout_secs: 5,
        })
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `LEARN_API_TOKEN` was not set.
    #[error("LEARN_API_TOKEN environment variable is required")]
    MissingToken,
    /// A base URL failed to parse.
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_mock_builds_valid_config() {
        let cfg = LearnApiConfig::local_mock(9300, "test-token").unwrap();
        assert_eq!(cfg.api_token, "test-token");
        assert_eq!(cfg.timeout_secs, 5);
        assert_eq!(cfg.catalog_url.as_str(), "http://127.0.0.1:9300/");
        assert_eq!(cfg.progress_url.as_str(), "http://127.0.0.1:9301/");
        assert_eq!(cfg.directory_url.as_str(), "http://127.0.0.1:9302/");
    }

    #[test]
    fn env_url_uses_default_when_var_absent() {
        let url = env_url("NONEXISTENT_VAR_98765", "https://example.com").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn env_url_rejects_invalid_url() {
        std::env::set_var("TEST_BAD_URL_LC", "not a url");
        let result = env_url("TEST_BAD_URL_LC", "https://example.com");
        std::env::remove_var("TEST_BAD_URL_LC");
        assert!(result.is_err());
    }

    #[test]
    fn debug_redacts_token() {
        let cfg = LearnApiConfig::local_mock(9300, "super-secret").unwrap();
        let debug = format!("{cfg:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
