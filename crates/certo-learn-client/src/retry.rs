//! Bounded retry for transient transport failures.
//!
//! Collaborator services sit behind the usual cluster churn (rolling
//! deploys, connection resets). Transport-level failures are retried a
//! small fixed number of times with exponential backoff; HTTP error
//! statuses are NOT retried here — callers classify those per endpoint.

use std::future::Future;
use std::time::Duration;

/// Retries beyond the initial attempt.
const MAX_RETRIES: u32 = 2;

/// Initial backoff; doubles per retry.
const INITIAL_BACKOFF: Duration = Duration::from_millis(100);

/// Send a request, retrying connect/timeout failures.
///
/// Any response — success or HTTP error status — is returned as-is on
/// first receipt. Only errors where no response arrived are retried.
pub(crate) async fn retry_send<F, Fut>(mut send: F) -> Result<reqwest::Response, reqwest::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    let mut backoff = INITIAL_BACKOFF;
    for _ in 0..MAX_RETRIES {
        match send().await {
            Ok(resp) => return Ok(resp),
            Err(e) if e.is_connect() || e.is_timeout() => {
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }
            Err(e) => return Err(e),
        }
    }
    send().await
}
