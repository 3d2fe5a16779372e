//! HTTP layer: status mapping and retry.
//!
//! This is the ONLY place for status code handling. The clients never
//! interpret status codes.

use reqwest::StatusCode;
use tracing::{debug, warn};

use factscope_archive::{ArchiveError, ArchiveResult};

use crate::error::transport_error;
use crate::types::RetryPolicy;

/// HTTP backend for making requests (holds reqwest client and base URL).
#[derive(Debug, Clone)]
pub(crate) struct HttpBackend {
    pub(crate) client: reqwest::Client,
    pub(crate) base_url: String,
}

impl HttpBackend {
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET `url`, retrying transient failures per `policy`.
    pub(crate) async fn get(&self, url: &str, policy: &RetryPolicy) -> ArchiveResult<reqwest::Response> {
        let max_attempts = policy.attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.get_once(url).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    warn!(
                        error = %e,
                        url = %url,
                        attempt = attempt,
                        max_attempts = max_attempts,
                        delay_ms = policy.delay.as_millis() as u64,
                        "retrying request"
                    );
                    attempt += 1;
                    tokio::time::sleep(policy.delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn get_once(&self, url: &str) -> ArchiveResult<reqwest::Response> {
        debug!(url = %url, "GET");
        let response = self.client.get(url).send().await.map_err(transport_error)?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let message = match status {
            StatusCode::NOT_FOUND => format!("not found: {}", url),
            StatusCode::TOO_MANY_REQUESTS => "rate limited".to_string(),
            _ => {
                let body = response.text().await.unwrap_or_default();
                let body = body.trim();
                if body.is_empty() {
                    status.to_string()
                } else {
                    body.chars().take(200).collect()
                }
            }
        };

        Err(ArchiveError::Retrieval {
            status: Some(status.as_u16()),
            message,
        })
    }
}
