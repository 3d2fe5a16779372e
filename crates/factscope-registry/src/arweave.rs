//! Arweave gateway client: fetches archive bundles by transaction id.

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use tracing::debug;

use factscope_archive::{ArchiveError, ArchiveResult, BundleFetcher, ContentId, ExtractLimits};

use crate::client::{self, HttpBackend};
use crate::error::{transport_error, RegistryResult};
use crate::types::{ExplorerConfig, RetryPolicy};

/// Bundle fetcher backed by an Arweave gateway (`GET {gateway}/{id}`).
///
/// Fetches are never retried.
#[derive(Debug, Clone)]
pub struct ArweaveClient {
    http: HttpBackend,
    max_bundle_bytes: u64,
}

impl ArweaveClient {
    pub fn new(config: &ExplorerConfig) -> RegistryResult<Self> {
        Ok(Self {
            http: client::backend(&config.arweave_url, config.timeout_secs)?,
            max_bundle_bytes: ExtractLimits::default().max_bundle_bytes,
        })
    }

    /// Refuse bodies larger than `max` bytes.
    pub fn with_max_bundle_bytes(mut self, max: u64) -> Self {
        self.max_bundle_bytes = max;
        self
    }

    fn too_large(&self, size: u64) -> ArchiveError {
        ArchiveError::LimitExceeded {
            message: format!(
                "bundle is {} bytes, limit is {}",
                size, self.max_bundle_bytes
            ),
        }
    }
}

/// Bundles are served as tar or gzip; anything else (HTML error pages,
/// JSON manifests) is not an archive.
fn is_bundle_content_type(content_type: &str) -> bool {
    content_type.contains("x-tar") || content_type.contains("gzip")
}

#[async_trait]
impl BundleFetcher for ArweaveClient {
    async fn fetch_bundle(&self, id: &ContentId) -> ArchiveResult<Bytes> {
        let url = self.http.url(id.as_str());
        let mut response = self.http.get(&url, &RetryPolicy::none()).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        if !content_type.as_deref().is_some_and(is_bundle_content_type) {
            return Err(ArchiveError::UnexpectedFormat { content_type });
        }

        let declared = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        if let Some(declared) = declared.filter(|d| *d > self.max_bundle_bytes) {
            return Err(self.too_large(declared));
        }

        let mut body = BytesMut::new();
        while let Some(chunk) = response.chunk().await.map_err(transport_error)? {
            let size = (body.len() + chunk.len()) as u64;
            if size > self.max_bundle_bytes {
                return Err(self.too_large(size));
            }
            body.extend_from_slice(&chunk);
        }

        if body.is_empty() {
            return Err(ArchiveError::Retrieval {
                status: None,
                message: format!("empty bundle body from {}", url),
            });
        }

        debug!(id = %id, bytes = body.len(), content_type = ?content_type, "bundle downloaded");
        Ok(body.freeze())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_content_types() {
        assert!(is_bundle_content_type("application/x-tar"));
        assert!(is_bundle_content_type("application/gzip"));
        assert!(is_bundle_content_type("application/x-gzip; charset=binary"));
        assert!(!is_bundle_content_type("text/html; charset=utf-8"));
        assert!(!is_bundle_content_type("application/json"));
    }
}
