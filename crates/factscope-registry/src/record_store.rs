//! Record store client: the per-network source roster.

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use factscope_archive::{ArchiveError, ArchiveResult, Source, SourceRoster};

use crate::client::{self, HttpBackend};
use crate::error::{transport_error, RegistryResult};
use crate::types::{ExplorerConfig, RetryPolicy};

/// Source roster served by the record store at
/// `GET {db_host}/api/explorer/sources/{network_id}`.
///
/// Transient failures are retried under the configured fixed policy.
#[derive(Debug, Clone)]
pub struct RecordStoreClient {
    http: HttpBackend,
    retry: RetryPolicy,
}

impl RecordStoreClient {
    pub fn new(config: &ExplorerConfig) -> RegistryResult<Self> {
        Ok(Self {
            http: client::backend(&config.db_host, config.timeout_secs)?,
            retry: config.roster_retry_policy(),
        })
    }

    /// `{db_host}/api/explorer/sources/{network_id}`, with the network id
    /// percent-encoded as a single path segment.
    fn sources_url(&self, network_id: &str) -> ArchiveResult<Url> {
        let invalid = |message: String| ArchiveError::Roster { message };
        let mut url = Url::parse(&self.http.base_url)
            .map_err(|e| invalid(format!("invalid record store URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|()| {
                invalid(format!("record store URL {} cannot be a base", self.http.base_url))
            })?
            .pop_if_empty()
            .extend(["api", "explorer", "sources", network_id]);
        Ok(url)
    }
}

#[async_trait]
impl SourceRoster for RecordStoreClient {
    async fn sources(&self, network_id: &str) -> ArchiveResult<Vec<Source>> {
        let url = self.sources_url(network_id)?;
        let response = self.http.get(url.as_str(), &self.retry).await?;
        let body = response.text().await.map_err(transport_error)?;

        let sources: Vec<Source> = serde_json::from_str(&body).map_err(|e| ArchiveError::Roster {
            message: format!("invalid roster from {}: {}", url, e),
        })?;

        debug!(network_id, sources = sources.len(), "source roster loaded");
        Ok(sources)
    }
}
