//! Collaborator seams of the archive pipeline.
//!
//! The pipeline itself is pure; everything it needs from the outside world
//! (the object store holding bundles, the record store holding the source
//! roster, and wherever failures get reported) comes in through these traits
//! so tests and the CLI can plug in local implementations.

use crate::error::{ArchiveError, ArchiveResult};
use crate::types::{ContentId, Source};
use async_trait::async_trait;
use bytes::Bytes;

/// Fetches raw bundle bytes from the object store.
#[async_trait]
pub trait BundleFetcher: Send + Sync {
    /// Download a bundle by content id.
    ///
    /// # Returns
    ///
    /// - `Ok(Bytes)` with the (still compressed) bundle
    /// - `Err(ArchiveError::Retrieval)` on transport failure or non-success status
    /// - `Err(ArchiveError::UnexpectedFormat)` if the store does not label it tar/gzip
    async fn fetch_bundle(&self, id: &ContentId) -> ArchiveResult<Bytes>;
}

/// Supplies the known data sources for a network.
#[async_trait]
pub trait SourceRoster: Send + Sync {
    async fn sources(&self, network_id: &str) -> ArchiveResult<Vec<Source>>;
}

/// Sink for failures the pipeline swallows.
pub trait ErrorReporter: Send + Sync {
    /// Record `err` and return the id it was filed under.
    fn report(&self, context: &str, err: &ArchiveError) -> String;
}

/// Reports through `tracing` at error level under a fresh UUID.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, context: &str, err: &ArchiveError) -> String {
        let error_id = uuid::Uuid::new_v4().to_string();
        tracing::error!(
            error_id = %error_id,
            class = %err.class(),
            error = %err,
            "{}",
            context
        );
        error_id
    }
}

/// A fixed roster, the same for every network.
#[derive(Debug, Clone, Default)]
pub struct StaticRoster {
    sources: Vec<Source>,
}

impl StaticRoster {
    pub fn new(sources: Vec<Source>) -> Self {
        Self { sources }
    }

    /// Parse a roster from the record store's JSON list format.
    pub fn from_json(json: &str) -> ArchiveResult<Self> {
        let sources = serde_json::from_str(json).map_err(|e| ArchiveError::Roster {
            message: format!("invalid roster JSON: {}", e),
        })?;
        Ok(Self { sources })
    }
}

#[async_trait]
impl SourceRoster for StaticRoster {
    async fn sources(&self, _network_id: &str) -> ArchiveResult<Vec<Source>> {
        Ok(self.sources.clone())
    }
}
