//! Archive assembly.
//!
//! [`ArchiveService`] runs the whole pipeline for one fact: fetch the bundle,
//! decode it once, then derive the directory tree, the materialized files and
//! the provenance details from that single entry list. It never fails; every
//! error is reported and degrades the result instead.
//!
//! | Failure                         | tree | files | details |
//! |---------------------------------|------|-------|---------|
//! | fetch / bad URN / decode        | -    | -     | -       |
//! | materialization                 | yes  | -     | -       |
//! | roster / reconcile / validation | yes  | yes   | -       |

use crate::bag_info::fact_statement_from_files;
use crate::bundle::{read_entries, ExtractLimits};
use crate::error::{ArchiveError, ArchiveResult};
use crate::materialize::materialize_files;
use crate::reconcile::reconcile_sources;
use crate::remote::{BundleFetcher, ErrorReporter, SourceRoster, TracingReporter};
use crate::tree::tree_from_entries;
use crate::types::{
    Archive, ArchiveDetails, ArchiveDownload, ArchivedFile, ContainerEntry, ContentId,
    DirectoryNode, FactRecord, FactStatementStub,
};
use crate::validation;
use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, info};

/// Archive explorer entry point. Cheap to clone and safe to share across
/// concurrent requests; it holds no per-request state.
#[derive(Clone)]
pub struct ArchiveService {
    fetcher: Arc<dyn BundleFetcher>,
    roster: Arc<dyn SourceRoster>,
    reporter: Arc<dyn ErrorReporter>,
    limits: ExtractLimits,
}

impl std::fmt::Debug for ArchiveService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveService")
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

impl ArchiveService {
    /// Service with default limits that reports through `tracing`.
    pub fn new(fetcher: Arc<dyn BundleFetcher>, roster: Arc<dyn SourceRoster>) -> Self {
        Self {
            fetcher,
            roster,
            reporter: Arc::new(TracingReporter),
            limits: ExtractLimits::default(),
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_limits(mut self, limits: ExtractLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Build the explorer view of `fact`'s archive.
    ///
    /// A fact without a storage URN has no archive yet and yields an all-empty
    /// result without reporting anything.
    pub async fn get_archive(&self, fact: &FactRecord, network_id: &str, source_type: &str) -> Archive {
        if fact.storage_urn.is_empty() {
            debug!(fact_urn = %fact.fact_urn, "fact has no storage urn");
            return Archive::unavailable(fact.clone());
        }

        let decoded = match self.fetch_decoded(&fact.storage_urn).await {
            Ok((_, decoded)) => decoded,
            Err(e) => {
                self.reporter.report(
                    &format!("failed to fetch archive for {}", fact.storage_urn),
                    &e,
                );
                return Archive::unavailable(fact.clone());
            }
        };

        let Decoded {
            entries,
            directory_tree,
            files,
        } = decoded;

        let files = match files {
            Ok(files) => files,
            Err(e) => {
                self.reporter.report(
                    &format!("failed to read archive files for {}", fact.storage_urn),
                    &e,
                );
                return Archive {
                    fact: fact.clone(),
                    directory_tree: Some(directory_tree),
                    files: None,
                    details: None,
                };
            }
        };

        let details = self
            .details_or_report(&files, network_id, source_type, &fact.storage_urn)
            .await;

        info!(
            fact_urn = %fact.fact_urn,
            entries = entries.len(),
            files = files.len(),
            details = details.is_some(),
            "archive assembled"
        );

        Archive {
            fact: fact.clone(),
            directory_tree: Some(directory_tree),
            files: Some(files),
            details,
        }
    }

    /// Gather everything the download package needs.
    ///
    /// Unlike [`get_archive`](Self::get_archive), the fact summary comes from
    /// the bag's own `bag-info.txt`, so a bag without a valid one yields
    /// `None`. Missing details only blank the details.
    pub async fn get_archive_download(
        &self,
        storage_urn: &str,
        network_id: &str,
        source_type: &str,
    ) -> Option<ArchiveDownload> {
        let prepared = self.prepare_download(storage_urn).await;
        let (bundle, entries, directory_tree, files, fact) = match prepared {
            Ok(prepared) => prepared,
            Err(e) => {
                self.reporter.report(
                    &format!("failed to fetch archive for {}", storage_urn),
                    &e,
                );
                return None;
            }
        };

        let details = self
            .details_or_report(&files, network_id, source_type, storage_urn)
            .await;

        info!(
            storage_urn,
            entries = entries.len(),
            details = details.is_some(),
            "archive download prepared"
        );

        Some(ArchiveDownload {
            fact,
            directory_tree,
            files,
            details,
            entries,
            bundle,
        })
    }

    /// Provenance details for already materialized files.
    pub async fn details(
        &self,
        files: &[ArchivedFile],
        network_id: &str,
        source_type: &str,
    ) -> ArchiveResult<ArchiveDetails> {
        let roster = self.roster.sources(network_id).await.map_err(|e| match e {
            ArchiveError::Roster { .. } => e,
            other => ArchiveError::Roster {
                message: other.to_string(),
            },
        })?;
        let sources = reconcile_sources(files, &roster)?;
        validation::interpret(files, &sources, source_type)
    }

    async fn details_or_report(
        &self,
        files: &[ArchivedFile],
        network_id: &str,
        source_type: &str,
        storage_urn: &str,
    ) -> Option<ArchiveDetails> {
        match self.details(files, network_id, source_type).await {
            Ok(details) => Some(details),
            Err(e) => {
                self.reporter.report(
                    &format!("failed to derive archive details for {}", storage_urn),
                    &e,
                );
                None
            }
        }
    }

    /// Fetch, then decode on the blocking pool. Decompression is CPU bound
    /// and may run up to `max_decode_bytes`.
    async fn fetch_decoded(&self, storage_urn: &str) -> ArchiveResult<(Bytes, Decoded)> {
        let id = ContentId::from_storage_urn(storage_urn)?;
        let bundle = self.fetcher.fetch_bundle(&id).await?;
        debug!(id = %id, bytes = bundle.len(), "bundle fetched");

        let input = bundle.clone();
        let limits = self.limits;
        let decoded = tokio::task::spawn_blocking(move || decode_bundle(&input, &limits))
            .await
            .map_err(|e| ArchiveError::CorruptArchive {
                message: format!("decode task failed: {}", e),
            })??;
        Ok((bundle, decoded))
    }

    async fn prepare_download(&self, storage_urn: &str) -> ArchiveResult<PreparedDownload> {
        let (bundle, decoded) = self.fetch_decoded(storage_urn).await?;
        let files = decoded.files?;
        let fact = fact_statement_from_files(&files)?;
        Ok((bundle, decoded.entries, decoded.directory_tree, files, fact))
    }
}

type PreparedDownload = (
    Bytes,
    Vec<ContainerEntry>,
    Vec<DirectoryNode>,
    Vec<ArchivedFile>,
    FactStatementStub,
);

/// Everything derived from one decode pass. Materialization may fail on its
/// own without losing the tree.
struct Decoded {
    entries: Vec<ContainerEntry>,
    directory_tree: Vec<DirectoryNode>,
    files: ArchiveResult<Vec<ArchivedFile>>,
}

fn decode_bundle(bundle: &[u8], limits: &ExtractLimits) -> ArchiveResult<Decoded> {
    let entries = read_entries(bundle, limits)?;
    let directory_tree = tree_from_entries(&entries);
    let files = materialize_files(&entries);
    Ok(Decoded {
        entries,
        directory_tree,
        files,
    })
}
