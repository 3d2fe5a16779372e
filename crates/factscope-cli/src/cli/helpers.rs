//! Wiring shared by the archive commands: configuration, limits and the
//! collaborators behind `ArchiveService`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use factscope_archive::{
    ArchiveError, ArchiveResult, ArchiveService, BundleFetcher, ContentId, ExtractLimits,
    ExtractLimitsOverrides, SourceRoster, StaticRoster, STORAGE_URN_PREFIX,
};
use factscope_registry::{ArweaveClient, ExplorerConfig, RecordStoreClient};

use super::args::{InterpretArgs, RemoteArgs};

/// Serves one bundle from disk, whatever content id is asked for.
#[derive(Debug, Clone)]
pub struct FileBundleFetcher {
    path: PathBuf,
}

impl FileBundleFetcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl BundleFetcher for FileBundleFetcher {
    async fn fetch_bundle(&self, _id: &ContentId) -> ArchiveResult<Bytes> {
        let data = tokio::fs::read(&self.path)
            .await
            .map_err(|e| ArchiveError::Retrieval {
                status: None,
                message: format!("failed to read {}: {}", self.path.display(), e),
            })?;
        Ok(Bytes::from(data))
    }
}

/// Storage URN for a local bundle: the file name without its archive
/// extension, under the Arweave prefix.
pub fn local_storage_urn(path: &Path) -> String {
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("bundle");
    let id = [".tar.gz", ".tgz", ".gz", ".tar"]
        .iter()
        .find_map(|ext| name.strip_suffix(ext))
        .unwrap_or(name);
    format!("{}{}", STORAGE_URN_PREFIX, id)
}

/// The storage URN to look up: the explicit one, or one derived from `--bundle`.
pub fn resolve_storage_urn(storage_urn: Option<&str>, bundle: Option<&Path>) -> anyhow::Result<String> {
    match (storage_urn, bundle) {
        (Some(urn), _) => Ok(urn.to_string()),
        (None, Some(path)) => Ok(local_storage_urn(path)),
        (None, None) => anyhow::bail!("either --storage-urn or --bundle is required"),
    }
}

pub fn parse_limits(json: Option<&str>) -> anyhow::Result<ExtractLimits> {
    let defaults = ExtractLimits::default();
    let Some(json) = json else {
        return Ok(defaults);
    };
    let overrides: ExtractLimitsOverrides =
        serde_json::from_str(json).context("invalid --limits JSON")?;
    Ok(defaults.apply(overrides))
}

pub fn explorer_config(remote: &RemoteArgs) -> anyhow::Result<ExplorerConfig> {
    let mut config = ExplorerConfig::from_env();
    if let Some(url) = &remote.arweave_url {
        config = config.with_arweave_url(url.clone());
    }
    if let Some(host) = &remote.db_host {
        config = config.with_db_host(host.clone());
    }
    if let Some(secs) = remote.http_timeout {
        config = config.with_timeout_secs(secs);
    }
    config.validate()?;
    Ok(config)
}

/// Assemble the service. Remote clients are only built for the collaborators
/// not replaced by a local file.
pub fn build_service(
    bundle: Option<&Path>,
    interpret: &InterpretArgs,
    remote: &RemoteArgs,
) -> anyhow::Result<ArchiveService> {
    let limits = parse_limits(interpret.limits.as_deref())?;

    let needs_remote = bundle.is_none() || interpret.sources.is_none();
    let config = if needs_remote {
        Some(explorer_config(remote)?)
    } else {
        None
    };

    let fetcher: Arc<dyn BundleFetcher> = match (bundle, &config) {
        (Some(path), _) => Arc::new(FileBundleFetcher::new(path)),
        (None, Some(config)) => Arc::new(
            ArweaveClient::new(config)?.with_max_bundle_bytes(limits.max_bundle_bytes),
        ),
        (None, None) => anyhow::bail!("no bundle source configured"),
    };

    let roster: Arc<dyn SourceRoster> = match (&interpret.sources, &config) {
        (Some(path), _) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read sources: {}", path.display()))?;
            Arc::new(StaticRoster::from_json(&json)?)
        }
        (None, Some(config)) => Arc::new(RecordStoreClient::new(config)?),
        (None, None) => anyhow::bail!("no source roster configured"),
    };

    Ok(ArchiveService::new(fetcher, roster).with_limits(limits))
}
