//! Domain types shared by the archive pipeline and its callers.
//!
//! JSON field names are camelCase so an [`Archive`] can be embedded into the
//! viewer page verbatim.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ArchiveError, ArchiveResult};

/// Feed source type, supplied by the caller (never inferred from the bundle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceType {
    #[serde(rename = "CEX")]
    Cex,
    #[serde(rename = "DEX")]
    Dex,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Cex => "CEX",
            SourceType::Dex => "DEX",
        }
    }
}

impl std::str::FromStr for SourceType {
    type Err = ArchiveError;

    fn from_str(value: &str) -> ArchiveResult<Self> {
        match value {
            "CEX" => Ok(SourceType::Cex),
            "DEX" => Ok(SourceType::Dex),
            other => Err(ArchiveError::UnknownSourceType {
                value: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a bundle in the object store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentId(String);

/// Prefix of fact storage URNs pointing into Arweave.
pub const STORAGE_URN_PREFIX: &str = "urn:arweave:";

impl ContentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Parse a fact `storage_urn` (`urn:arweave:<tx>`).
    pub fn from_storage_urn(urn: &str) -> ArchiveResult<Self> {
        match urn.strip_prefix(STORAGE_URN_PREFIX) {
            Some(id) if !id.is_empty() && !id.contains('/') => Ok(Self(id.to_string())),
            _ => Err(ArchiveError::InvalidStorageUrn {
                urn: urn.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One record of the tar container, fully buffered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerEntry {
    /// Entry path as stored in the header; directories end with `/`.
    pub path: String,
    pub is_directory: bool,
    pub content: Vec<u8>,
}

/// Node of the archive directory tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DirectoryNode {
    File {
        name: String,
    },
    Folder {
        name: String,
        nodes: Vec<DirectoryNode>,
    },
}

impl DirectoryNode {
    pub fn name(&self) -> &str {
        match self {
            DirectoryNode::File { name } | DirectoryNode::Folder { name, .. } => name,
        }
    }

    /// Full paths of this node and its descendants, depth first.
    /// Folder paths end with `/`.
    pub fn paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_paths("", &mut out);
        out
    }

    fn collect_paths(&self, prefix: &str, out: &mut Vec<String>) {
        match self {
            DirectoryNode::File { name } => out.push(format!("{prefix}{name}")),
            DirectoryNode::Folder { name, nodes } => {
                let path = format!("{prefix}{name}/");
                out.push(path.clone());
                for node in nodes {
                    node.collect_paths(&path, out);
                }
            }
        }
    }
}

/// Materialized content of a `.txt` or `.json` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileContent {
    Text(String),
    Json(Value),
}

impl FileContent {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            FileContent::Json(value) => Some(value),
            FileContent::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FileContent::Text(text) => Some(text),
            FileContent::Json(_) => None,
        }
    }
}

/// A text or JSON file extracted from the bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedFile {
    /// Full entry path inside the bundle.
    pub name: String,
    /// Last path segment.
    pub file_name: String,
    /// Uppercased extension (`TXT`, `JSON`).
    pub extension: String,
    pub content: FileContent,
}

/// Kind of data provider behind a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    #[serde(rename = "CEX API")]
    CexApi,
    #[serde(rename = "DEX LP")]
    DexLp,
}

/// A known data source from the record store, optionally augmented with the
/// values it contributed to a fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub network: String,
    #[serde(default)]
    pub recipient: String,
    #[serde(default)]
    pub sender: String,
    #[serde(rename = "type", default)]
    pub kind: Option<SourceKind>,
    #[serde(default)]
    pub website: String,
    #[serde(rename = "image_path", default)]
    pub image_path: String,
    #[serde(rename = "background_color", default)]
    pub background_color: String,
    // CEX sources carry asset_pair_value; DEX sources carry base/quote.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_asset_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_asset_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_pair_value: Option<f64>,
}

impl Source {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            network: String::new(),
            recipient: String::new(),
            sender: String::new(),
            kind: None,
            website: String::new(),
            image_path: String::new(),
            background_color: String::new(),
            base_asset_value: None,
            quote_asset_value: None,
            asset_pair_value: None,
        }
    }
}

/// Provenance summary derived from the validation file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveDetails {
    pub sources: Vec<Source>,
    pub collection_timestamp: String,
    #[serde(rename = "collectorNodeID")]
    pub collector_node_id: String,
    pub content_signature: String,
    pub calculation_method: String,
    pub validation_date: String,
    pub source_type: String,
}

/// Fact record as stored in the record store. Only the fields the archive
/// pipeline reads are typed; everything else is carried through in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactRecord {
    #[serde(default)]
    pub id: String,
    pub fact_urn: String,
    #[serde(default)]
    pub storage_urn: String,
    #[serde(default)]
    pub network: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FactRecord {
    pub fn new(fact_urn: impl Into<String>, storage_urn: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            fact_urn: fact_urn.into(),
            storage_urn: storage_urn.into(),
            network: String::new(),
            extra: Map::new(),
        }
    }
}

/// Archive explorer result for one fact.
///
/// `directory_tree`, `files` and `details` are all `None` only when the
/// bundle could not be fetched or decoded at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Archive {
    pub fact: FactRecord,
    pub directory_tree: Option<Vec<DirectoryNode>>,
    pub files: Option<Vec<ArchivedFile>>,
    pub details: Option<ArchiveDetails>,
}

impl Archive {
    pub fn unavailable(fact: FactRecord) -> Self {
        Self {
            fact,
            directory_tree: None,
            files: None,
            details: None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        self.directory_tree.is_none() && self.files.is_none() && self.details.is_none()
    }
}

/// Fact summary reconstructed from `bag-info.txt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactStatementStub {
    pub fact_urn: String,
    pub feed_name: String,
    pub feed_type: String,
    pub value: f64,
    pub inverse_value: f64,
    pub description: String,
    pub inverse_description: String,
    pub validation_date: String,
}

/// Everything needed to package an archive for download.
#[derive(Debug, Clone)]
pub struct ArchiveDownload {
    pub fact: FactStatementStub,
    pub directory_tree: Vec<DirectoryNode>,
    pub files: Vec<ArchivedFile>,
    pub details: Option<ArchiveDetails>,
    /// Every container entry in bundle order, including non-text files.
    pub entries: Vec<ContainerEntry>,
    pub bundle: bytes::Bytes,
}
