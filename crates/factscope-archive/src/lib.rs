//! Fact archive extraction for the factscope explorer.
//!
//! Every published fact statement has an archival bundle: a gzip tar BagIt
//! bag holding the collector messages it was derived from, the validation
//! file that records how the value was calculated, and `bag-info.txt`.
//! This crate turns such a bundle into an explorer view ([`Archive`]) or a
//! download package ([`ArchiveDownload`]).
//!
//! The pipeline is pure apart from the collaborator traits in [`remote`]:
//!
//! ```text
//! fetch -> bundle::read_entries -> tree::tree_from_entries
//!                               -> materialize::materialize_files
//!                                    -> reconcile::reconcile_sources
//!                                    -> validation::interpret
//! ```

pub mod bag_info;
pub mod bundle;
pub mod error;
pub mod materialize;
pub mod reconcile;
pub mod remote;
pub mod service;
pub mod tree;
pub mod types;
pub mod validation;
pub mod viewer;

#[cfg(test)]
pub(crate) mod test_support;

pub use bag_info::{fact_statement_from_files, BagInfo};
pub use bundle::{read_entries, visit_entries, ExtractLimits, ExtractLimitsOverrides};
pub use error::{ArchiveError, ArchiveResult, ErrorClass};
pub use materialize::materialize_files;
pub use reconcile::reconcile_sources;
pub use remote::{BundleFetcher, ErrorReporter, SourceRoster, StaticRoster, TracingReporter};
pub use service::ArchiveService;
pub use tree::{build_directory_tree, tree_from_entries};
pub use types::{
    Archive, ArchiveDetails, ArchiveDownload, ArchivedFile, ContainerEntry, ContentId,
    DirectoryNode, FactRecord, FactStatementStub, FileContent, Source, SourceKind, SourceType,
    STORAGE_URN_PREFIX,
};
pub use viewer::{render_viewer_page, VIEWER_FILE_NAME, VIEWER_TEMPLATE};
