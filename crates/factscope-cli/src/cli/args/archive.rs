//! Archive command arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::common::{InterpretArgs, OutputFormat, RemoteArgs};

#[derive(Parser, Debug)]
pub struct ArchiveArgs {
    #[command(subcommand)]
    pub cmd: ArchiveSub,
}

#[derive(Subcommand, Debug)]
pub enum ArchiveSub {
    /// Show the directory tree, files and provenance of an archive
    Inspect(InspectArgs),
    /// Write an archive's entries and a standalone viewer page to a directory
    Export(ExportArgs),
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Storage URN of the fact (urn:arweave:<id>)
    #[arg(long, required_unless_present = "bundle", conflicts_with = "bundle")]
    pub storage_urn: Option<String>,

    /// Read a local .tar.gz bundle instead of fetching from Arweave
    #[arg(long)]
    pub bundle: Option<PathBuf>,

    /// Fact URN shown alongside the archive
    #[arg(long)]
    pub fact_urn: Option<String>,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub interpret: InterpretArgs,

    #[command(flatten)]
    pub remote: RemoteArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Storage URN of the fact (urn:arweave:<id>)
    #[arg(long, required_unless_present = "bundle", conflicts_with = "bundle")]
    pub storage_urn: Option<String>,

    /// Read a local .tar.gz bundle instead of fetching from Arweave
    #[arg(long)]
    pub bundle: Option<PathBuf>,

    /// Output directory (created if missing)
    #[arg(long)]
    pub out: PathBuf,

    /// Viewer page template containing 'DATA_PLACEHOLDER'
    #[arg(long)]
    pub template: Option<PathBuf>,

    #[command(flatten)]
    pub interpret: InterpretArgs,

    #[command(flatten)]
    pub remote: RemoteArgs,
}
