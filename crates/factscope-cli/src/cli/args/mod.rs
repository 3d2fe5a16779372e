use clap::{Parser, Subcommand};

pub mod archive;
pub mod common;
pub use archive::*;
pub use common::*;

#[derive(Parser)]
#[command(
    name = "factscope",
    version,
    about = "Explore the archival bundles behind published Orcfax fact statements"
)]
pub struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true, env = "FACTSCOPE_LOG_JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Inspect or export a fact's archive bundle
    Archive(ArchiveArgs),
    Version,
}
