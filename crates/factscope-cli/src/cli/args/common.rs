use std::path::PathBuf;

use clap::ValueEnum;

#[derive(ValueEnum, Clone, Debug, Default, PartialEq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Remote endpoints. Unset flags fall back to `ExplorerConfig` defaults.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct RemoteArgs {
    /// Arweave gateway serving archive bundles
    #[arg(long, env = "FACTSCOPE_ARWEAVE_URL")]
    pub arweave_url: Option<String>,

    /// Record store serving the source roster
    #[arg(long, env = "FACTSCOPE_DB_HOST")]
    pub db_host: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long, env = "FACTSCOPE_HTTP_TIMEOUT")]
    pub http_timeout: Option<u64>,
}

/// What the archive is interpreted as, and where sources come from.
#[derive(clap::Args, Debug, Clone)]
pub struct InterpretArgs {
    /// Feed source type recorded in the validation file
    #[arg(long, value_parser = ["CEX", "DEX"])]
    pub source_type: String,

    /// Network id used to look up the source roster
    #[arg(long)]
    pub network: String,

    /// Read the source roster from a JSON file instead of the record store
    #[arg(long)]
    pub sources: Option<PathBuf>,

    /// Extraction limit overrides as JSON, e.g. '{"max_entries": 500}'
    #[arg(long)]
    pub limits: Option<String>,
}
