//! Remote clients for the factscope explorer.
//!
//! This crate implements the network-facing collaborators of the archive
//! pipeline:
//!
//! - [`ArweaveClient`]: fetches archive bundles from an Arweave gateway
//! - [`RecordStoreClient`]: loads the per-network source roster, with a fixed
//!   retry policy for transient failures
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use factscope_archive::{ArchiveService, FactRecord};
//! use factscope_registry::{ArweaveClient, ExplorerConfig, RecordStoreClient};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ExplorerConfig::from_env();
//! let service = ArchiveService::new(
//!     Arc::new(ArweaveClient::new(&config)?),
//!     Arc::new(RecordStoreClient::new(&config)?),
//! );
//!
//! let fact = FactRecord::new("urn:orcfax:1234", "urn:arweave:abc");
//! let archive = service.get_archive(&fact, "mainnet", "CEX").await;
//! println!("details available: {}", archive.details.is_some());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `FACTSCOPE_ARWEAVE_URL` | Arweave gateway (default: `https://arweave.net`) |
//! | `FACTSCOPE_DB_HOST` | Record store (default: `http://127.0.0.1:8090`) |
//! | `FACTSCOPE_HTTP_TIMEOUT` | Request timeout in seconds (default: 30) |
//! | `FACTSCOPE_ROSTER_ATTEMPTS` | Roster fetch attempts (default: 2) |
//! | `FACTSCOPE_ROSTER_RETRY_DELAY_MS` | Delay between roster attempts (default: 1000) |

pub mod arweave;
pub mod client;
pub mod error;
pub mod record_store;
pub mod types;

pub use arweave::ArweaveClient;
pub use client::EXPLORER_USER_AGENT;
pub use error::{RegistryError, RegistryResult};
pub use record_store::RecordStoreClient;
pub use types::{ExplorerConfig, RetryPolicy};
