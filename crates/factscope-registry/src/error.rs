//! Error types for the remote clients.
//!
//! Request failures are reported as [`ArchiveError`] so they flow through the
//! archive pipeline unchanged; only client construction has its own error.

use factscope_archive::ArchiveError;

/// Client setup errors.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Configuration value is missing or malformed.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// The HTTP client could not be built.
    #[error("failed to create HTTP client: {message}")]
    Client { message: String },
}

/// Result type for client setup.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Map a transport-level reqwest failure. Status-bearing errors keep their
/// status so retry classification still applies.
pub(crate) fn transport_error(err: reqwest::Error) -> ArchiveError {
    ArchiveError::Retrieval {
        status: err.status().map(|s| s.as_u16()),
        message: err.to_string(),
    }
}
