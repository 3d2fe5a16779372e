//! Error types for archive extraction and interpretation.

/// Coarse classification of archive failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Transport failure talking to a remote collaborator.
    Transport,
    /// The remote handed back something that is not a gzip tar.
    Format,
    /// Broken gzip/tar framing or undecodable entry payloads.
    Integrity,
    /// The archive contents do not satisfy the expected provenance contract.
    Contract,
    /// A resource limit was exceeded while decoding.
    Limits,
}

impl std::fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Archive pipeline errors.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// Object store or record store request failed.
    #[error("retrieval failed{}: {message}", fmt_status(.status))]
    Retrieval {
        status: Option<u16>,
        message: String,
    },

    /// Bundle response declared a content type other than tar/gzip.
    #[error("unexpected content type: {}", .content_type.as_deref().unwrap_or("<missing>"))]
    UnexpectedFormat { content_type: Option<String> },

    /// Storage URN is not an `urn:arweave:` reference.
    #[error("invalid storage urn: {urn}")]
    InvalidStorageUrn { urn: String },

    /// Gzip or tar framing is broken.
    #[error("corrupt archive: {message}")]
    CorruptArchive { message: String },

    /// A decode limit was hit.
    #[error("limit exceeded: {message}")]
    LimitExceeded { message: String },

    /// JSON or base64 payload inside an entry could not be decoded.
    #[error("malformed entry {path}: {message}")]
    MalformedEntry { path: String, message: String },

    /// A message file could not be attributed to a known source.
    #[error("unknown source for message file {file_name}")]
    UnknownSource {
        file_name: String,
        token: Option<String>,
    },

    /// No `validation-` file in the archive.
    #[error("validation file not found in archive")]
    MissingValidationFile,

    /// Caller supplied a source type other than CEX/DEX.
    #[error("unknown source type: {value:?}")]
    UnknownSourceType { value: String },

    /// Validation file does not match the schema for the declared source type.
    #[error("{source_type} validation file schema mismatch at {path}: {message}")]
    Schema {
        source_type: String,
        path: String,
        message: String,
    },

    /// Source roster could not be loaded.
    #[error("source roster unavailable: {message}")]
    Roster { message: String },

    /// `bag-info.txt` is missing or invalid.
    #[error("bag info: {message}")]
    BagInfo { message: String },

    /// Viewer template could not be rendered.
    #[error("viewer template: {message}")]
    ViewerTemplate { message: String },
}

impl ArchiveError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Retrieval { .. } | Self::Roster { .. } => ErrorClass::Transport,
            Self::UnexpectedFormat { .. } | Self::InvalidStorageUrn { .. } => ErrorClass::Format,
            Self::CorruptArchive { .. } | Self::MalformedEntry { .. } => ErrorClass::Integrity,
            Self::LimitExceeded { .. } => ErrorClass::Limits,
            Self::UnknownSource { .. }
            | Self::MissingValidationFile
            | Self::UnknownSourceType { .. }
            | Self::Schema { .. }
            | Self::BagInfo { .. }
            | Self::ViewerTemplate { .. } => ErrorClass::Contract,
        }
    }

    /// The bundle or record does not exist remotely (HTTP 404).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Retrieval { status: Some(404), .. })
    }

    /// Whether a retry could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Retrieval { status: None, .. } => true,
            Self::Retrieval {
                status: Some(status),
                ..
            } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    pub(crate) fn malformed(path: &str, message: impl std::fmt::Display) -> Self {
        Self::MalformedEntry {
            path: path.to_string(),
            message: message.to_string(),
        }
    }

    pub(crate) fn corrupt(context: &str, err: std::io::Error) -> Self {
        let message = err.to_string();
        if message.contains(crate::bundle::limits::LIMIT_TAG) {
            Self::LimitExceeded { message }
        } else {
            Self::CorruptArchive {
                message: format!("{context}: {message}"),
            }
        }
    }
}

fn fmt_status(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

/// Result type for archive operations.
pub type ArchiveResult<T> = Result<T, ArchiveError>;
