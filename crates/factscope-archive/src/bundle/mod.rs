//! Archive bundle decoding.
//!
//! A bundle is a gzip-compressed tar container holding a fact's archival
//! evidence package (a BagIt bag): `bag-info.txt`, one `validation-*.json`
//! and one `message-*.json` per collected source, plus manifests.
//!
//! # Modules
//!
//! - [`limits`]: decode limits with JSON overrides
//! - [`reader`]: single-pass entry reader

pub mod limits;
pub mod reader;

pub use limits::{ExtractLimits, ExtractLimitsOverrides};
pub use reader::{read_entries, visit_entries};
