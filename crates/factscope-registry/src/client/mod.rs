//! Shared HTTP plumbing for the remote clients.
//!
//! Public API: no status code knowledge. All HTTP/status mapping in http.rs.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::error::{RegistryError, RegistryResult};

mod http;

pub(crate) use http::HttpBackend;

/// User agent sent with every request.
pub const EXPLORER_USER_AGENT: &str = concat!("factscope/", env!("CARGO_PKG_VERSION"));

/// Build a backend rooted at `base_url` (trailing slashes dropped).
pub(crate) fn backend(base_url: &str, timeout_secs: u64) -> RegistryResult<HttpBackend> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(USER_AGENT, HeaderValue::from_static(EXPLORER_USER_AGENT));

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .default_headers(default_headers)
        .build()
        .map_err(|e| RegistryError::Client {
            message: e.to_string(),
        })?;

    Ok(HttpBackend {
        client,
        base_url: base_url.trim_end_matches('/').to_string(),
    })
}
