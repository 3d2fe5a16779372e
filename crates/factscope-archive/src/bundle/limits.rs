//! Resource limits and bounded readers for bundle extraction.

use serde::Deserialize;
use std::io::Read;

/// Marker carried by I/O errors raised when a limit trips, so they can be
/// told apart from framing errors after passing through gzip/tar.
pub(crate) const LIMIT_TAG: &str = "ExtractLimit";

/// Resource limits for bundle extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractLimits {
    pub max_bundle_bytes: u64,
    pub max_decode_bytes: u64,
    pub max_entries: usize,
    pub max_entry_bytes: u64,
    pub max_path_len: usize,
}

impl Default for ExtractLimits {
    fn default() -> Self {
        Self {
            max_bundle_bytes: 100 * 1024 * 1024,  // 100 MB compressed
            max_decode_bytes: 1024 * 1024 * 1024, // 1 GB uncompressed
            max_entries: 10_000,
            max_entry_bytes: 64 * 1024 * 1024,
            max_path_len: 1024,
        }
    }
}

/// Partial overrides for `ExtractLimits`. Used for CLI/config JSON parsing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractLimitsOverrides {
    pub max_bundle_bytes: Option<u64>,
    pub max_decode_bytes: Option<u64>,
    pub max_entries: Option<usize>,
    pub max_entry_bytes: Option<u64>,
    pub max_path_len: Option<usize>,
}

impl ExtractLimits {
    /// Apply overrides onto these defaults. Only `Some` values override.
    pub fn apply(self, overrides: ExtractLimitsOverrides) -> Self {
        Self {
            max_bundle_bytes: overrides.max_bundle_bytes.unwrap_or(self.max_bundle_bytes),
            max_decode_bytes: overrides.max_decode_bytes.unwrap_or(self.max_decode_bytes),
            max_entries: overrides.max_entries.unwrap_or(self.max_entries),
            max_entry_bytes: overrides.max_entry_bytes.unwrap_or(self.max_entry_bytes),
            max_path_len: overrides.max_path_len.unwrap_or(self.max_path_len),
        }
    }
}

/// A reader that limits the total number of bytes read and fails explicitly on overflow.
pub(crate) struct LimitReader<R> {
    inner: R,
    limit: u64,
    read: u64,
    what: &'static str,
}

impl<R: Read> LimitReader<R> {
    pub(crate) fn new(inner: R, limit: u64, what: &'static str) -> Self {
        Self {
            inner,
            limit,
            read: 0,
            what,
        }
    }
}

impl<R: Read> Read for LimitReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.read >= self.limit {
            // Only an error if the inner stream actually has more to give.
            let mut probe = [0u8; 1];
            return match self.inner.read(&mut probe)? {
                0 => Ok(0),
                _ => Err(std::io::Error::other(format!(
                    "{}: {} exceeded limit of {} bytes",
                    LIMIT_TAG, self.what, self.limit
                ))),
            };
        }

        let max_to_read = (self.limit - self.read).min(buf.len() as u64) as usize;
        let n = self.inner.read(&mut buf[..max_to_read])?;
        self.read += n as u64;

        Ok(n)
    }
}
