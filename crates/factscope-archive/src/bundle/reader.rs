//! Gzip + tar container reader.
//!
//! Entries of a tar stream are interleaved with their bodies, so they can only
//! be consumed in order and each body must be drained before the next header
//! is reachable. The reader drains every body into memory and hands the
//! caller complete [`ContainerEntry`] values, one at a time.

use crate::bundle::limits::{ExtractLimits, LimitReader};
use crate::error::{ArchiveError, ArchiveResult};
use crate::types::ContainerEntry;
use flate2::read::GzDecoder;
use std::io::Read;

/// Stream every entry of a gzip-compressed tar bundle through `visit`, in
/// container order. Returns the number of entries visited.
///
/// Stops at the first error, whether raised by the decoder or by `visit`.
pub fn visit_entries<F>(bundle: &[u8], limits: &ExtractLimits, mut visit: F) -> ArchiveResult<usize>
where
    F: FnMut(ContainerEntry) -> ArchiveResult<()>,
{
    if bundle.is_empty() {
        return Err(ArchiveError::CorruptArchive {
            message: "empty bundle".to_string(),
        });
    }
    if bundle.len() as u64 > limits.max_bundle_bytes {
        return Err(ArchiveError::LimitExceeded {
            message: format!(
                "bundle is {} bytes, limit is {}",
                bundle.len(),
                limits.max_bundle_bytes
            ),
        });
    }

    let decoder = GzDecoder::new(bundle);
    let limited = LimitReader::new(decoder, limits.max_decode_bytes, "max_decode_bytes");
    let mut archive = tar::Archive::new(limited);

    let entries = archive
        .entries()
        .map_err(|e| ArchiveError::corrupt("gzip/tar stream", e))?;

    let mut count = 0;
    for (i, entry) in entries.enumerate() {
        let mut entry = entry.map_err(|e| ArchiveError::corrupt(&format!("entry #{}", i), e))?;

        if i >= limits.max_entries {
            return Err(ArchiveError::LimitExceeded {
                message: format!("more than {} entries", limits.max_entries),
            });
        }

        let mut path = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
        if path.len() > limits.max_path_len {
            return Err(ArchiveError::LimitExceeded {
                message: format!(
                    "entry #{} path length {} exceeds {}",
                    i,
                    path.len(),
                    limits.max_path_len
                ),
            });
        }

        let is_directory = entry.header().entry_type().is_dir();
        if is_directory && !path.ends_with('/') {
            path.push('/');
        }

        let declared = entry.header().size().unwrap_or(0);
        if declared > limits.max_entry_bytes {
            return Err(ArchiveError::LimitExceeded {
                message: format!(
                    "{} is {} bytes, limit is {}",
                    path, declared, limits.max_entry_bytes
                ),
            });
        }

        let mut content = Vec::with_capacity(declared as usize);
        entry
            .read_to_end(&mut content)
            .map_err(|e| ArchiveError::corrupt(&path, e))?;

        visit(ContainerEntry {
            path,
            is_directory,
            content,
        })?;
        count += 1;
    }

    tracing::debug!(entries = count, "bundle decoded");
    Ok(count)
}

/// Decode the whole bundle once into an ordered entry list.
pub fn read_entries(bundle: &[u8], limits: &ExtractLimits) -> ArchiveResult<Vec<ContainerEntry>> {
    let mut out = Vec::new();
    visit_entries(bundle, limits, |entry| {
        out.push(entry);
        Ok(())
    })?;
    Ok(out)
}
