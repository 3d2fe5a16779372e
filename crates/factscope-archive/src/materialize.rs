//! File content materialization.
//!
//! Turns decoded container entries into [`ArchivedFile`] records. Only `.txt`
//! and `.json` entries are kept. Collector messages (`message-*.json`) carry
//! their payload as base64 JSON, and that payload may in turn carry a base64
//! JSON `response`; both levels are decoded in place so the record holds
//! plain JSON throughout.

use crate::error::{ArchiveError, ArchiveResult};
use crate::types::{ArchivedFile, ContainerEntry, FileContent};
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde_json::Value;

pub const MESSAGE_PREFIX: &str = "message-";
pub const BASE64_JSON_ENCODING: &str = "application/json;base64";

/// Standard alphabet, padding optional on decode.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Materialize every `.txt` / `.json` entry, preserving container order.
///
/// Fails on the first entry that cannot be decoded.
pub fn materialize_files(entries: &[ContainerEntry]) -> ArchiveResult<Vec<ArchivedFile>> {
    let mut files = Vec::new();
    for entry in entries {
        if let Some(file) = materialize_entry(entry)? {
            files.push(file);
        }
    }
    tracing::debug!(files = files.len(), "materialized archive files");
    Ok(files)
}

/// Materialize a single entry. Directories and other extensions yield `None`.
pub fn materialize_entry(entry: &ContainerEntry) -> ArchiveResult<Option<ArchivedFile>> {
    if entry.is_directory {
        return Ok(None);
    }

    let path = entry.path.as_str();
    // Suffixes are matched exactly; `README.JSON` is not a JSON entry.
    let (extension, content) = if path.ends_with(".txt") {
        (
            "TXT",
            FileContent::Text(String::from_utf8_lossy(&entry.content).into_owned()),
        )
    } else if path.ends_with(".json") {
        (
            "JSON",
            FileContent::Json(
                serde_json::from_slice(&entry.content)
                    .map_err(|e| ArchiveError::malformed(path, format!("invalid JSON: {}", e)))?,
            ),
        )
    } else {
        return Ok(None);
    };

    let file_name = path
        .split('/')
        .filter(|s| !s.is_empty())
        .next_back()
        .unwrap_or(path)
        .to_string();

    let mut file = ArchivedFile {
        name: path.to_string(),
        file_name,
        extension: extension.to_string(),
        content,
    };

    if file.file_name.starts_with(MESSAGE_PREFIX) {
        if let FileContent::Json(value) = &mut file.content {
            unwrap_message(path, value)?;
        }
    }

    Ok(Some(file))
}

/// Decode a collector message attachment and its nested response in place.
///
/// Exactly two levels: the attachment `text`, then `response` inside it when
/// that is a string. Anything nested deeper is left as found.
fn unwrap_message(path: &str, message: &mut Value) -> ArchiveResult<()> {
    let Value::Object(message) = message else {
        return Ok(());
    };

    let attachment = message
        .get_mut("messageAttachment")
        .and_then(Value::as_object_mut)
        .ok_or_else(|| ArchiveError::malformed(path, "message has no messageAttachment object"))?;

    if attachment.get("encoding").and_then(Value::as_str) != Some(BASE64_JSON_ENCODING) {
        return Ok(());
    }

    let text = attachment
        .get("text")
        .and_then(Value::as_str)
        .ok_or_else(|| ArchiveError::malformed(path, "messageAttachment.text is not a string"))?;
    let mut decoded = decode_base64_json(path, "messageAttachment.text", text)?;

    if let Some(Value::String(response)) = decoded.get("response") {
        let response = decode_base64_json(path, "messageAttachment.text.response", response)?;
        decoded["response"] = response;
    }

    attachment.insert("text".to_string(), decoded);
    Ok(())
}

fn decode_base64_json(path: &str, field: &str, encoded: &str) -> ArchiveResult<Value> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = LENIENT_BASE64
        .decode(compact.as_bytes())
        .map_err(|e| ArchiveError::malformed(path, format!("{}: invalid base64: {}", field, e)))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| ArchiveError::malformed(path, format!("{}: invalid JSON: {}", field, e)))
}
