//! Source reconciliation.
//!
//! Each collector message is named after the source it came from, e.g.
//! `message-binance.tick_2024-05-01T10:00:00Z.json` or
//! `message-minswap-2024-05-01T10:00:00Z.json`. The source token is
//! the lazily matched run of word characters and dots after a `-`
//! and either a `.tick_` marker or a `-YYYY-MM-DDT` date.

use crate::error::{ArchiveError, ArchiveResult};
use crate::materialize::MESSAGE_PREFIX;
use crate::types::{ArchivedFile, Source};
use regex::Regex;
use std::sync::OnceLock;

fn source_token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)-([\w.]+?)(?:\.tick_|-\d{4}-\d{2}-\d{2}T)").unwrap())
}

/// Extract the lowercased source token from a message file name.
pub fn source_token(file_name: &str) -> Option<String> {
    source_token_pattern()
        .captures(&file_name.to_lowercase())
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Resolve every collector message to a roster entry, in message order.
///
/// A message matches a roster entry whose name equals the token, ignoring
/// case. When several entries match, the first one in roster order wins.
/// A message whose token is missing or matches nothing fails the whole
/// reconciliation with [`ArchiveError::UnknownSource`].
pub fn reconcile_sources(files: &[ArchivedFile], roster: &[Source]) -> ArchiveResult<Vec<Source>> {
    let roster_names: Vec<String> = roster.iter().map(|s| s.name.to_lowercase()).collect();

    let mut matched = Vec::new();
    for file in files {
        if !file.file_name.contains(MESSAGE_PREFIX) {
            continue;
        }

        let token = source_token(&file.file_name);
        let hit = token.as_deref().and_then(|token| {
            roster_names
                .iter()
                .position(|name| name == token)
                .map(|idx| &roster[idx])
        });

        match hit {
            Some(source) => matched.push(source.clone()),
            None => {
                return Err(ArchiveError::UnknownSource {
                    file_name: file.file_name.clone(),
                    token,
                })
            }
        }
    }

    Ok(matched)
}
