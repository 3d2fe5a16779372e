//! Offline archive viewer page.
//!
//! The download package ships an HTML page with the archive JSON inlined in
//! place of the quoted `'DATA_PLACEHOLDER'` literal, so the page works from
//! the local filesystem with no server.

use crate::error::{ArchiveError, ArchiveResult};
use crate::types::{ArchiveDetails, ArchiveDownload, ArchivedFile, DirectoryNode, FactStatementStub};
use serde::Serialize;

pub const DATA_PLACEHOLDER: &str = "'DATA_PLACEHOLDER'";

/// File name of the generated page inside the download package.
pub const VIEWER_FILE_NAME: &str = "archive-viewer.html";

/// Built-in viewer page.
pub const VIEWER_TEMPLATE: &str = include_str!("viewer.html");

/// JSON document inlined into the viewer page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerData<'a> {
    pub fact: &'a FactStatementStub,
    pub files: &'a [ArchivedFile],
    pub details: Option<&'a ArchiveDetails>,
    pub directory_tree: &'a [DirectoryNode],
}

impl<'a> From<&'a ArchiveDownload> for ViewerData<'a> {
    fn from(download: &'a ArchiveDownload) -> Self {
        Self {
            fact: &download.fact,
            files: &download.files,
            details: download.details.as_ref(),
            directory_tree: &download.directory_tree,
        }
    }
}

/// Substitute the first placeholder in `template` with pretty-printed JSON.
pub fn render_viewer_page(template: &str, download: &ArchiveDownload) -> ArchiveResult<String> {
    if !template.contains(DATA_PLACEHOLDER) {
        return Err(ArchiveError::ViewerTemplate {
            message: format!("template has no {} marker", DATA_PLACEHOLDER),
        });
    }

    let json = serde_json::to_string_pretty(&ViewerData::from(download)).map_err(|e| {
        ArchiveError::ViewerTemplate {
            message: e.to_string(),
        }
    })?;
    // `</` only occurs inside JSON strings, where `<\/` is an equivalent escape.
    let json = json.replace("</", "<\\/");

    Ok(template.replacen(DATA_PLACEHOLDER, &json, 1))
}
