//! Text rendering for `archive inspect`.

use std::fmt;

use factscope_archive::{Archive, ArchiveDetails, DirectoryNode, Source};

/// Human-readable view of an [`Archive`]: tree, file list and provenance
/// panel. The panel is left out when there are no details.
pub struct ArchiveSummary<'a>(pub &'a Archive);

impl fmt::Display for ArchiveSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let archive = self.0;
        if !archive.fact.fact_urn.is_empty() {
            writeln!(f, "Fact:        {}", archive.fact.fact_urn)?;
        }
        writeln!(f, "Storage URN: {}", archive.fact.storage_urn)?;

        if archive.is_unavailable() {
            return writeln!(f, "Archive unavailable");
        }

        if let Some(tree) = &archive.directory_tree {
            writeln!(f, "\nDirectory tree:")?;
            write_nodes(f, tree, 1)?;
        }

        match &archive.files {
            Some(files) => {
                writeln!(f, "\nFiles ({}):", files.len())?;
                for file in files {
                    writeln!(f, "  {:<5} {}", file.extension, file.name)?;
                }
            }
            None => writeln!(f, "\nFiles: unreadable")?,
        }

        if let Some(details) = &archive.details {
            write_details(f, details)?;
        }
        Ok(())
    }
}

fn write_nodes(f: &mut fmt::Formatter<'_>, nodes: &[DirectoryNode], depth: usize) -> fmt::Result {
    for node in nodes {
        let indent = "  ".repeat(depth);
        match node {
            DirectoryNode::Folder { name, nodes } => {
                writeln!(f, "{}{}/", indent, name)?;
                write_nodes(f, nodes, depth + 1)?;
            }
            DirectoryNode::File { name } => writeln!(f, "{}{}", indent, name)?,
        }
    }
    Ok(())
}

fn write_details(f: &mut fmt::Formatter<'_>, details: &ArchiveDetails) -> fmt::Result {
    writeln!(f, "\nProvenance ({}):", details.source_type)?;
    writeln!(f, "  Collected:      {}", details.collection_timestamp)?;
    writeln!(f, "  Collector node: {}", details.collector_node_id)?;
    writeln!(f, "  Signature:      {}", details.content_signature)?;
    writeln!(f, "  Method:         {}", details.calculation_method)?;
    writeln!(f, "  Validated:      {}", details.validation_date)?;
    writeln!(f, "  Sources:")?;
    for source in &details.sources {
        writeln!(f, "    {:<20} {}", source.name, source_value(source))?;
    }
    Ok(())
}

fn source_value(source: &Source) -> String {
    if let Some(value) = source.asset_pair_value {
        return value.to_string();
    }
    match (source.base_asset_value, source.quote_asset_value) {
        (Some(base), Some(quote)) => format!("base {} / quote {}", base, quote),
        (Some(base), None) => format!("base {}", base),
        (None, Some(quote)) => format!("quote {}", quote),
        (None, None) => "-".to_string(),
    }
}
