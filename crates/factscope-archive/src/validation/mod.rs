//! Validation file interpretation.
//!
//! Locates the bundle's `validation-*.json`, parses it against the schema for
//! the fact's source type and distils it into [`ArchiveDetails`]: the common
//! provenance fields plus per-source values aligned by index with the
//! reconciled sources.

pub mod schema;

use crate::error::{ArchiveError, ArchiveResult};
use crate::types::{ArchiveDetails, ArchivedFile, Source, SourceType};
use schema::{CalculationEvent, CexValidationFile, DexValidationFile, SchemaViolation, ValidationFile};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub const VALIDATION_MARKER: &str = "validation-";

/// First file whose name contains `validation-`.
pub fn find_validation_file(files: &[ArchivedFile]) -> Option<&ArchivedFile> {
    files.iter().find(|f| f.file_name.contains(VALIDATION_MARKER))
}

/// Interpret the validation file for `source_type` (`"CEX"` or `"DEX"`).
///
/// `sources` must already be reconciled and in message order; the returned
/// details carry copies of them with their contributed values filled in.
pub fn interpret(
    files: &[ArchivedFile],
    sources: &[Source],
    source_type: &str,
) -> ArchiveResult<ArchiveDetails> {
    let source_type: SourceType = source_type.parse()?;
    let file = find_validation_file(files).ok_or(ArchiveError::MissingValidationFile)?;
    let content = file.content.as_json().ok_or_else(|| ArchiveError::Schema {
        source_type: source_type.to_string(),
        path: "$".to_string(),
        message: format!("{} is not JSON", file.name),
    })?;

    match source_type {
        SourceType::Cex => {
            let parsed: CexValidationFile = parse(source_type, content)?;
            let values = &parsed.calculation().about.variable_measured.value_reference;
            let sources = sources
                .iter()
                .enumerate()
                .map(|(i, source)| Source {
                    asset_pair_value: values.get(i).copied(),
                    ..source.clone()
                })
                .collect();
            Ok(details(&parsed, sources, source_type))
        }
        SourceType::Dex => {
            let parsed: DexValidationFile = parse(source_type, content)?;
            let about = &parsed.calculation().about;
            let (base, quote) = (about.base_values(), about.quote_values());
            let sources = sources
                .iter()
                .enumerate()
                .map(|(i, source)| Source {
                    base_asset_value: base.get(i).copied(),
                    quote_asset_value: quote.get(i).copied(),
                    ..source.clone()
                })
                .collect();
            Ok(details(&parsed, sources, source_type))
        }
    }
}

fn parse<C>(source_type: SourceType, content: &Value) -> ArchiveResult<ValidationFile<C>>
where
    C: CalculationEvent + DeserializeOwned,
{
    let schema_error = |violation: SchemaViolation| ArchiveError::Schema {
        source_type: source_type.to_string(),
        path: violation.path,
        message: violation.message,
    };

    let parsed: ValidationFile<C> = serde_json::from_value(content.clone()).map_err(|e| {
        schema_error(SchemaViolation {
            path: "$".to_string(),
            message: e.to_string(),
        })
    })?;
    parsed.validate().map_err(schema_error)?;
    Ok(parsed)
}

fn details<C: CalculationEvent>(
    parsed: &ValidationFile<C>,
    sources: Vec<Source>,
    source_type: SourceType,
) -> ArchiveDetails {
    let collection = parsed.collection();
    ArchiveDetails {
        sources,
        collection_timestamp: collection.collection_timestamp().to_string(),
        collector_node_id: parsed.is_based_on.identifier.clone(),
        content_signature: collection.content_signature().to_string(),
        calculation_method: parsed.calculation().description().to_string(),
        validation_date: collection.start_date.clone(),
        source_type: source_type.as_str().to_string(),
    }
}
