//! `bag-info.txt` parsing.
//!
//! The BagIt tag file is a list of `Key: Value` lines. The fact archiver
//! writes a fixed set of keys; all of them are required.

use crate::error::{ArchiveError, ArchiveResult};
use crate::types::{ArchivedFile, FactStatementStub};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const BAG_INFO_FILE: &str = "bag-info.txt";

/// Typed `bag-info.txt` contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BagInfo {
    #[serde(rename = "Bag-Software-Agent")]
    pub bag_software_agent: String,
    #[serde(rename = "Bagging-Date", deserialize_with = "date_string")]
    pub bagging_date: String,
    #[serde(rename = "Epoch-Day", deserialize_with = "number_string")]
    pub epoch_day: f64,
    #[serde(rename = "Epoch-Hour", deserialize_with = "number_string")]
    pub epoch_hour: f64,
    #[serde(rename = "Epoch-Month", deserialize_with = "number_string")]
    pub epoch_month: f64,
    #[serde(rename = "Epoch-Week", deserialize_with = "number_string")]
    pub epoch_week: f64,
    #[serde(rename = "Epoch-Year", deserialize_with = "number_string")]
    pub epoch_year: f64,
    #[serde(rename = "Fact-Datum-Identifier")]
    pub fact_datum_identifier: uuid::Uuid,
    #[serde(rename = "Fact-Datum-URN")]
    pub fact_datum_urn: String,
    #[serde(rename = "Fact-Datum-Value", deserialize_with = "number_string")]
    pub fact_datum_value: f64,
    #[serde(rename = "Fact-Description")]
    pub fact_description: String,
    #[serde(rename = "Fact-Validation-Date", deserialize_with = "date_string")]
    pub fact_validation_date: String,
    #[serde(rename = "Feed-ID")]
    pub feed_id: String,
    #[serde(rename = "Feed-Name")]
    pub feed_name: String,
    #[serde(rename = "Feed-Type")]
    pub feed_type: String,
    #[serde(rename = "Package-Version", deserialize_with = "number_string")]
    pub package_version: f64,
    #[serde(rename = "Packaging-Agent")]
    pub packaging_agent: String,
    #[serde(rename = "Payload-Oxum")]
    pub payload_oxum: String,
    #[serde(rename = "Source-Organization")]
    pub source_organization: String,
    #[serde(rename = "System-Identifier")]
    pub system_identifier: String,
    #[serde(rename = "System-Name")]
    pub system_name: String,
    #[serde(rename = "System-Version")]
    pub system_version: String,
    #[serde(rename = "Unix-Time", deserialize_with = "number_string")]
    pub unix_time: f64,
}

impl BagInfo {
    /// Parse tag file text. Lines without `": "` are ignored; a repeated key
    /// keeps its last value.
    pub fn parse(text: &str) -> ArchiveResult<Self> {
        let mut fields = Map::new();
        for line in text.split('\n') {
            if let Some((key, value)) = line.split_once(": ") {
                if !key.is_empty() {
                    fields.insert(key.to_string(), Value::String(value.trim().to_string()));
                }
            }
        }

        serde_json::from_value(Value::Object(fields)).map_err(|e| ArchiveError::BagInfo {
            message: e.to_string(),
        })
    }

    /// Fact summary as shown in the viewer. Inverse fields are not recorded
    /// in the bag and stay zeroed.
    pub fn to_fact_statement(&self) -> FactStatementStub {
        FactStatementStub {
            fact_urn: self.fact_datum_urn.clone(),
            feed_name: self.feed_name.clone(),
            feed_type: self.feed_type.clone(),
            value: self.fact_datum_value,
            inverse_value: 0.0,
            description: self.fact_description.clone(),
            inverse_description: String::new(),
            validation_date: self.fact_validation_date.clone(),
        }
    }
}

/// Locate and parse the bag's `bag-info.txt`.
pub fn fact_statement_from_files(files: &[ArchivedFile]) -> ArchiveResult<FactStatementStub> {
    let text = files
        .iter()
        .find(|f| f.file_name.contains(BAG_INFO_FILE))
        .and_then(|f| f.content.as_text())
        .ok_or_else(|| ArchiveError::BagInfo {
            message: "bag-info.txt not found in archive".to_string(),
        })?;
    Ok(BagInfo::parse(text)?.to_fact_statement())
}

fn is_date(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
        || DateTime::parse_from_rfc2822(value).is_ok()
        || ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
            .iter()
            .any(|fmt| NaiveDateTime::parse_from_str(value, fmt).is_ok())
        || NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

fn date_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    if is_date(&value) {
        Ok(value)
    } else {
        Err(de::Error::custom(format!("invalid date format: {:?}", value)))
    }
}

fn number_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    trimmed
        .parse::<f64>()
        .map_err(|_| de::Error::custom(format!("invalid number: {:?}", value)))
}
