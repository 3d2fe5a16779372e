//! Validation file schema types.
//!
//! A validation file is a schema.org `MediaObject` describing one fact
//! statement. `additionalType` is a pair of events: the data collection
//! event shared by every feed, and a calculation event whose shape depends on
//! whether the feed is CEX (median) or DEX (volume average).
//!
//! Deserialization enforces structure and types; [`ValidationFile::validate`]
//! then enforces the literal and prefix constraints.

use serde::de::{self, Deserializer};
use serde::Deserialize;

/// A constraint the validation file failed, located by a JSON-path-like
/// pointer (`additionalType[1].about.@type`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    pub path: String,
    pub message: String,
}

impl SchemaViolation {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

fn expect_literal(path: &str, actual: &str, expected: &str) -> Result<(), SchemaViolation> {
    if actual == expected {
        Ok(())
    } else {
        Err(SchemaViolation::new(
            path,
            format!("expected {:?}, found {:?}", expected, actual),
        ))
    }
}

fn expect_prefix(path: &str, actual: &str, prefix: &str) -> Result<(), SchemaViolation> {
    if actual.starts_with(prefix) {
        Ok(())
    } else {
        Err(SchemaViolation::new(
            path,
            format!("expected a value starting with {:?}, found {:?}", prefix, actual),
        ))
    }
}

/// The second `additionalType` event: how the fact value was calculated.
pub trait CalculationEvent {
    /// Check literal/prefix constraints. `path` locates the event itself.
    fn validate(&self, path: &str) -> Result<(), SchemaViolation>;

    /// Human-readable calculation method.
    fn description(&self) -> &str;
}

/// Top-level validation file, generic over the calculation event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFile<C> {
    /// Always `https://schema.org`.
    #[serde(rename = "@context")]
    pub context: String,

    /// Always `MediaObject`.
    #[serde(rename = "type")]
    pub kind: String,

    pub identifier: String,

    /// Collector node that produced the data.
    pub is_based_on: BasedOn,

    pub contributor: Contributor,

    /// Collection event followed by the calculation event.
    pub additional_type: (CollectionEvent, C),
}

impl<C: CalculationEvent> ValidationFile<C> {
    pub fn validate(&self) -> Result<(), SchemaViolation> {
        expect_literal("@context", &self.context, "https://schema.org")?;
        expect_literal("type", &self.kind, "MediaObject")?;
        self.is_based_on.validate("isBasedOn")?;
        self.contributor.validate("contributor")?;
        self.additional_type.0.validate("additionalType[0]")?;
        self.additional_type.1.validate("additionalType[1]")?;
        Ok(())
    }

    pub fn collection(&self) -> &CollectionEvent {
        &self.additional_type.0
    }

    pub fn calculation(&self) -> &C {
        &self.additional_type.1
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BasedOn {
    #[serde(rename = "@type")]
    pub kind: String,
    pub name: String,
    /// Collector node identifier.
    pub identifier: String,
}

impl BasedOn {
    fn validate(&self, path: &str) -> Result<(), SchemaViolation> {
        expect_literal(&format!("{path}.@type"), &self.kind, "MediaObject")
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contributor {
    #[serde(rename = "@type")]
    pub kind: String,
    pub name: String,
    pub location_created: LocationCreated,
}

impl Contributor {
    fn validate(&self, path: &str) -> Result<(), SchemaViolation> {
        expect_literal(&format!("{path}.@type"), &self.kind, "Organization")?;
        expect_literal(
            &format!("{path}.locationCreated.address.@type"),
            &self.location_created.address.kind,
            "PostalAddress",
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationCreated {
    pub address: PostalAddress,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddress {
    #[serde(rename = "@type")]
    pub kind: String,
    pub address_locality: String,
    pub address_region: String,
    pub geo: String,
}

/// Data collection event (`additionalType[0]`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionEvent {
    #[serde(rename = "@type")]
    pub kind: String,
    pub description: String,
    pub start_date: String,
    pub recorded_in: RecordedIn,
}

impl CollectionEvent {
    fn validate(&self, path: &str) -> Result<(), SchemaViolation> {
        expect_literal(&format!("{path}.@type"), &self.kind, "Event")?;

        let recorded = &self.recorded_in;
        let rpath = format!("{path}.recordedIn");
        expect_literal(&format!("{rpath}.@type"), &recorded.kind, "CreativeWork")?;
        expect_literal(
            &format!("{rpath}.description.@type"),
            &recorded.description.kind,
            "TextObject",
        )?;

        let (timestamp, data_points, node) = &recorded.has_part;
        for (i, kind) in [&timestamp.kind, &data_points.kind, &node.kind].into_iter().enumerate() {
            expect_literal(&format!("{rpath}.hasPart[{i}].@type"), kind, "CreativeWork")?;
        }
        expect_literal(
            &format!("{rpath}.hasPart[0].description"),
            &timestamp.description,
            "collecting timestamp",
        )?;
        expect_prefix(
            &format!("{rpath}.hasPart[1].description"),
            &data_points.description,
            "data points for",
        )?;
        expect_literal(
            &format!("{rpath}.hasPart[2].description"),
            &node.description,
            "node identifier (uuid)",
        )?;
        Ok(())
    }

    /// When the collector started gathering data.
    pub fn collection_timestamp(&self) -> &str {
        &self.recorded_in.has_part.0.text
    }

    /// Signature over the collected data.
    pub fn content_signature(&self) -> &str {
        &self.recorded_in.description.sha256
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedIn {
    #[serde(rename = "@type")]
    pub kind: String,
    pub description: TextObject,
    /// Timestamp, data points and node identifier, in that order.
    pub has_part: (CreativeWorkPart<String>, CreativeWorkPart<Vec<String>>, CreativeWorkPart<String>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextObject {
    #[serde(rename = "@type")]
    pub kind: String,
    pub comment: String,
    pub sha256: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreativeWorkPart<T> {
    #[serde(rename = "@type")]
    pub kind: String,
    pub description: String,
    pub text: T,
}

const MEDIAN_DESCRIPTION: &str = "selection of median value from collected node data";
const MEDIAN_METHOD: &str =
    "median calculation of a minimum of three data sources from the selected collector node";
const VOLUME_AVERAGE_DESCRIPTION_PREFIX: &str =
    "average price is determined by dividing total volume of";
const VOLUME_AVERAGE_METHOD_PREFIX: &str = "volume/liquidity average sum(valueReference[1])";

/// CEX calculation event: median across exchange API sources.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedianEvent {
    #[serde(rename = "@type")]
    pub kind: String,
    pub description: String,
    pub start_date: String,
    pub about: StatisticalVariable,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticalVariable {
    #[serde(rename = "@type")]
    pub kind: String,
    pub measurement_method: String,
    pub measurement_technique: Vec<PropertyValue>,
    pub variable_measured: MedianObservation,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PropertyValue {
    #[serde(rename = "@type")]
    pub kind: String,
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedianObservation {
    #[serde(rename = "@type")]
    pub kind: String,
    pub measurement_method: String,
    #[serde(deserialize_with = "coerce_number")]
    pub value: f64,
    /// One value per source, aligned with the collector messages.
    #[serde(deserialize_with = "coerce_numbers")]
    pub value_reference: Vec<f64>,
}

impl CalculationEvent for MedianEvent {
    fn validate(&self, path: &str) -> Result<(), SchemaViolation> {
        expect_literal(&format!("{path}.@type"), &self.kind, "Event")?;
        expect_literal(&format!("{path}.description"), &self.description, MEDIAN_DESCRIPTION)?;

        let about = &self.about;
        expect_literal(&format!("{path}.about.@type"), &about.kind, "StatisticalVariable")?;
        expect_literal(
            &format!("{path}.about.measurementMethod"),
            &about.measurement_method,
            MEDIAN_METHOD,
        )?;
        for (i, technique) in about.measurement_technique.iter().enumerate() {
            expect_literal(
                &format!("{path}.about.measurementTechnique[{i}].@type"),
                &technique.kind,
                "PropertyValue",
            )?;
        }
        expect_literal(
            &format!("{path}.about.variableMeasured.@type"),
            &about.variable_measured.kind,
            "Observation",
        )?;
        expect_literal(
            &format!("{path}.about.variableMeasured.measurementMethod"),
            &about.variable_measured.measurement_method,
            "median value",
        )
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// DEX calculation event: volume-weighted average across liquidity pools.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeAverageEvent {
    #[serde(rename = "@type")]
    pub kind: String,
    pub description: String,
    pub start_date: String,
    pub about: VolumeObservation,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeObservation {
    #[serde(rename = "@type")]
    pub kind: String,
    pub measurement_method: (String,),
    #[serde(deserialize_with = "coerce_number")]
    pub value: f64,
    /// `[base volumes, quote volumes]`, each shipped as a JSON-encoded string.
    #[serde(deserialize_with = "embedded_number_arrays")]
    pub value_reference: Vec<Vec<f64>>,
}

impl CalculationEvent for VolumeAverageEvent {
    fn validate(&self, path: &str) -> Result<(), SchemaViolation> {
        expect_literal(&format!("{path}.@type"), &self.kind, "Event")?;
        expect_prefix(
            &format!("{path}.description"),
            &self.description,
            VOLUME_AVERAGE_DESCRIPTION_PREFIX,
        )?;
        expect_literal(&format!("{path}.about.@type"), &self.about.kind, "Observation")?;
        expect_prefix(
            &format!("{path}.about.measurementMethod[0]"),
            &self.about.measurement_method.0,
            VOLUME_AVERAGE_METHOD_PREFIX,
        )
    }

    fn description(&self) -> &str {
        &self.description
    }
}

impl VolumeObservation {
    pub fn base_values(&self) -> &[f64] {
        self.value_reference.first().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn quote_values(&self) -> &[f64] {
        self.value_reference.get(1).map(Vec::as_slice).unwrap_or_default()
    }
}

pub type CexValidationFile = ValidationFile<MedianEvent>;
pub type DexValidationFile = ValidationFile<VolumeAverageEvent>;

/// A number, or a string holding one.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberLike {
    Number(f64),
    Text(String),
}

impl NumberLike {
    fn into_f64<E: de::Error>(self) -> Result<f64, E> {
        match self {
            NumberLike::Number(n) => Ok(n),
            NumberLike::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(0.0);
                }
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .ok_or_else(|| E::custom(format!("expected a number, found {:?}", s)))
            }
        }
    }
}

fn coerce_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    NumberLike::deserialize(deserializer)?.into_f64()
}

fn coerce_numbers<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<NumberLike>::deserialize(deserializer)?
        .into_iter()
        .map(NumberLike::into_f64)
        .collect()
}

fn embedded_number_arrays<'de, D>(deserializer: D) -> Result<Vec<Vec<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<String>::deserialize(deserializer)?
        .iter()
        .map(|s| {
            serde_json::from_str::<Vec<f64>>(s)
                .map_err(|e| de::Error::custom(format!("valueReference entry {:?}: {}", s, e)))
        })
        .collect()
}
