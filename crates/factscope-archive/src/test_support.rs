//! In-memory bundle and provenance fixtures for unit tests.

use base64::Engine;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::{json, Value};
use std::io::Write;
use tar::{Builder, EntryType, Header};

pub(crate) fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

pub(crate) fn tarball(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = BundleBuilder::new();
    for (path, content) in files {
        builder = builder.file(path, content);
    }
    builder.tar()
}

/// Builds a gzip tar bundle entry by entry, preserving insertion order and
/// allowing duplicate paths.
pub(crate) struct BundleBuilder {
    builder: Builder<Vec<u8>>,
}

impl BundleBuilder {
    pub(crate) fn new() -> Self {
        Self {
            builder: Builder::new(Vec::new()),
        }
    }

    pub(crate) fn dir(mut self, path: &str) -> Self {
        let mut header = Header::new_gnu();
        header.set_entry_type(EntryType::Directory);
        header.set_size(0);
        header.set_mode(0o755);
        header.set_mtime(0);
        self.builder
            .append_data(&mut header, path, std::io::empty())
            .unwrap();
        self
    }

    pub(crate) fn file(mut self, path: &str, content: &[u8]) -> Self {
        let mut header = Header::new_gnu();
        header.set_entry_type(EntryType::Regular);
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_mtime(0);
        self.builder
            .append_data(&mut header, path, content)
            .unwrap();
        self
    }

    pub(crate) fn json(self, path: &str, value: &Value) -> Self {
        let bytes = serde_json::to_vec_pretty(value).unwrap();
        self.file(path, &bytes)
    }

    pub(crate) fn tar(self) -> Vec<u8> {
        self.builder.into_inner().unwrap()
    }

    pub(crate) fn build(self) -> Vec<u8> {
        gzip(&self.tar())
    }
}

pub(crate) fn b64(value: &Value) -> String {
    base64::engine::general_purpose::STANDARD.encode(serde_json::to_vec(value).unwrap())
}

/// A `message-*.json` body whose attachment is base64 JSON, optionally with a
/// base64 JSON `response` nested inside.
pub(crate) fn message_json(request_url: &str, response: Option<&Value>) -> Value {
    let mut inner = json!({ "request_url": request_url });
    if let Some(response) = response {
        inner["response"] = Value::String(b64(response));
    }
    json!({
        "@context": "https://schema.org",
        "@type": "Message",
        "name": "data collection message",
        "sender": "collector",
        "identifier": "8f0c3a4e-0f3e-4c8e-9b1e-3f1f2b7c9d10",
        "dateReceived": "2024-05-01T10:00:00Z",
        "messageAttachment": {
            "encoding": "application/json;base64",
            "text": b64(&inner)
        }
    })
}

fn collection_event() -> Value {
    json!({
        "@type": "Event",
        "description": "data collection",
        "startDate": "2024-05-01T10:00:05Z",
        "recordedIn": {
            "@type": "CreativeWork",
            "description": {
                "@type": "TextObject",
                "comment": "signature of the collected data",
                "sha256": "3b1f0c9e"
            },
            "hasPart": [
                {
                    "@type": "CreativeWork",
                    "description": "collecting timestamp",
                    "text": "2024-05-01T10:00:00Z"
                },
                {
                    "@type": "CreativeWork",
                    "description": "data points for ADA-USD",
                    "text": ["0.45", "0.46", "0.47"]
                },
                {
                    "@type": "CreativeWork",
                    "description": "node identifier (uuid)",
                    "text": "6a2d2c54-7f14-4b0a-9a55-1c9a0f3c2e11"
                }
            ]
        }
    })
}

fn validation_envelope(calculation: Value) -> Value {
    json!({
        "@context": "https://schema.org",
        "type": "MediaObject",
        "identifier": "urn:orcfax:7d3c1f0a",
        "isBasedOn": {
            "@type": "MediaObject",
            "name": "ADA-USD|USD-ADA",
            "identifier": "collector-node-7"
        },
        "contributor": {
            "@type": "Organization",
            "name": "Orcfax",
            "locationCreated": {
                "address": {
                    "@type": "PostalAddress",
                    "addressLocality": "Wallonia",
                    "addressRegion": "BE",
                    "geo": "50.5,4.5"
                }
            }
        },
        "additionalType": [collection_event(), calculation]
    })
}

/// CEX (median) validation file; `values` land in `valueReference`.
pub(crate) fn cex_validation_json(values: &[Value]) -> Value {
    validation_envelope(json!({
        "@type": "Event",
        "description": "selection of median value from collected node data",
        "startDate": "2024-05-01T10:00:06Z",
        "about": {
            "@type": "StatisticalVariable",
            "measurementMethod": "median calculation of a minimum of three data sources from the selected collector node",
            "measurementTechnique": [
                { "@type": "PropertyValue", "name": "binance", "value": "0.45" }
            ],
            "variableMeasured": {
                "@type": "Observation",
                "measurementMethod": "median value",
                "value": "0.46",
                "valueReference": values
            }
        }
    }))
}

/// DEX (volume average) validation file with base/quote value arrays.
pub(crate) fn dex_validation_json(base: &[f64], quote: &[f64]) -> Value {
    validation_envelope(json!({
        "@type": "Event",
        "description": "average price is determined by dividing total volume of ADA by total volume of USDM",
        "startDate": "2024-05-01T10:00:06Z",
        "about": {
            "@type": "Observation",
            "measurementMethod": ["volume/liquidity average sum(valueReference[1]) / sum(valueReference[0])"],
            "value": 0.46,
            "valueReference": [
                serde_json::to_string(base).unwrap(),
                serde_json::to_string(quote).unwrap()
            ]
        }
    }))
}

pub(crate) const BAG_INFO: &str = "\
Bag-Software-Agent: bagit.py v1.8.1 <https://github.com/LibraryOfCongress/bagit-python>
Bagging-Date: 2024-05-01
Epoch-Day: 19844
Epoch-Hour: 476256
Epoch-Month: 652
Epoch-Week: 2834
Epoch-Year: 54
Fact-Datum-Identifier: 0b1f5f6e-3f3b-4f59-8a70-3c1d2e4f5a6b
Fact-Datum-URN: urn:orcfax:0b1f5f6e-3f3b-4f59-8a70-3c1d2e4f5a6b
Fact-Datum-Value: 0.4612
Fact-Description: ADA-USD|USD-ADA
Fact-Validation-Date: 2024-05-01T10:00:06Z
Feed-ID: CER/ADA-USD/3
Feed-Name: ADA-USD|USD-ADA
Feed-Type: CER
Package-Version: 1
Packaging-Agent: orcfax-archiver
Payload-Oxum: 2048.4
Source-Organization: Orcfax
System-Identifier: 1c9e4c1a-1234-4d3b-9a0f-0d9f3c2b1a00
System-Name: validator
System-Version: 2.0.1
Unix-Time: 1714557606
";
