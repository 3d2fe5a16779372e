//! Bundle fixtures shared by the CLI tests.
#![allow(dead_code)]

use base64::Engine;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::{json, Value};
use std::io::Write;
use std::path::Path;
use tar::{Builder, EntryType, Header};

pub const BAG_INFO: &str = "\
Bag-Software-Agent: bagit.py v1.8.1
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

fn b64(value: &Value) -> String {
    base64::engine::general_purpose::STANDARD.encode(serde_json::to_vec(value).unwrap())
}

fn message(request_url: &str, price: &str) -> Value {
    let inner = json!({
        "request_url": request_url,
        "response": b64(&json!({ "price": price }))
    });
    json!({
        "@context": "https://schema.org",
        "@type": "Message",
        "name": "data collection message",
        "messageAttachment": {
            "encoding": "application/json;base64",
            "text": b64(&inner)
        }
    })
}

fn cex_validation(values: &[&str]) -> Value {
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
        "additionalType": [
            {
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
            },
            {
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
            }
        ]
    })
}

fn append(builder: &mut Builder<Vec<u8>>, path: &str, content: &[u8], kind: EntryType) {
    let mut header = Header::new_gnu();
    header.set_entry_type(kind);
    header.set_size(content.len() as u64);
    header.set_mode(if kind == EntryType::Directory { 0o755 } else { 0o644 });
    header.set_mtime(0);
    builder.append_data(&mut header, path, content).unwrap();
}

/// A complete CEX bag: bag-info, two collector messages and a validation file.
pub fn cex_bundle() -> Vec<u8> {
    let mut builder = Builder::new(Vec::new());
    append(&mut builder, "bag/", b"", EntryType::Directory);
    append(&mut builder, "bag/bag-info.txt", BAG_INFO.as_bytes(), EntryType::Regular);
    append(&mut builder, "bag/data/", b"", EntryType::Directory);
    for (name, url, price) in [
        ("bag/data/message-binance.tick_2024-05-01T10:00:00Z.json", "https://api.binance.com", "0.45"),
        ("bag/data/message-kraken-2024-05-01T10:00:01Z.json", "https://api.kraken.com", "0.47"),
    ] {
        let body = serde_json::to_vec_pretty(&message(url, price)).unwrap();
        append(&mut builder, name, &body, EntryType::Regular);
    }
    let validation = serde_json::to_vec_pretty(&cex_validation(&["0.45", "0.47"])).unwrap();
    append(&mut builder, "bag/data/validation-ada-usd.json", &validation, EntryType::Regular);
    append(&mut builder, "bag/data/raw.bin", &[0xde, 0xad, 0xbe, 0xef], EntryType::Regular);

    let tar = builder.into_inner().unwrap();
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&tar).unwrap();
    encoder.finish().unwrap()
}

pub fn roster_json(names: &[&str]) -> String {
    let sources: Vec<Value> = names
        .iter()
        .enumerate()
        .map(|(i, name)| json!({ "id": format!("s{}", i + 1), "name": name, "type": "CEX API" }))
        .collect();
    serde_json::to_string(&sources).unwrap()
}

pub fn write_fixtures(dir: &Path, roster: &[&str]) -> (std::path::PathBuf, std::path::PathBuf) {
    let bundle = dir.join("tx-cex.tar.gz");
    let sources = dir.join("sources.json");
    std::fs::write(&bundle, cex_bundle()).unwrap();
    std::fs::write(&sources, roster_json(roster)).unwrap();
    (bundle, sources)
}
