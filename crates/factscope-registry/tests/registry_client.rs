//! Integration tests for ArweaveClient and RecordStoreClient.
//!
//! Uses wiremock for HTTP mocking. Tests cover bundle download, content-type
//! and size checks, status mapping (404/429/5xx) and roster retry behavior.

use std::io::Write;
use std::time::Duration;

use factscope_archive::{ArchiveError, BundleFetcher, ContentId, SourceRoster};
use factscope_registry::{ArweaveClient, ExplorerConfig, RecordStoreClient, EXPLORER_USER_AGENT};
use flate2::write::GzEncoder;
use flate2::Compression;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(mock_server: &MockServer) -> ExplorerConfig {
    ExplorerConfig::default()
        .with_arweave_url(mock_server.uri())
        .with_db_host(mock_server.uri())
        .with_timeout_secs(5)
        .with_roster_retry(2, Duration::from_millis(10))
}

fn small_bundle() -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    let data = b"Bag-Software-Agent: test\n";
    let mut header = tar::Header::new_gnu();
    header.set_size(data.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder
        .append_data(&mut header, "bag/bag-info.txt", &data[..])
        .unwrap();
    let tar = builder.into_inner().unwrap();

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&tar).unwrap();
    encoder.finish().unwrap()
}

// ==================== Arweave ====================

#[tokio::test]
async fn test_fetch_bundle_success() {
    let mock_server = MockServer::start().await;
    let bundle = small_bundle();

    Mock::given(method("GET"))
        .and(path("/tx-abc"))
        .and(header("user-agent", EXPLORER_USER_AGENT))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(bundle.clone(), "application/gzip"),
        )
        .mount(&mock_server)
        .await;

    let client = ArweaveClient::new(&test_config(&mock_server)).unwrap();
    let bytes = client
        .fetch_bundle(&ContentId::new("tx-abc"))
        .await
        .expect("fetch failed");

    assert_eq!(bytes.as_ref(), bundle.as_slice());
    let entries =
        factscope_archive::read_entries(&bytes, &factscope_archive::ExtractLimits::default())
            .unwrap();
    assert!(entries.iter().any(|e| e.path == "bag/bag-info.txt"));
}

#[tokio::test]
async fn test_fetch_bundle_accepts_x_tar() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tx-tar"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(small_bundle(), "application/x-tar"))
        .mount(&mock_server)
        .await;

    let client = ArweaveClient::new(&test_config(&mock_server)).unwrap();
    assert!(client.fetch_bundle(&ContentId::new("tx-tar")).await.is_ok());
}

#[tokio::test]
async fn test_fetch_bundle_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ArweaveClient::new(&test_config(&mock_server)).unwrap();
    let err = client
        .fetch_bundle(&ContentId::new("missing"))
        .await
        .unwrap_err();

    assert!(err.is_not_found(), "expected not found, got {:?}", err);
}

#[tokio::test]
async fn test_fetch_bundle_server_error_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ArweaveClient::new(&test_config(&mock_server)).unwrap();
    let err = client
        .fetch_bundle(&ContentId::new("flaky"))
        .await
        .unwrap_err();

    match err {
        ArchiveError::Retrieval { status, message } => {
            assert_eq!(status, Some(502));
            assert!(message.contains("bad gateway"));
        }
        other => panic!("expected Retrieval, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_bundle_html_is_unexpected_format() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html; charset=utf-8"),
        )
        .mount(&mock_server)
        .await;

    let client = ArweaveClient::new(&test_config(&mock_server)).unwrap();
    let err = client.fetch_bundle(&ContentId::new("page")).await.unwrap_err();

    match err {
        ArchiveError::UnexpectedFormat { content_type } => {
            assert_eq!(content_type.as_deref(), Some("text/html; charset=utf-8"));
        }
        other => panic!("expected UnexpectedFormat, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_bundle_empty_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(Vec::<u8>::new(), "application/gzip"))
        .mount(&mock_server)
        .await;

    let client = ArweaveClient::new(&test_config(&mock_server)).unwrap();
    let err = client.fetch_bundle(&ContentId::new("empty")).await.unwrap_err();

    assert!(matches!(err, ArchiveError::Retrieval { status: None, .. }));
}

#[tokio::test]
async fn test_fetch_bundle_over_limit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/big"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8; 4096], "application/gzip"))
        .mount(&mock_server)
        .await;

    let client = ArweaveClient::new(&test_config(&mock_server))
        .unwrap()
        .with_max_bundle_bytes(1024);
    let err = client.fetch_bundle(&ContentId::new("big")).await.unwrap_err();

    assert!(matches!(err, ArchiveError::LimitExceeded { .. }));
}

// ==================== Record store ====================

#[tokio::test]
async fn test_roster_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/explorer/sources/mainnet"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": "s1", "name": "Binance", "type": "CEX API", "collectionId": "c1"},
            {"id": "s2", "name": "MinSwap", "type": "DEX LP", "collectionId": "c1"}
        ])))
        .mount(&mock_server)
        .await;

    let client = RecordStoreClient::new(&test_config(&mock_server)).unwrap();
    let sources = client.sources("mainnet").await.expect("roster failed");

    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0].name, "Binance");
    assert_eq!(sources[1].id, "s2");
}

#[tokio::test]
async fn test_roster_network_id_is_one_path_segment() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/explorer/sources/main%2Fnet%3Fx"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": "s1", "name": "Bitstamp"}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = RecordStoreClient::new(&test_config(&mock_server)).unwrap();
    let sources = client.sources("main/net?x").await.expect("roster failed");

    assert_eq!(sources[0].name, "Bitstamp");
}

#[tokio::test]
async fn test_roster_retries_on_503() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/explorer/sources/preview"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/explorer/sources/preview"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": "s1", "name": "Kraken"}
        ])))
        .mount(&mock_server)
        .await;

    let client = RecordStoreClient::new(&test_config(&mock_server)).unwrap();
    let sources = client.sources("preview").await.expect("retry should succeed");

    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].name, "Kraken");
}

#[tokio::test]
async fn test_roster_retries_exhausted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/explorer/sources/mainnet"))
        .respond_with(ResponseTemplate::new(429))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = RecordStoreClient::new(&test_config(&mock_server)).unwrap();
    let err = client.sources("mainnet").await.unwrap_err();

    assert!(matches!(
        err,
        ArchiveError::Retrieval {
            status: Some(429),
            ..
        }
    ));
}

#[tokio::test]
async fn test_roster_no_retry_on_404() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/explorer/sources/unknown"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = RecordStoreClient::new(&test_config(&mock_server)).unwrap();
    let err = client.sources("unknown").await.unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_roster_invalid_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/explorer/sources/mainnet"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"items\": "))
        .mount(&mock_server)
        .await;

    let client = RecordStoreClient::new(&test_config(&mock_server)).unwrap();
    let err = client.sources("mainnet").await.unwrap_err();

    assert!(matches!(err, ArchiveError::Roster { .. }));
    assert!(err.to_string().starts_with("source roster unavailable"));
}
