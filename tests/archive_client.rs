//! Integration tests for ArchiveClient using wiremock.
//!
//! These tests verify request construction and skip handling against a mock
//! archive server.

use citytemp::config::ArchiveConfig;
use citytemp::{ArchiveClient, DateRange, FetchOutcome, SkipReason};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::Level;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, timeout_seconds: u32) -> ArchiveClient {
    let config = ArchiveConfig {
        base_url: format!("{}/v1", server.uri()),
        timeout_seconds,
        ..ArchiveConfig::default()
    };
    ArchiveClient::new(&config).unwrap()
}

fn range() -> DateRange {
    DateRange::parse("2023-01-01", "2023-01-01").unwrap()
}

fn archive_json(temperatures: &[f64]) -> serde_json::Value {
    let times: Vec<String> = (0..temperatures.len())
        .map(|hour| format!("2023-01-01T{hour:02}:00"))
        .collect();
    serde_json::json!({
        "latitude": 41.5,
        "longitude": -81.7,
        "generationtime_ms": 0.5,
        "utc_offset_seconds": -18000,
        "timezone": "America/New_York",
        "elevation": 199.0,
        "hourly": { "time": times, "temperature_2m": temperatures }
    })
}

/// In-memory log sink shared with a `fmt` subscriber
#[derive(Clone, Default)]
struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl LogCapture {
    fn warn_lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .filter(|line| line.contains("WARN"))
            .map(str::to_string)
            .collect()
    }
}

/// Run one fetch with a capturing subscriber installed on this thread
async fn fetch_logged(
    client: &ArchiveClient,
    latitude: &str,
    longitude: &str,
) -> (FetchOutcome, Vec<String>) {
    let capture = LogCapture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .without_time()
        .with_max_level(Level::WARN)
        .finish();

    let outcome = {
        let _guard = tracing::subscriber::set_default(subscriber);
        client.fetch(latitude, longitude, &range()).await
    };

    (outcome, capture.warn_lines())
}

async fn mount_hourly_body(mock_server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/v1/archive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_fetch_sends_expected_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/archive"))
        .and(query_param("latitude", "41.4995"))
        .and(query_param("longitude", "-81.6954"))
        .and(query_param("start_date", "2023-01-01"))
        .and(query_param("end_date", "2023-01-01"))
        .and(query_param("hourly", "temperature_2m"))
        .and(query_param("timezone", "America/New_York"))
        .and(query_param("temperature_unit", "fahrenheit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(archive_json(&[30.1, 29.8])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, 30);
    let outcome = client.fetch("41.4995", "-81.6954", &range()).await;

    let FetchOutcome::Fetched(readings) = outcome else {
        panic!("expected rows, got {outcome:?}");
    };
    assert_eq!(readings.len(), 2);
    assert_eq!(readings[0].temperature, 30.1);
    assert_eq!(readings[1].temperature, 29.8);
    assert_eq!(readings[0].elevation, 199.0);
}

#[tokio::test]
async fn test_server_error_is_transport_skip() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/archive"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, 30);
    let outcome = client.fetch("41.0817", "-81.5114", &range()).await;

    assert!(matches!(
        outcome,
        FetchOutcome::Skipped(SkipReason::Transport { .. })
    ));
}

#[tokio::test]
async fn test_bad_request_is_transport_skip() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/archive"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": true,
            "reason": "Parameter 'start_date' is out of allowed range"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, 30);
    let outcome = client.fetch("41.0817", "-81.5114", &range()).await;

    assert!(matches!(
        outcome,
        FetchOutcome::Skipped(SkipReason::Transport { .. })
    ));
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/archive"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(archive_json(&[30.0]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, 1);
    let outcome = client.fetch("41.0817", "-81.5114", &range()).await;

    assert!(matches!(
        outcome,
        FetchOutcome::Skipped(SkipReason::Transport { .. })
    ));
}

#[tokio::test]
async fn test_connection_refused_is_transport_skip() {
    let config = ArchiveConfig {
        base_url: "http://127.0.0.1:9/v1".to_string(),
        timeout_seconds: 5,
        ..ArchiveConfig::default()
    };
    let client = ArchiveClient::new(&config).unwrap();
    let outcome = client.fetch("41.6510", "-83.5419", &range()).await;

    assert!(matches!(
        outcome,
        FetchOutcome::Skipped(SkipReason::Transport { .. })
    ));
}

#[tokio::test]
async fn test_missing_hourly_is_no_data_skip() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/archive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "latitude": 41.5,
            "longitude": -81.7,
            "elevation": 199.0
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, 30);
    let outcome = client.fetch("41.4995", "-81.6954", &range()).await;

    assert_eq!(outcome, FetchOutcome::Skipped(SkipReason::MissingHourly));
}

#[tokio::test]
async fn test_empty_hourly_is_no_data_skip() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/archive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "latitude": 41.5,
            "longitude": -81.7,
            "elevation": 199.0,
            "hourly": {}
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, 30);
    let outcome = client.fetch("41.4995", "-81.6954", &range()).await;

    assert_eq!(outcome, FetchOutcome::Skipped(SkipReason::EmptyHourly));
}

#[tokio::test]
async fn test_transport_failure_logs_one_skip_notice() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/archive"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, 30);
    let (outcome, warnings) = fetch_logged(&client, "41.0817", "-81.5114").await;

    assert!(matches!(
        outcome,
        FetchOutcome::Skipped(SkipReason::Transport { .. })
    ));
    assert_eq!(warnings.len(), 1, "warnings: {warnings:?}");
    assert!(warnings[0].contains("41.0817, -81.5114"));
    assert!(warnings[0].contains("it will be skipped"));
}

#[tokio::test]
async fn test_missing_hourly_logs_one_no_data_notice() {
    let mock_server = MockServer::start().await;
    mount_hourly_body(
        &mock_server,
        serde_json::json!({ "latitude": 41.08, "longitude": -81.51, "elevation": 300.0 }),
    )
    .await;

    let client = client_for(&mock_server, 30);
    let (outcome, warnings) = fetch_logged(&client, "41.0817", "-81.5114").await;

    assert_eq!(outcome, FetchOutcome::Skipped(SkipReason::MissingHourly));
    assert_eq!(warnings.len(), 1, "warnings: {warnings:?}");
    assert!(warnings[0].contains("no temperature data available for 41.0817, -81.5114"));
}

#[tokio::test]
async fn test_empty_hourly_logs_one_no_data_notice() {
    let mock_server = MockServer::start().await;
    mount_hourly_body(
        &mock_server,
        serde_json::json!({
            "latitude": 41.08,
            "longitude": -81.51,
            "elevation": 300.0,
            "hourly": { "time": [], "temperature_2m": [] }
        }),
    )
    .await;

    let client = client_for(&mock_server, 30);
    let (outcome, warnings) = fetch_logged(&client, "41.0817", "-81.5114").await;

    assert_eq!(outcome, FetchOutcome::Skipped(SkipReason::EmptyHourly));
    assert_eq!(warnings.len(), 1, "warnings: {warnings:?}");
    assert!(warnings[0].contains("no temperature data available for 41.0817, -81.5114"));
}

#[tokio::test]
async fn test_successful_fetch_logs_no_warnings() {
    let mock_server = MockServer::start().await;
    mount_hourly_body(&mock_server, archive_json(&[30.0, 31.0])).await;

    let client = client_for(&mock_server, 30);
    let (outcome, warnings) = fetch_logged(&client, "41.0817", "-81.5114").await;

    assert_eq!(outcome.row_count(), 2);
    assert!(warnings.is_empty(), "warnings: {warnings:?}");
}
