//! Snapshot fetcher and dashboard against a mock repos-server

mod common;

use assert_matches::assert_matches;
use common::{MockRecord, TestDataSets, DATA_PATH};
use repos_viewer::fetch::DEFAULT_DATA_PATH;
use repos_viewer::{Dashboard, DisplayMode, FetchError, SnapshotFetcher, SnapshotSource};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher_for(server: &MockServer) -> SnapshotFetcher {
    SnapshotFetcher::new(&server.uri(), DEFAULT_DATA_PATH).expect("valid mock server uri")
}

#[tokio::test]
async fn test_fetch_parses_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DATA_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(TestDataSets::fleet_payload()))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = fetcher_for(&server).fetch().await.unwrap();

    assert_eq!(snapshot.len(), 4);
    assert_eq!(snapshot.records[1].name(), "zeta");
    assert!(snapshot.records[1].state.dirty);
    assert!(snapshot.records[0].config.ignore);
    assert_eq!(snapshot.raw, TestDataSets::fleet_payload());
}

#[tokio::test]
async fn test_fetch_sends_same_origin_and_origin_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DATA_PATH))
        .and(header("Sec-Fetch-Site", "same-origin"))
        .and(header("Origin", "http://dashboard.local"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server).with_origin(Some("http://dashboard.local".to_string()));
    let snapshot = fetcher.fetch().await.unwrap();
    assert!(snapshot.is_empty());
}

#[tokio::test]
async fn test_fetch_server_error_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DATA_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = fetcher_for(&server).fetch().await.unwrap_err();
    assert_matches!(err, FetchError::Status { status, .. } if status.as_u16() == 500);
}

#[tokio::test]
async fn test_fetch_forbidden_origin_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DATA_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let err = fetcher_for(&server).fetch().await.unwrap_err();
    assert_matches!(err, FetchError::Status { status, .. } if status.as_u16() == 403);
}

#[tokio::test]
async fn test_fetch_malformed_body_is_payload_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DATA_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let err = fetcher_for(&server).fetch().await.unwrap_err();
    assert_matches!(err, FetchError::Payload { .. });
}

#[tokio::test]
async fn test_fetch_wrong_shape_is_payload_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DATA_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"Config": {}}"#))
        .mount(&server)
        .await;

    let err = fetcher_for(&server).fetch().await.unwrap_err();
    assert_matches!(err, FetchError::Payload { .. });
}

#[tokio::test]
async fn test_fetch_connection_refused_is_transport_error() {
    // Bind and release a port so nothing is listening on it
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let fetcher = SnapshotFetcher::new(&format!("http://127.0.0.1:{}", port), DEFAULT_DATA_PATH).unwrap();
    let err = fetcher.fetch().await.unwrap_err();
    assert_matches!(err, FetchError::Transport { .. });
}

#[tokio::test]
async fn test_fetch_timeout_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DATA_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("[]")
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server).with_timeout(Some(Duration::from_millis(50)));
    let err = fetcher.fetch().await.unwrap_err();
    assert_matches!(err, FetchError::Transport { .. });
}

#[tokio::test]
async fn test_dashboard_keeps_view_when_refresh_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DATA_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(TestDataSets::fleet_payload()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(DATA_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut dashboard = Dashboard::new(Arc::new(fetcher_for(&server)));
    let mode = DisplayMode::default();

    let first = dashboard.refresh(mode).await.unwrap().clone();
    let names: Vec<&str> = first.table.rows.iter().map(|r| r.name.text.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "zeta"]);

    assert!(dashboard.refresh(mode).await.is_err());
    assert_eq!(dashboard.view(), Some(&first));
}

#[tokio::test]
async fn test_dashboard_replaces_view_on_next_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DATA_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(TestDataSets::fleet_payload()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    let later = TestDataSets::payload(&[MockRecord::new("solo").untracked(1, 2)]);
    Mock::given(method("GET"))
        .and(path(DATA_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(later))
        .mount(&server)
        .await;

    let mut dashboard = Dashboard::new(Arc::new(fetcher_for(&server)));
    let mode = DisplayMode::new(false, true);

    assert_eq!(dashboard.refresh(mode).await.unwrap().table.len(), 3);

    let view = dashboard.refresh(mode).await.unwrap();
    assert_eq!(view.table.len(), 1);
    assert_eq!(view.table.rows[0].name.text, "solo");
    assert_eq!(view.table.rows[0].untracked_files.text, "1d,2f");
    assert!(!view.inspector_html.contains("zeta"));
}
