//! Driver client behaviour against a mock driver service.

mod common;

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use driver_matcher::error::DomainError;
use driver_matcher::matcher::validation::validate;
use driver_matcher::upstream::{DriverClient, DriverSearch};

use common::*;

async fn client_for(server: &MockServer) -> DriverClient {
    DriverClient::new(&config_for(&server.uri()).upstream, breaker()).unwrap()
}

#[tokio::test]
async fn test_search_sends_query_and_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/driver/api/v1/search"))
        .and(query_param("latitude", "40.942898"))
        .and(query_param("longitude", "28.039030"))
        .and(query_param("radius", "500"))
        .and(header("authorization", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(driver_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let request = validate(40.94289771, 28.0390297, 500).unwrap();
    let driver = client.search(&request).await.unwrap();

    assert_eq!(driver.id, "abc");
    assert_eq!(driver.distance, 120.5);
    assert_eq!(driver.location.longitude(), 28.03);
    assert_eq!(driver.location.latitude(), 40.94);
}

#[tokio::test]
async fn test_not_found_passes_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let request = validate(0.0, 0.0, 10).unwrap();
    assert!(matches!(
        client.search(&request).await,
        Err(DomainError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_server_error_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let request = validate(0.0, 0.0, 10).unwrap();
    assert_eq!(
        client.search(&request).await,
        Err(DomainError::UpstreamUnavailable { status: 502 })
    );
}

#[tokio::test]
async fn test_malformed_bodies_are_decode_failures() {
    let bodies = [
        json!({ "id": "d-1" }),
        json!({
            "id": "d-1",
            "location": { "type": "Polygon", "coordinates": [1.0, 2.0] },
            "distance": 1.0
        }),
        json!({
            "id": "d-1",
            "location": { "type": "Point", "coordinates": [1.0, 2.0, 3.0] },
            "distance": 1.0
        }),
        json!({
            "id": "d-1",
            "location": { "type": "Point", "coordinates": [1.0, 2.0] },
            "distance": -4.0
        }),
    ];

    for body in bodies {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let request = validate(0.0, 0.0, 10).unwrap();
        assert_eq!(
            client.search(&request).await,
            Err(DomainError::Internal("decode failure".into()))
        );
    }
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(driver_json())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = client_for(&server)
        .await
        .with_timeout(Duration::from_millis(100));
    let request = validate(0.0, 0.0, 10).unwrap();
    assert_eq!(
        client.search(&request).await,
        Err(DomainError::Internal("upstream timeout".into()))
    );
}

#[tokio::test]
async fn test_unreachable_upstream_is_internal() {
    // Nothing listens on port 1.
    let client = DriverClient::new(&config_for("http://127.0.0.1:1").upstream, breaker()).unwrap();
    let request = validate(0.0, 0.0, 10).unwrap();
    assert_eq!(
        client.search(&request).await,
        Err(DomainError::Internal("upstream request failed".into()))
    );
}

#[tokio::test]
async fn test_breaker_opens_after_consecutive_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let request = validate(0.0, 0.0, 10).unwrap();

    for _ in 0..3 {
        assert_eq!(
            client.search(&request).await,
            Err(DomainError::UpstreamUnavailable { status: 500 })
        );
    }
    // Rejected without reaching the mock.
    assert_eq!(client.search(&request).await, Err(DomainError::BreakerOpen));
}

#[tokio::test]
async fn test_not_found_does_not_trip_breaker() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(5)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let request = validate(0.0, 0.0, 10).unwrap();

    for _ in 0..5 {
        assert!(matches!(
            client.search(&request).await,
            Err(DomainError::NotFound(_))
        ));
    }
}
