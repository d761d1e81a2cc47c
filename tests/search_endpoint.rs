//! End-to-end behaviour of the gateway router.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use driver_matcher::config::BreakerOpenPolicy;
use driver_matcher::http::{HttpServer, X_REQUEST_ID};
use driver_matcher::lifecycle::Shutdown;

use common::*;

async fn upstream_returning(template: ResponseTemplate, expected_calls: u64) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/driver/api/v1/search"))
        .respond_with(template)
        .expect(expected_calls)
        .mount(&server)
        .await;
    server
}

fn gateway(upstream: &MockServer) -> axum::Router {
    HttpServer::new(config_for(&upstream.uri())).unwrap().router()
}

#[tokio::test]
async fn test_returns_nearest_driver() {
    let upstream = upstream_returning(ResponseTemplate::new(200).set_body_json(driver_json()), 1).await;
    let token = valid_token();

    let response = gateway(&upstream)
        .oneshot(search_request(
            &search_uri("40.94289771", "28.0390297", "500000"),
            Some(&token),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(X_REQUEST_ID));
    assert_eq!(body_json(response).await, driver_json());
}

#[tokio::test]
async fn test_missing_token_never_reaches_upstream() {
    let upstream = upstream_returning(ResponseTemplate::new(200).set_body_json(driver_json()), 0).await;

    let response = gateway(&upstream)
        .oneshot(search_request(&search_uri("40.9", "28.0", "500"), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "missing authorization header" })
    );
}

#[tokio::test]
async fn test_rejects_bad_tokens() {
    let upstream = upstream_returning(ResponseTemplate::new(200), 0).await;
    let router = gateway(&upstream);

    let wrong_secret = driver_matcher::security::issue_token(
        "some-other-secret",
        &driver_matcher::security::AuthClaims::authenticated("mallory", 0, i64::MAX / 2),
    )
    .unwrap();

    for token in ["garbage", wrong_secret.as_str()] {
        let response = router
            .clone()
            .oneshot(search_request(&search_uri("40.9", "28.0", "500"), Some(token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await, json!({ "error": "invalid token" }));
    }
}

#[tokio::test]
async fn test_validation_errors_are_bad_requests() {
    let upstream = upstream_returning(ResponseTemplate::new(200), 0).await;
    let router = gateway(&upstream);
    let token = valid_token();

    let cases = [
        (search_uri("91", "28.0", "500"), "latitude out of range"),
        (search_uri("40.9", "-180.5", "500"), "longitude out of range"),
        (search_uri("40.9", "28.0", "0"), "radius must be positive"),
        (search_uri("north", "28.0", "500"), "latitude out of range"),
        (
            "/matcher/api/v1/search?latitude=40.9&longitude=28.0".to_string(),
            "radius must be positive",
        ),
    ];

    for (uri, message) in cases {
        let response = router
            .clone()
            .oneshot(search_request(&uri, Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body_json(response).await, json!({ "error": message }));
    }
}

#[tokio::test]
async fn test_repeated_query_keys_use_first_value() {
    let upstream = upstream_returning(ResponseTemplate::new(200).set_body_json(driver_json()), 1).await;

    let response = gateway(&upstream)
        .oneshot(search_request(
            "/matcher/api/v1/search?latitude=1&latitude=2&longitude=3&radius=10",
            Some(&valid_token()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, driver_json());
}

#[tokio::test]
async fn test_malformed_query_is_json_bad_request() {
    let upstream = upstream_returning(ResponseTemplate::new(200), 0).await;
    let router = gateway(&upstream);
    let token = valid_token();

    for uri in [
        "/matcher/api/v1/search?latitude=200&latitude=1&longitude=3&radius=10",
        "/matcher/api/v1/search?latitude=%ZZ&longitude=3&radius=10",
        "/matcher/api/v1/search?latitude&longitude=3&radius=10",
    ] {
        let response = router
            .clone()
            .oneshot(search_request(uri, Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(
            response.headers()[axum::http::header::CONTENT_TYPE],
            "application/json"
        );
        assert_eq!(
            body_json(response).await,
            json!({ "error": "latitude out of range" })
        );
    }
}

#[tokio::test]
async fn test_upstream_not_found_maps_to_404() {
    let upstream = upstream_returning(ResponseTemplate::new(404), 1).await;

    let response = gateway(&upstream)
        .oneshot(search_request(&search_uri("40.9", "28.0", "10"), Some(&valid_token())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "driver not found in the search radius" })
    );
}

#[tokio::test]
async fn test_upstream_failure_hides_details() {
    let upstream = upstream_returning(ResponseTemplate::new(500).set_body_string("db is down"), 1).await;

    let response = gateway(&upstream)
        .oneshot(search_request(&search_uri("40.9", "28.0", "10"), Some(&valid_token())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "internal server error" })
    );
}

async fn status_once_breaker_opens(policy: BreakerOpenPolicy) -> (StatusCode, serde_json::Value) {
    let upstream = upstream_returning(ResponseTemplate::new(503), 3).await;
    let router = HttpServer::new(config_with_policy(&upstream.uri(), policy))
        .unwrap()
        .router();
    let token = valid_token();
    let uri = search_uri("40.9", "28.0", "10");

    for _ in 0..3 {
        let response = router
            .clone()
            .oneshot(search_request(&uri, Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    let response = router
        .oneshot(search_request(&uri, Some(&token)))
        .await
        .unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

#[tokio::test]
async fn test_open_breaker_reports_unavailable_by_default() {
    let (status, body) = status_once_breaker_opens(BreakerOpenPolicy::ServiceUnavailable).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({ "error": "service temporarily unavailable" }));
}

#[tokio::test]
async fn test_open_breaker_can_report_not_found() {
    let (status, body) = status_once_breaker_opens(BreakerOpenPolicy::NotFound).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "driver not found in the search radius" }));
}

#[tokio::test]
async fn test_health_is_public() {
    let upstream = upstream_returning(ResponseTemplate::new(200), 0).await;
    let router = gateway(&upstream);

    let response = router
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));

    let response = router
        .oneshot(Request::post("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let upstream = upstream_returning(ResponseTemplate::new(200), 0).await;

    let response = gateway(&upstream)
        .oneshot(
            Request::get("/health")
                .header(X_REQUEST_ID, "req-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()[X_REQUEST_ID], "req-123");
}

#[tokio::test]
async fn test_server_stops_on_shutdown() {
    let upstream = upstream_returning(ResponseTemplate::new(200).set_body_json(driver_json()), 1).await;
    let server = HttpServer::new(config_for(&upstream.uri())).unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let handle = tokio::spawn(server.run(listener, shutdown.signalled()));

    let response = reqwest::Client::new()
        .get(format!("http://{addr}{}", search_uri("40.9", "28.0", "10")))
        .bearer_auth(valid_token())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    shutdown.trigger();
    tokio::time::timeout(std::time::Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
}
