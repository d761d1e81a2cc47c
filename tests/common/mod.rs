//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response};
use serde_json::{json, Value};

use driver_matcher::config::{BreakerOpenPolicy, MatcherConfig};
use driver_matcher::resilience::{BreakerPolicy, CircuitBreaker};
use driver_matcher::security::{issue_token, AuthClaims};

pub const JWT_SECRET: &str = "integration-secret";
pub const API_KEY: &str = "driver-api-key";

/// Config pointing the gateway at a mock driver service.
pub fn config_for(upstream_uri: &str) -> MatcherConfig {
    let mut config = MatcherConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.base_url = upstream_uri.into();
    config.upstream.api_key = API_KEY.into();
    config.auth.jwt_secret = JWT_SECRET.into();
    config
}

pub fn config_with_policy(upstream_uri: &str, policy: BreakerOpenPolicy) -> MatcherConfig {
    let mut config = config_for(upstream_uri);
    config.http.breaker_open_status = policy;
    config
}

pub fn breaker() -> Arc<CircuitBreaker> {
    Arc::new(CircuitBreaker::new("driver-service", BreakerPolicy::default()))
}

/// A valid bearer token signed with `JWT_SECRET`.
pub fn valid_token() -> String {
    let now = jsonwebtoken::get_current_timestamp() as i64;
    issue_token(JWT_SECRET, &AuthClaims::authenticated("rider-42", now, 300)).unwrap()
}

/// Driver record as the driver service serves it.
pub fn driver_json() -> Value {
    json!({
        "id": "abc",
        "location": { "type": "Point", "coordinates": [28.03, 40.94] },
        "distance": 120.5
    })
}

pub fn search_uri(latitude: &str, longitude: &str, radius: &str) -> String {
    format!("/matcher/api/v1/search?latitude={latitude}&longitude={longitude}&radius={radius}")
}

pub fn search_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
