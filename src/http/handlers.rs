//! Route handlers.

use std::time::Instant;

use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Serialize;

use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::security::AuthClaims;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus { status: "ok" })
}

/// Raw search query. Values stay strings so that malformed input reaches the
/// validator instead of being rejected by the extractor.
#[derive(Debug, Default)]
pub struct SearchParams {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub radius: Option<String>,
}

impl SearchParams {
    /// Parse a urlencoded query. The first occurrence of a key wins and
    /// unknown keys are ignored.
    pub fn from_query(query: Option<&str>) -> Self {
        let mut params = Self::default();
        let Some(query) = query else {
            return params;
        };

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let slot = match key.as_ref() {
                "latitude" => &mut params.latitude,
                "longitude" => &mut params.longitude,
                "radius" => &mut params.radius,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }

    /// Missing or unparsable coordinates become NaN and a bad radius becomes
    /// zero, so each fails its own range check with the usual message.
    pub fn to_numeric(&self) -> (f64, f64, i64) {
        let coordinate = |value: &Option<String>| {
            value
                .as_deref()
                .and_then(|v| v.trim().parse::<f64>().ok())
                .unwrap_or(f64::NAN)
        };
        let radius = self
            .radius
            .as_deref()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(0);

        (coordinate(&self.latitude), coordinate(&self.longitude), radius)
    }
}

/// `GET /matcher/api/v1/search`
pub async fn search_driver(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    RawQuery(query): RawQuery,
) -> Response {
    let start = Instant::now();
    let (latitude, longitude, radius) = SearchParams::from_query(query.as_deref()).to_numeric();

    tracing::debug!(subject = ?claims.subject, latitude, longitude, radius, "Search request");

    let response = match state
        .matcher
        .find_nearest_driver(latitude, longitude, radius)
        .await
    {
        Ok(driver) => (StatusCode::OK, Json(driver)).into_response(),
        Err(e) => ApiError::new(e, state.breaker_policy).into_response(),
    };

    metrics::record_request(response.status().as_u16(), start);
    response
}
