//! HTTP client for the driver location service.
//!
//! # Responsibilities
//! - Build the search query and attach the API key
//! - Run each call through the circuit breaker under a deadline
//! - Map transport, status and body outcomes to `DomainError`
//!
//! # Design Decisions
//! - A 404 is a healthy "nothing nearby" answer and does not trip the breaker
//! - Caller-facing messages never carry URLs or transport error text; those
//!   are logged here

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

use crate::config::UpstreamConfig;
use crate::error::{DomainError, DomainResult};
use crate::matcher::types::{DriverRecord, SearchRequest};
use crate::observability::metrics;
use crate::resilience::{with_deadline, BreakerError, CircuitBreaker};
use crate::upstream::DriverSearch;

/// Path of the search endpoint relative to the upstream base URL.
pub const SEARCH_PATH: &str = "driver/api/v1/search";

/// Errors building a `DriverClient`.
#[derive(Debug, Error)]
pub enum ClientInitError {
    #[error("invalid upstream base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    #[error("upstream API key contains characters not allowed in a header")]
    InvalidApiKey,
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Client for `GET {base}/driver/api/v1/search`.
pub struct DriverClient {
    http: reqwest::Client,
    search_url: Url,
    api_key: HeaderValue,
    timeout: Duration,
    breaker: Arc<CircuitBreaker>,
}

impl std::fmt::Debug for DriverClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverClient")
            .field("search_url", &self.search_url.as_str())
            .field("timeout", &self.timeout)
            .field("breaker", &self.breaker.name())
            .finish_non_exhaustive()
    }
}

impl DriverClient {
    /// Create a client that reports every outcome to `breaker`.
    pub fn new(config: &UpstreamConfig, breaker: Arc<CircuitBreaker>) -> Result<Self, ClientInitError> {
        let base = format!("{}/", config.base_url.trim_end_matches('/'));
        let search_url = Url::parse(&base)?.join(SEARCH_PATH)?;

        let mut api_key =
            HeaderValue::from_str(&config.api_key).map_err(|_| ClientInitError::InvalidApiKey)?;
        api_key.set_sensitive(true);

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            search_url,
            api_key,
            timeout: Duration::from_secs(config.timeout_secs),
            breaker,
        })
    }

    /// Override the per-call deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn search_url(&self) -> &Url {
        &self.search_url
    }

    async fn fetch(&self, request: &SearchRequest) -> DomainResult<DriverRecord> {
        let start = Instant::now();
        let result = match with_deadline(self.timeout, self.send(request)).await {
            Ok(result) => result,
            Err(elapsed) => {
                tracing::warn!(
                    latitude = request.latitude(),
                    longitude = request.longitude(),
                    radius = request.radius(),
                    error = %elapsed,
                    "Upstream call timed out"
                );
                Err(DomainError::Internal("upstream timeout".into()))
            }
        };

        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        };
        metrics::record_upstream_call(outcome, start);
        result
    }

    async fn send(&self, request: &SearchRequest) -> DomainResult<DriverRecord> {
        tracing::debug!(url = %self.search_url, "Requesting upstream search");

        let response = self
            .http
            .get(self.search_url.clone())
            .header(AUTHORIZATION, self.api_key.clone())
            .query(&[
                ("latitude", format!("{:.6}", request.latitude())),
                ("longitude", format!("{:.6}", request.longitude())),
                ("radius", request.radius().to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(
                    latitude = request.latitude(),
                    longitude = request.longitude(),
                    radius = request.radius(),
                    error = %e,
                    "Upstream request failed"
                );
                DomainError::Internal("upstream request failed".into())
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(DomainError::NotFound("no driver found".into()));
        }
        if !status.is_success() {
            tracing::warn!(
                latitude = request.latitude(),
                longitude = request.longitude(),
                radius = request.radius(),
                upstream_status = status.as_u16(),
                "Upstream returned error status"
            );
            return Err(DomainError::UpstreamUnavailable {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to read upstream body");
            DomainError::Internal("upstream request failed".into())
        })?;

        let driver: DriverRecord = serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!(
                upstream_status = status.as_u16(),
                error = %e,
                "Failed to decode upstream body"
            );
            DomainError::Internal("decode failure".into())
        })?;

        driver.check_contract().map_err(|violation| {
            tracing::warn!(driver_id = %driver.id, violation = %violation, "Upstream record violates contract");
            DomainError::Internal("decode failure".into())
        })?;

        Ok(driver)
    }
}

#[async_trait]
impl DriverSearch for DriverClient {
    async fn search(&self, request: &SearchRequest) -> DomainResult<DriverRecord> {
        let outcome = self
            .breaker
            .run_with(
                || self.fetch(request),
                |e| !matches!(e, DomainError::NotFound(_)),
            )
            .await;

        match outcome {
            Ok(driver) => Ok(driver),
            Err(BreakerError::Open) => {
                tracing::warn!(
                    breaker = %self.breaker.name(),
                    latitude = request.latitude(),
                    longitude = request.longitude(),
                    radius = request.radius(),
                    "Upstream call rejected by circuit breaker"
                );
                Err(DomainError::BreakerOpen)
            }
            Err(BreakerError::Inner(e)) => Err(e),
        }
    }
}
