//! Metrics collection and exposition.
//!
//! # Metrics
//! - `matcher_requests_total` (counter): search requests by status
//! - `matcher_request_duration_seconds` (histogram): end-to-end latency
//! - `matcher_upstream_calls_total` (counter): upstream attempts by outcome
//! - `matcher_upstream_duration_seconds` (histogram): upstream latency
//! - `matcher_breaker_state` (gauge): 0=closed, 1=open, 2=half-open
//! - `matcher_breaker_rejections_total` (counter): fail-fast rejections
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::resilience::circuit_breaker::BreakerState;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed search request.
pub fn record_request(status: u16, start: Instant) {
    counter!("matcher_requests_total", "status" => status.to_string()).increment(1);
    histogram!("matcher_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record one upstream attempt.
pub fn record_upstream_call(outcome: &'static str, start: Instant) {
    counter!("matcher_upstream_calls_total", "outcome" => outcome).increment(1);
    histogram!("matcher_upstream_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_breaker_state(breaker: &str, state: BreakerState) {
    let value = match state {
        BreakerState::Closed => 0.0,
        BreakerState::Open => 1.0,
        BreakerState::HalfOpen => 2.0,
    };
    gauge!("matcher_breaker_state", "breaker" => breaker.to_string()).set(value);
}

pub fn record_breaker_rejection(breaker: &str) {
    counter!("matcher_breaker_rejections_total", "breaker" => breaker.to_string()).increment(1);
}
