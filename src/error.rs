//! Domain error taxonomy.
//!
//! `DomainError` is the only error type that crosses component boundaries
//! (validator, gate, upstream client, orchestrator). Translation to an HTTP
//! status happens once, in `http::response`.

use thiserror::Error;

/// Errors produced by the matcher core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// Out-of-range or malformed search input.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Missing, malformed or unauthorised bearer token.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The upstream reported no driver within the radius.
    #[error("not found: {0}")]
    NotFound(String),

    /// The circuit breaker rejected the call without contacting the upstream.
    #[error("circuit breaker open: failing fast")]
    BreakerOpen,

    /// The upstream answered with a non-2xx, non-404 status.
    #[error("upstream unavailable: status {status}")]
    UpstreamUnavailable { status: u16 },

    /// Decode failures, transport errors and anything else unexpected.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Short, stable label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Unauthorized(_) => "unauthorized",
            Self::NotFound(_) => "not_found",
            Self::BreakerOpen => "breaker_open",
            Self::UpstreamUnavailable { .. } => "upstream_unavailable",
            Self::Internal(_) => "internal",
        }
    }

    /// Upstream HTTP status carried by the error, if any.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::UpstreamUnavailable { status } => Some(*status),
            _ => None,
        }
    }
}

/// Convenience alias for core results.
pub type DomainResult<T> = Result<T, DomainError>;
