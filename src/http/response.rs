//! Error → response mapping.
//!
//! | Domain error | Status |
//! |---|---|
//! | Validation | 400 |
//! | Unauthorized | 401 |
//! | NotFound | 404 |
//! | BreakerOpen | 503, or 404 under `BreakerOpenPolicy::NotFound` |
//! | UpstreamUnavailable | 500 |
//! | Internal | 500 |
//!
//! Bodies are `{"error": "..."}`. Server-side failures get a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::config::BreakerOpenPolicy;
use crate::error::DomainError;

pub const NOT_FOUND_MESSAGE: &str = "driver not found in the search radius";
pub const DEGRADED_MESSAGE: &str = "service temporarily unavailable";
pub const INTERNAL_MESSAGE: &str = "internal server error";

/// JSON error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// A domain error paired with the deployment's breaker policy.
#[derive(Debug)]
pub struct ApiError {
    error: DomainError,
    breaker_policy: BreakerOpenPolicy,
}

impl ApiError {
    pub fn new(error: DomainError, breaker_policy: BreakerOpenPolicy) -> Self {
        Self {
            error,
            breaker_policy,
        }
    }

    pub fn status(&self) -> StatusCode {
        match &self.error {
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::BreakerOpen => match self.breaker_policy {
                BreakerOpenPolicy::NotFound => StatusCode::NOT_FOUND,
                BreakerOpenPolicy::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            },
            DomainError::UpstreamUnavailable { .. } | DomainError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show the caller.
    pub fn public_message(&self) -> String {
        match &self.error {
            DomainError::Validation(m) | DomainError::Unauthorized(m) => m.clone(),
            DomainError::NotFound(_) => NOT_FOUND_MESSAGE.to_string(),
            DomainError::BreakerOpen => match self.breaker_policy {
                BreakerOpenPolicy::NotFound => NOT_FOUND_MESSAGE.to_string(),
                BreakerOpenPolicy::ServiceUnavailable => DEGRADED_MESSAGE.to_string(),
            },
            DomainError::UpstreamUnavailable { .. } | DomainError::Internal(_) => {
                INTERNAL_MESSAGE.to_string()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.public_message(),
        };
        (self.status(), Json(body)).into_response()
    }
}
