//! Upstream driver service subsystem.
//!
//! # Data Flow
//! ```text
//! SearchRequest
//!     → client.rs (build GET /driver/api/v1/search)
//!     → CircuitBreaker::run_with (fail fast or admit)
//!     → with_deadline (per-call timeout)
//!     → status / body mapping → DriverRecord | DomainError
//! ```

pub mod client;

use async_trait::async_trait;

use crate::error::DomainResult;
use crate::matcher::types::{DriverRecord, SearchRequest};

pub use client::{ClientInitError, DriverClient, SEARCH_PATH};

/// Looks up the nearest driver for an already validated search.
#[async_trait]
pub trait DriverSearch: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> DomainResult<DriverRecord>;
}
