//! Nearest-driver orchestration.

use std::sync::Arc;

use crate::error::{DomainError, DomainResult};
use crate::matcher::types::DriverRecord;
use crate::matcher::validation::validate;
use crate::upstream::DriverSearch;

/// Validates a search and performs a single upstream lookup.
///
/// No retries and no caching: one logical attempt per call.
#[derive(Clone)]
pub struct MatcherService {
    client: Arc<dyn DriverSearch>,
}

impl MatcherService {
    pub fn new(client: Arc<dyn DriverSearch>) -> Self {
        Self { client }
    }

    /// Find the driver nearest to the given point within `radius` meters.
    pub async fn find_nearest_driver(
        &self,
        latitude: f64,
        longitude: f64,
        radius: i64,
    ) -> DomainResult<DriverRecord> {
        let request = validate(latitude, longitude, radius).inspect_err(|e| {
            tracing::info!(latitude, longitude, radius, error = %e, "Rejected search input");
        })?;

        tracing::debug!(latitude, longitude, radius, "Finding nearest driver");

        self.client.search(&request).await.inspect_err(|e| match e {
            DomainError::NotFound(_) => {
                tracing::info!(latitude, longitude, radius, "No driver within radius");
            }
            other => tracing::warn!(
                latitude,
                longitude,
                radius,
                kind = other.kind(),
                upstream_status = other.upstream_status(),
                error = %other,
                "Failed to find nearest driver"
            ),
        })
    }
}
