//! Search input validation.
//!
//! Pure checks over plain numbers; runs before any network call.

use std::ops::RangeInclusive;

use crate::error::DomainError;
use crate::matcher::types::SearchRequest;

pub const LATITUDE_RANGE: RangeInclusive<f64> = -90.0..=90.0;
pub const LONGITUDE_RANGE: RangeInclusive<f64> = -180.0..=180.0;

/// Validate raw search input.
///
/// Each bound is checked on its own; the first failure in the order
/// latitude, longitude, radius is reported. NaN fails the range checks.
pub fn validate(latitude: f64, longitude: f64, radius: i64) -> Result<SearchRequest, DomainError> {
    let latitude_ok = LATITUDE_RANGE.contains(&latitude);
    let longitude_ok = LONGITUDE_RANGE.contains(&longitude);
    let radius = u64::try_from(radius).ok().filter(|r| *r > 0);

    if !latitude_ok {
        return Err(DomainError::Validation("latitude out of range".into()));
    }
    if !longitude_ok {
        return Err(DomainError::Validation("longitude out of range".into()));
    }
    let Some(radius) = radius else {
        return Err(DomainError::Validation("radius must be positive".into()));
    };

    Ok(SearchRequest {
        latitude,
        longitude,
        radius,
    })
}
