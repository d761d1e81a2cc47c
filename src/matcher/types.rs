//! Search input and driver records.

use serde::{Deserialize, Serialize};

/// A validated search. Only `validation::validate` constructs one, so every
/// instance is in range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchRequest {
    pub(super) latitude: f64,
    pub(super) longitude: f64,
    pub(super) radius: u64,
}

impl SearchRequest {
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Search radius in meters, always positive.
    pub fn radius(&self) -> u64 {
        self.radius
    }
}

/// GeoJSON geometry tag. Only points are produced by the driver service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryType {
    Point,
}

/// A GeoJSON point, `coordinates` ordered `[longitude, latitude]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "type")]
    pub kind: GeometryType,
    pub coordinates: [f64; 2],
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            kind: GeometryType::Point,
            coordinates: [longitude, latitude],
        }
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }
}

/// The nearest driver as reported by the upstream, passed through as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverRecord {
    pub id: String,
    pub location: GeoPoint,
    /// Distance from the search point in meters.
    pub distance: f64,
}

impl DriverRecord {
    /// Check the data contract that serde cannot express.
    pub fn check_contract(&self) -> Result<(), String> {
        if !self.distance.is_finite() || self.distance < 0.0 {
            return Err(format!("distance {} is not a non-negative number", self.distance));
        }
        Ok(())
    }
}
