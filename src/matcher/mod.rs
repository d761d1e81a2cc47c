//! Driver matching subsystem.
//!
//! # Data Flow
//! ```text
//! raw latitude / longitude / radius
//!     → validation.rs (range checks, no side effects)
//!     → SearchRequest (always in range)
//!     → service.rs (single upstream lookup via DriverSearch)
//!     → DriverRecord | DomainError
//! ```

pub mod service;
pub mod types;
pub mod validation;

pub use service::MatcherService;
pub use types::{DriverRecord, GeoPoint, GeometryType, SearchRequest};
pub use validation::validate;
