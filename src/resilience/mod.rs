//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to the driver service:
//!     → circuit_breaker.rs (fail fast when open, single probe when half-open)
//!     → timeouts.rs (per-call deadline)
//!     → outcome recorded by the breaker
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - No retries: the breaker fails fast instead
//! - Circuit breaker prevents cascading failures

pub mod circuit_breaker;
pub mod timeouts;

pub use circuit_breaker::{BreakerError, BreakerPolicy, BreakerState, CircuitBreaker};
pub use timeouts::{with_deadline, DeadlineExceeded};
