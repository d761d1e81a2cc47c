//! Driver matcher gateway library.
//!
//! Authenticates nearest-driver searches and forwards them to the driver
//! location service behind a circuit breaker.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod matcher;
pub mod observability;
pub mod resilience;
pub mod security;
pub mod upstream;

pub use config::MatcherConfig;
pub use error::DomainError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
