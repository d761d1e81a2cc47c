//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize, environment overrides)
//!     → validation.rs (semantic checks)
//!     → MatcherConfig (validated, immutable)
//!     → handed to the subsystems at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Secrets can come from the environment instead of the file

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AuthConfig, BreakerConfig, BreakerOpenPolicy, HttpConfig, ListenerConfig, LogFormat,
    MatcherConfig, ObservabilityConfig, UpstreamConfig,
};
pub use validation::ValidationError;
