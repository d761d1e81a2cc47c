//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Authorization header
//!     → jwt.rs (extract bearer token, verify HMAC signature, check claims)
//!     → AuthClaims attached to the request by http::middleware::auth
//! ```
//!
//! # Design Decisions
//! - Authentication happens at ingress, before validation or any network call
//! - Verification is a pure function of the header and the shared secret

pub mod jwt;

pub use jwt::{issue_token, AuthClaims, JwtGate, BEARER_PREFIX};
