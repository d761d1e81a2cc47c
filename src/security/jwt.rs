//! Bearer token verification.
//!
//! # Responsibilities
//! - Extract the token from an `Authorization` header value
//! - Verify an HMAC signature (HS256/HS384/HS512) with the shared secret
//! - Require the `authenticated: true` claim
//!
//! # Design Decisions
//! - Stateless: the secret is fixed at construction
//! - A missing `Bearer ` prefix is tolerated; the whole value is the token
//! - `exp` and `nbf` are enforced only when present

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::DomainError;

pub const BEARER_PREFIX: &str = "Bearer ";

/// Claims decoded from a verified token. Scoped to one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthClaims {
    /// True only when the claim is literally the JSON boolean `true`.
    #[serde(default, deserialize_with = "literal_true")]
    pub authenticated: bool,

    #[serde(rename = "sub", default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    #[serde(rename = "iat", default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<i64>,

    #[serde(rename = "exp", default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,

    /// Any other claims carried by the token.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AuthClaims {
    /// Claims for a freshly issued, authenticated token.
    pub fn authenticated(subject: impl Into<String>, issued_at: i64, ttl_secs: i64) -> Self {
        Self {
            authenticated: true,
            subject: Some(subject.into()),
            issued_at: Some(issued_at),
            expires_at: Some(issued_at + ttl_secs),
            extra: Map::new(),
        }
    }
}

fn literal_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}

/// Verifies bearer tokens signed with a shared HMAC secret.
#[derive(Clone)]
pub struct JwtGate {
    key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtGate")
            .field("algorithms", &self.validation.algorithms)
            .finish_non_exhaustive()
    }
}

impl JwtGate {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.required_spec_claims.clear();
        validation.validate_nbf = true;

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Authenticate a raw `Authorization` header value.
    pub fn authenticate(&self, header: Option<&str>) -> Result<AuthClaims, DomainError> {
        let header = header.filter(|h| !h.is_empty()).ok_or_else(|| {
            DomainError::Unauthorized("missing authorization header".into())
        })?;

        let token = header.trim();
        let token = token.strip_prefix(BEARER_PREFIX).unwrap_or(token).trim();

        let claims = decode::<AuthClaims>(token, &self.key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token verification failed");
                DomainError::Unauthorized("invalid token".into())
            })?
            .claims;

        if !claims.authenticated {
            tracing::debug!(subject = ?claims.subject, "Token lacks authenticated claim");
            return Err(DomainError::Unauthorized("unauthorized".into()));
        }

        Ok(claims)
    }
}

/// Sign `claims` with HS256.
pub fn issue_token(secret: &str, claims: &AuthClaims) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}
