//! Bearer authentication middleware.
//!
//! Runs the JWT gate before the handler and attaches `AuthClaims` to the
//! request extensions. Rejections never reach the matcher.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::DomainError;
use crate::http::request::request_id;
use crate::http::response::ApiError;
use crate::http::server::AppState;

pub async fn require_bearer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let verdict = match request.headers().get(AUTHORIZATION) {
        None => state.gate.authenticate(None),
        Some(value) => match value.to_str() {
            Ok(header) => state.gate.authenticate(Some(header)),
            Err(_) => Err(DomainError::Unauthorized("invalid token".into())),
        },
    };

    match verdict {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            tracing::warn!(
                request_id = %request_id(&request),
                path = %request.uri().path(),
                error = %e,
                "Rejected unauthenticated request"
            );
            ApiError::new(e, state.breaker_policy).into_response()
        }
    }
}
