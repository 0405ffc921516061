//! Bearer token extraction shared by `/auth/me` and `/authz/*` (spec §6).

use crate::error::ApiError;
use axum::http::HeaderMap;
use identity_core::error::IdentityError;
use identity_core::ids::CorrelationId;
use token_service::{Claims, TokenIssuer};

pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, ApiError> {
    let raw = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(IdentityError::BadCredentials)?;
    raw.strip_prefix("Bearer ")
        .ok_or(IdentityError::TokenMalformed {
            reason: "missing Bearer prefix".to_string(),
        })
        .map_err(ApiError::from)
}

pub fn authenticate(headers: &HeaderMap, issuer: &TokenIssuer) -> Result<Claims, ApiError> {
    let token = extract_bearer(headers)?;
    issuer.validate(token).map_err(ApiError::from)
}

/// Reads `X-Correlation-Id` if the caller supplied one; the facade
/// generates one otherwise (spec §4.7).
pub fn correlation_id(headers: &HeaderMap) -> Option<CorrelationId> {
    headers
        .get("x-correlation-id")
        .and_then(|value| value.to_str().ok())
        .map(|raw| CorrelationId(raw.to_string()))
}
