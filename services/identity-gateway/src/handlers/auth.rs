//! `/auth/token`, `/auth/me`, `/auth/health` (spec §6).

use crate::bearer::authenticate;
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Json;
use identity_core::{BUILD_INFO, VERSION};
use serde_json::{json, Value};
use std::sync::Arc;
use token_service::GrantRequest;
use tracing::instrument;

#[instrument(skip(state, request))]
pub async fn issue_token(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GrantRequest>,
) -> Result<Json<Value>, ApiError> {
    let issued = state.token_issuer.issue(request)?;
    Ok(Json(json!({
        "access_token": issued.access_token,
        "token_type": issued.token_type,
        "expires_in": issued.expires_in,
    })))
}

#[instrument(skip(state, headers))]
pub async fn me(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<token_service::Claims>, ApiError> {
    let claims = authenticate(&headers, &state.token_issuer)?;
    Ok(Json(claims))
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "auth",
        "version": VERSION,
        "build": BUILD_INFO,
    }))
}
