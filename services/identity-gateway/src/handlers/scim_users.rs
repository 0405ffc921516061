//! `/scim/v2/Users[...]` (spec §6, §4.6).

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use scim_service::{CreateUserRequest, PatchUserRequest};
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    filter: Option<String>,
}

#[instrument(skip(state, request))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let user = state.user_service.create(request)?;
    Ok((StatusCode::CREATED, Json(serde_json::to_value(&*user).unwrap())))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = state.user_service.get(&id)?;
    Ok(Json(serde_json::to_value(&*user).unwrap()))
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let response = state.user_service.list(query.filter.as_deref())?;
    Ok(Json(serde_json::to_value(response).unwrap()))
}

#[instrument(skip(state, patch))]
pub async fn patch(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<PatchUserRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = state.user_service.patch(&id, patch)?;
    Ok(Json(serde_json::to_value(&*user).unwrap()))
}

pub async fn delete(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    state.user_service.delete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}
