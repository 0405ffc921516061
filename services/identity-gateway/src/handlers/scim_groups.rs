//! `/scim/v2/Groups[...]` and its member sub-routes (spec §6, §4.6).

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use scim_service::{CreateGroupRequest, GroupPatch};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    filter: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    member: String,
}

#[instrument(skip(state, request))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let group = state.group_service.create(request)?;
    Ok((StatusCode::CREATED, Json(serde_json::to_value(group).unwrap())))
}

pub async fn get(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Result<Json<Value>, ApiError> {
    let group = state.group_service.get(&id)?;
    Ok(Json(serde_json::to_value(group).unwrap()))
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    let response = state.group_service.list(query.filter.as_deref())?;
    Ok(Json(serde_json::to_value(response).unwrap()))
}

#[instrument(skip(state, patch))]
pub async fn patch(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<GroupPatch>,
) -> Result<Json<Value>, ApiError> {
    let group = state.group_service.patch(&id, patch)?;
    Ok(Json(serde_json::to_value(group).unwrap()))
}

pub async fn delete(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    state.group_service.delete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, request))]
pub async fn add_member(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<AddMemberRequest>,
) -> Result<Json<Value>, ApiError> {
    let group = state
        .group_service
        .patch(&id, GroupPatch::AddMember { member: request.member })?;
    Ok(Json(serde_json::to_value(group).unwrap()))
}

pub async fn remove_member(
    State(state): State<Arc<AppState>>,
    Path((id, user_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state
        .group_service
        .patch(&id, GroupPatch::RemoveMember { member: user_id })?;
    Ok(StatusCode::NO_CONTENT)
}
