//! `/authz/evaluate`, `/authz/policies/reload`, `/authz/health` (spec §6,
//! §9 "Admin authorization loop": the reload endpoint is guarded by the
//! PDP itself, not a hardcoded group check).

use crate::bearer::{authenticate, correlation_id};
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Json;
use identity_core::error::IdentityError;
use identity_core::{BUILD_INFO, VERSION};
use policy_engine::EvaluationRequest;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use token_service::Claims;
use tracing::instrument;

fn admin_check_request(claims: &Claims) -> EvaluationRequest {
    EvaluationRequest {
        subject: HashMap::from([
            ("sub".to_string(), json!(claims.sub)),
            ("groups".to_string(), json!(claims.groups)),
            ("dept".to_string(), json!(claims.dept)),
            ("riskScore".to_string(), json!(claims.risk_score)),
        ]),
        resource: HashMap::from([("type".to_string(), json!("policy_admin"))]),
        context: HashMap::new(),
        action: Some("reload".to_string()),
    }
}

#[instrument(skip(state, headers, request))]
pub async fn evaluate(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<EvaluationRequest>,
) -> Result<Json<Value>, ApiError> {
    let claims = authenticate(&headers, &state.token_issuer)?;
    let decision = state
        .facade
        .evaluate(request, correlation_id(&headers), Some(claims.sub));
    Ok(Json(serde_json::to_value(decision).unwrap()))
}

#[instrument(skip(state, headers))]
pub async fn reload(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Result<Json<Value>, ApiError> {
    let claims = authenticate(&headers, &state.token_issuer)?;

    let admin_decision = state.facade.evaluate(
        admin_check_request(&claims),
        correlation_id(&headers),
        Some(claims.sub.clone()),
    );
    if admin_decision.decision != policy_engine::DecisionKind::Permit {
        return Err(IdentityError::Forbidden {
            reason: "reload requires a policy permitting policy_admin/reload".to_string(),
        }
        .into());
    }

    state.policies.reload(Path::new(&state.policies_path))?;
    Ok(Json(json!({ "status": "reloaded" })))
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "authz",
        "version": VERSION,
        "build": BUILD_INFO,
    }))
}
