//! The HTTP surface from spec §6, wired onto [`AppState`].

use crate::handlers::{auth, authz, scim_groups, scim_users};
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use identity_core::endpoints;
use std::sync::Arc;

pub fn build(state: Arc<AppState>) -> Router {
    Router::new()
        .route(endpoints::AUTH_TOKEN, post(auth::issue_token))
        .route(endpoints::AUTH_ME, get(auth::me))
        .route(endpoints::AUTH_HEALTH, get(auth::health))
        .route(
            endpoints::SCIM_USERS,
            get(scim_users::list).post(scim_users::create),
        )
        .route(
            endpoints::SCIM_USER_BY_ID,
            get(scim_users::get).patch(scim_users::patch).delete(scim_users::delete),
        )
        .route(
            endpoints::SCIM_GROUPS,
            get(scim_groups::list).post(scim_groups::create),
        )
        .route(
            endpoints::SCIM_GROUP_BY_ID,
            get(scim_groups::get).patch(scim_groups::patch).delete(scim_groups::delete),
        )
        .route(endpoints::SCIM_GROUP_MEMBERS, post(scim_groups::add_member))
        .route(endpoints::SCIM_GROUP_MEMBER_BY_ID, axum::routing::delete(scim_groups::remove_member))
        .route(endpoints::AUTHZ_EVALUATE, post(authz::evaluate))
        .route(endpoints::AUTHZ_POLICIES_RELOAD, post(authz::reload))
        .route(endpoints::AUTHZ_HEALTH, get(authz::health))
        .with_state(state)
}
