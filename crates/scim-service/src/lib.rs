//! # SCIM Service
//!
//! CRUD over users and groups under the standardized provisioning schema
//! (spec §4.6), enforcing userName/displayName uniqueness and group
//! membership referential integrity on top of the record store.

pub mod groups;
pub mod users;

pub use groups::{CreateGroupRequest, GroupPatch, GroupService};
pub use users::{CreateUserRequest, PatchUserRequest, UserService};

use serde::Serialize;

/// The `{totalResults, Resources[]}` wrapper every list endpoint returns
/// (spec §4.6, §6).
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub schemas: Vec<String>,
    #[serde(rename = "totalResults")]
    pub total_results: usize,
    #[serde(rename = "Resources")]
    pub resources: Vec<T>,
}
