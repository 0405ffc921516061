//! Group provisioning and membership management (spec §4.6 table, Group
//! rows). Dangling member references left behind by a deleted user are
//! cleaned lazily — on the next write to the group, and filtered out of
//! every read in the meantime (spec §4.6, §3 "must not be referenced by
//! any group after deletion").

use crate::ListResponse;
use chrono::Utc;
use identity_core::error::{IdentityError, Result};
use identity_core::ids::new_group_id;
use identity_core::model::{Group, GroupMember, Meta, GROUP_SCHEMA};
use record_store::{GroupStore, UserStore};
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;

#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    pub display_name: String,
    #[serde(default)]
    pub members: Vec<String>,
}

/// A PATCH body: either a full membership replacement or a single
/// add/remove, per spec §4.6 "Full replacement of members or per-member
/// add/remove".
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum GroupPatch {
    Replace { members: Vec<String> },
    AddMember { member: String },
    RemoveMember { member: String },
}

pub struct GroupService {
    groups: Arc<GroupStore>,
    users: Arc<UserStore>,
}

impl GroupService {
    pub fn new(groups: Arc<GroupStore>, users: Arc<UserStore>) -> Self {
        Self { groups, users }
    }

    fn member_for(&self, user_id: &str) -> Result<GroupMember> {
        let user = self.users.get(user_id).ok_or_else(|| IdentityError::NotFound {
            what: format!("user {user_id}"),
        })?;
        Ok(GroupMember {
            value: user.id.clone(),
            display: Some(user.user_name.clone()),
        })
    }

    /// Drops members whose user no longer exists — the "list endpoint
    /// must not return dangling references" half of the contract.
    fn without_dangling(&self, group: &Group) -> Group {
        let mut filtered = group.clone();
        filtered.members.retain(|m| self.users.get(&m.value).is_some());
        filtered
    }

    #[instrument(skip(self, request), fields(display_name = %request.display_name))]
    pub fn create(&self, request: CreateGroupRequest) -> Result<Group> {
        if request.display_name.trim().is_empty() {
            return Err(IdentityError::BadRequest {
                reason: "displayName must not be empty".to_string(),
            });
        }

        let mut members = Vec::new();
        for user_id in &request.members {
            let member = self.member_for(user_id)?;
            if !members.iter().any(|m: &GroupMember| m.value == member.value) {
                members.push(member);
            }
        }

        let now = Utc::now();
        let id = new_group_id();
        let group = Group {
            schemas: vec![GROUP_SCHEMA.to_string()],
            id: id.clone(),
            display_name: request.display_name,
            members,
            meta: Meta {
                resource_type: "Group".to_string(),
                created: now,
                last_modified: now,
                location: format!("/scim/v2/Groups/{id}"),
            },
        };

        let inserted = self.groups.insert_new(group, || IdentityError::Conflict {
            what: "displayName".to_string(),
        })?;
        Ok((*inserted).clone())
    }

    pub fn get(&self, id: &str) -> Result<Group> {
        let group = self.groups.get(id).ok_or_else(|| IdentityError::NotFound {
            what: format!("group {id}"),
        })?;
        Ok(self.without_dangling(&group))
    }

    pub fn list(&self, filter: Option<&str>) -> Result<ListResponse<Group>> {
        let raw = self.groups.list(filter)?;
        let resources: Vec<Group> = raw.iter().map(|g| self.without_dangling(g)).collect();
        Ok(ListResponse {
            schemas: vec![GROUP_SCHEMA.to_string()],
            total_results: resources.len(),
            resources,
        })
    }

    #[instrument(skip(self, patch))]
    pub fn patch(&self, id: &str, patch: GroupPatch) -> Result<Group> {
        let existing = self.groups.get(id).ok_or_else(|| IdentityError::NotFound {
            what: format!("group {id}"),
        })?;
        let mut updated = (*existing).clone();
        updated.members.retain(|m| self.users.get(&m.value).is_some());

        match patch {
            GroupPatch::Replace { members } => {
                let mut replaced = Vec::new();
                for user_id in &members {
                    let member = self.member_for(user_id)?;
                    if !replaced.iter().any(|m: &GroupMember| m.value == member.value) {
                        replaced.push(member);
                    }
                }
                updated.members = replaced;
            }
            GroupPatch::AddMember { member } => {
                let member = self.member_for(&member)?;
                if !updated.members.iter().any(|m| m.value == member.value) {
                    updated.members.push(member);
                }
            }
            GroupPatch::RemoveMember { member } => {
                updated.members.retain(|m| m.value != member);
            }
        }

        updated.meta.last_modified = Utc::now();
        let replaced = self.groups.replace(updated);
        Ok((*replaced).clone())
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        self.groups
            .delete(id)
            .map(|_| ())
            .ok_or_else(|| IdentityError::NotFound {
                what: format!("group {id}"),
            })
    }
}
