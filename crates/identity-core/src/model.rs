//! The User/Group data model from spec §3.

use crate::error::{IdentityError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const USER_SCHEMA: &str = "urn:ietf:params:scim:schemas:core:2.0:User";
pub const GROUP_SCHEMA: &str = "urn:ietf:params:scim:schemas:core:2.0:Group";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Email {
    pub value: String,
    #[serde(default)]
    pub primary: Option<bool>,
    #[serde(default)]
    pub r#type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PasswordVerifier {
    /// Argon2 PHC string: algorithm, params and salt are embedded, per the
    /// `argon2` crate's `PasswordHash` format — there is no separate salt
    /// field to carry.
    pub hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub resource_type: String,
    pub created: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    pub location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub schemas: Vec<String>,
    pub id: String,
    pub user_name: String,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub formatted_name: Option<String>,
    pub active: bool,
    pub emails: Vec<Email>,
    /// Group ids this user belongs to, kept in sync by the SCIM service.
    pub groups: Vec<String>,
    pub department: Option<String>,
    pub risk_score: i64,
    pub password: Option<PasswordVerifier>,
    pub meta: Meta,
}

impl User {
    /// Enforces the `riskScore ∈ [0,100]` invariant from spec §3.
    pub fn set_risk_score(&mut self, risk_score: i64) -> Result<()> {
        if !(0..=100).contains(&risk_score) {
            return Err(IdentityError::BadRequest {
                reason: format!("riskScore must be within 0..=100, got {risk_score}"),
            });
        }
        self.risk_score = risk_score;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GroupMember {
    pub value: String,
    pub display: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub schemas: Vec<String>,
    pub id: String,
    pub display_name: String,
    pub members: Vec<GroupMember>,
    pub meta: Meta,
}
