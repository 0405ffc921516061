//! Prefixed identifiers for the data model in spec §3.
//!
//! Users get `usr_<slug>`, groups get `grp_<slug>`. The slug is a random
//! UUID v4 with the hyphens stripped, which keeps ids URL-safe and short
//! enough to read in logs.

use std::fmt;
use uuid::Uuid;

fn slug() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Generate a new user id of the form `usr_<slug>`.
pub fn new_user_id() -> String {
    format!("usr_{}", slug())
}

/// Generate a new group id of the form `grp_<slug>`.
pub fn new_group_id() -> String {
    format!("grp_{}", slug())
}

/// A correlation id propagated through audit records and logs (spec §4.7).
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CorrelationId(pub String);

impl CorrelationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
