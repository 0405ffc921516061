//! # Identity Core
//!
//! Shared types, error taxonomy and configuration for the identity and
//! access microservice: token issuance, SCIM provisioning, and the ABAC
//! policy decision point all build on this crate.

pub mod config;
pub mod error;
pub mod ids;
pub mod model;

pub use config::{Config, JwtAlgorithm, SigningKeyMaterial};
pub use error::{IdentityError, Result};
pub use model::{Email, Group, GroupMember, Meta, PasswordVerifier, User};

/// Current version, exposed for health checks and telemetry.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const BUILD_INFO: &str = concat!(
    "identity-service ",
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("CARGO_PKG_NAME"),
    ")"
);

/// HTTP paths from spec §6, kept in one place so the gateway's router and
/// its tests never disagree on a literal.
pub mod endpoints {
    pub const AUTH_TOKEN: &str = "/auth/token";
    pub const AUTH_ME: &str = "/auth/me";
    pub const AUTH_HEALTH: &str = "/auth/health";
    pub const SCIM_USERS: &str = "/scim/v2/Users";
    pub const SCIM_USER_BY_ID: &str = "/scim/v2/Users/{id}";
    pub const SCIM_GROUPS: &str = "/scim/v2/Groups";
    pub const SCIM_GROUP_BY_ID: &str = "/scim/v2/Groups/{id}";
    pub const SCIM_GROUP_MEMBERS: &str = "/scim/v2/Groups/{id}/members";
    pub const SCIM_GROUP_MEMBER_BY_ID: &str = "/scim/v2/Groups/{id}/members/{userId}";
    pub const AUTHZ_EVALUATE: &str = "/authz/evaluate";
    pub const AUTHZ_POLICIES_RELOAD: &str = "/authz/policies/reload";
    pub const AUTHZ_HEALTH: &str = "/authz/health";
}
