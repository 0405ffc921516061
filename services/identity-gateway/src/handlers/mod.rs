pub mod auth;
pub mod authz;
pub mod scim_groups;
pub mod scim_users;
