//! # Token Service
//!
//! Bearer token issuance and validation (spec §4.5): password and
//! client-credentials grants, HS256/RS256 signing, argon2 password
//! verification.

pub mod claims;
pub mod credentials;
pub mod issuer;

pub use claims::{Claims, GrantRequest, IssuedToken};
pub use credentials::{hash_password, verify_password, ClientRecord, ClientRegistry};
pub use issuer::TokenIssuer;
