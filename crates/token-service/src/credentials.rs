//! Password hashing and the pre-configured client-credential map (spec
//! §4.5 "client → pre-configured map").

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use identity_core::error::{IdentityError, Result};
use std::collections::HashMap;

/// Hashes a plaintext password into an argon2 PHC string suitable for
/// [`identity_core::model::PasswordVerifier`].
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|source| IdentityError::Config {
            reason: format!("failed to hash password: {source}"),
        })
}

/// Verifies a plaintext password against a stored PHC hash. A malformed
/// hash is treated as a non-match rather than propagated — nothing should
/// ever authenticate against a corrupt verifier.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok()
}

#[derive(Debug, Clone)]
pub struct ClientRecord {
    pub client_secret_hash: String,
    pub scope: String,
    pub groups: Vec<String>,
    pub dept: Option<String>,
    pub risk_score: i64,
}

/// The pre-configured client → secret map referenced in spec §4.5. Held
/// in memory and populated at startup; this system has no client
/// self-registration endpoint.
#[derive(Debug, Clone, Default)]
pub struct ClientRegistry {
    clients: HashMap<String, ClientRecord>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, client_id: impl Into<String>, record: ClientRecord) {
        self.clients.insert(client_id.into(), record);
    }

    pub fn get(&self, client_id: &str) -> Option<&ClientRecord> {
        self.clients.get(client_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_correct_password() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &hash));
        assert!(!verify_password("wrong password", &hash));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
