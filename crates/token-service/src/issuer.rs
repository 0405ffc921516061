//! Token issuance and validation (spec §4.5).

use crate::claims::{Claims, GrantRequest, IssuedToken};
use crate::credentials::{verify_password, ClientRegistry};
use chrono::Utc;
use identity_core::config::{Config, JwtAlgorithm, SigningKeyMaterial};
use identity_core::error::{IdentityError, Result};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use record_store::UserStore;
use std::sync::Arc;
use tracing::instrument;

fn to_algorithm(alg: JwtAlgorithm) -> Algorithm {
    match alg {
        JwtAlgorithm::Hs256 => Algorithm::HS256,
        JwtAlgorithm::Rs256 => Algorithm::RS256,
    }
}

fn build_keys(key: &SigningKeyMaterial) -> Result<(EncodingKey, DecodingKey)> {
    match key {
        SigningKeyMaterial::Hmac { secret } => Ok((
            EncodingKey::from_secret(secret.as_bytes()),
            DecodingKey::from_secret(secret.as_bytes()),
        )),
        SigningKeyMaterial::Rsa { private_pem, public_pem } => {
            let encoding = EncodingKey::from_rsa_pem(private_pem.as_bytes()).map_err(|source| IdentityError::Config {
                reason: format!("invalid JWT_PRIVATE_KEY: {source}"),
            })?;
            let decoding = DecodingKey::from_rsa_pem(public_pem.as_bytes()).map_err(|source| IdentityError::Config {
                reason: format!("invalid JWT_PUBLIC_KEY: {source}"),
            })?;
            Ok((encoding, decoding))
        }
    }
}

/// Issues and validates bearer tokens against a fixed signing key,
/// the user store, and a pre-configured client-credential registry
/// (spec §4.5). The signing key is loaded once and held for the process
/// lifetime (spec §5 "Token signing key").
pub struct TokenIssuer {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_seconds: i64,
    users: Arc<UserStore>,
    clients: ClientRegistry,
}

impl TokenIssuer {
    pub fn new(config: &Config, users: Arc<UserStore>, clients: ClientRegistry) -> Result<Self> {
        let (encoding_key, decoding_key) = build_keys(&config.jwt_key)?;
        Ok(Self {
            algorithm: to_algorithm(config.jwt_alg),
            encoding_key,
            decoding_key,
            ttl_seconds: config.jwt_expire_minutes * 60,
            users,
            clients,
        })
    }

    #[instrument(skip(self, request))]
    pub fn issue(&self, request: GrantRequest) -> Result<IssuedToken> {
        let claims = match request {
            GrantRequest::Password { username, password } => self.claims_for_password(&username, &password)?,
            GrantRequest::ClientCredentials {
                client_id,
                client_secret,
                scope,
            } => self.claims_for_client(&client_id, &client_secret, scope)?,
        };

        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key).map_err(|source| {
            IdentityError::Config {
                reason: format!("failed to sign token: {source}"),
            }
        })?;

        Ok(IssuedToken {
            access_token: token,
            token_type: "Bearer",
            expires_in: self.ttl_seconds,
        })
    }

    fn claims_for_password(&self, username: &str, password: &str) -> Result<Claims> {
        let user = self
            .users
            .find_by_secondary(&username.to_lowercase())
            .ok_or(IdentityError::BadCredentials)?;

        // Open question in spec §9: an inactive user is treated as bad
        // credentials rather than a distinct error, so the response gives
        // no signal about account existence either way.
        if !user.active {
            return Err(IdentityError::BadCredentials);
        }
        let verifier = user.password.as_ref().ok_or(IdentityError::BadCredentials)?;
        if !verify_password(password, &verifier.hash) {
            return Err(IdentityError::BadCredentials);
        }

        let now = Utc::now().timestamp();
        Ok(Claims {
            sub: user.id.clone(),
            scope: "openid".to_string(),
            groups: user.groups.clone(),
            dept: user.department.clone(),
            risk_score: user.risk_score,
            iat: now,
            exp: now + self.ttl_seconds,
        })
    }

    fn claims_for_client(&self, client_id: &str, client_secret: &str, scope: Option<String>) -> Result<Claims> {
        let client = self.clients.get(client_id).ok_or(IdentityError::BadCredentials)?;
        if !verify_password(client_secret, &client.client_secret_hash) {
            return Err(IdentityError::BadCredentials);
        }

        let now = Utc::now().timestamp();
        Ok(Claims {
            sub: client_id.to_string(),
            scope: scope.unwrap_or_else(|| client.scope.clone()),
            groups: client.groups.clone(),
            dept: client.dept.clone(),
            risk_score: client.risk_score,
            iat: now,
            exp: now + self.ttl_seconds,
        })
    }

    /// Validates a compact token: signature, algorithm, and expiry (spec
    /// §4.5 "Validation").
    #[instrument(skip(self, token))]
    pub fn validate(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(self.algorithm);
        validation.algorithms = vec![self.algorithm];
        validation.validate_exp = true;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|source| match source.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => IdentityError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => IdentityError::TokenSignatureInvalid,
                jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => IdentityError::TokenAlgorithmMismatch,
                _ => IdentityError::TokenMalformed {
                    reason: source.to_string(),
                },
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{hash_password, ClientRecord};
    use identity_core::ids::new_user_id;
    use identity_core::model::{Email, Meta, PasswordVerifier, User, USER_SCHEMA};

    fn config() -> Config {
        Config {
            jwt_alg: JwtAlgorithm::Hs256,
            jwt_key: SigningKeyMaterial::Hmac {
                secret: "test-secret".to_string(),
            },
            jwt_expire_minutes: 60,
            policies_path: "policies.json".to_string(),
            db_path: "identity.db".to_string(),
            log_level: "INFO".to_string(),
            http_port: 8000,
        }
    }

    fn seeded_user(username: &str, password: &str, active: bool) -> User {
        User {
            schemas: vec![USER_SCHEMA.to_string()],
            id: new_user_id(),
            user_name: username.to_string(),
            given_name: None,
            family_name: None,
            formatted_name: None,
            active,
            emails: vec![Email {
                value: format!("{username}@example.com"),
                primary: Some(true),
                r#type: None,
            }],
            groups: vec!["ADMINS".to_string()],
            department: Some("IT".to_string()),
            risk_score: 10,
            password: Some(PasswordVerifier {
                hash: hash_password(password).unwrap(),
            }),
            meta: Meta {
                resource_type: "User".to_string(),
                created: Utc::now(),
                last_modified: Utc::now(),
                location: "/scim/v2/Users".to_string(),
            },
        }
    }

    #[test]
    fn token_round_trip_for_password_grant() {
        let users = Arc::new(UserStore::new());
        users.insert_new(seeded_user("mrios", "admin_pass", true), || unreachable!()).unwrap();
        let issuer = TokenIssuer::new(&config(), users, ClientRegistry::new()).unwrap();

        let issued = issuer
            .issue(GrantRequest::Password {
                username: "mrios".to_string(),
                password: "admin_pass".to_string(),
            })
            .unwrap();

        let claims = issuer.validate(&issued.access_token).unwrap();
        assert!(claims.groups.contains(&"ADMINS".to_string()));
    }

    #[test]
    fn wrong_password_is_bad_credentials() {
        let users = Arc::new(UserStore::new());
        users.insert_new(seeded_user("mrios", "admin_pass", true), || unreachable!()).unwrap();
        let issuer = TokenIssuer::new(&config(), users, ClientRegistry::new()).unwrap();

        let err = issuer
            .issue(GrantRequest::Password {
                username: "mrios".to_string(),
                password: "wrong".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, IdentityError::BadCredentials));
    }

    #[test]
    fn inactive_user_is_bad_credentials() {
        let users = Arc::new(UserStore::new());
        users.insert_new(seeded_user("disabled", "pw", false), || unreachable!()).unwrap();
        let issuer = TokenIssuer::new(&config(), users, ClientRegistry::new()).unwrap();

        let err = issuer
            .issue(GrantRequest::Password {
                username: "disabled".to_string(),
                password: "pw".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, IdentityError::BadCredentials));
    }

    #[test]
    fn expired_token_is_rejected() {
        let users = Arc::new(UserStore::new());
        let issuer = TokenIssuer::new(&config(), users, ClientRegistry::new()).unwrap();

        let now = Utc::now().timestamp();
        let expired_claims = Claims {
            sub: "usr_x".to_string(),
            scope: "openid".to_string(),
            groups: vec![],
            dept: None,
            risk_score: 0,
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(&Header::new(Algorithm::HS256), &expired_claims, &issuer.encoding_key).unwrap();

        let err = issuer.validate(&token).unwrap_err();
        assert!(matches!(err, IdentityError::TokenExpired));
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let issuer = TokenIssuer::new(&config(), Arc::new(UserStore::new()), ClientRegistry::new()).unwrap();

        let mut other_config = config();
        other_config.jwt_key = SigningKeyMaterial::Hmac {
            secret: "a-completely-different-secret".to_string(),
        };

        let mut clients = ClientRegistry::new();
        clients.register(
            "svc",
            ClientRecord {
                client_secret_hash: crate::credentials::hash_password("secret").unwrap(),
                scope: "read".to_string(),
                groups: vec![],
                dept: None,
                risk_score: 0,
            },
        );
        let client_issuer = TokenIssuer::new(&other_config, Arc::new(UserStore::new()), clients).unwrap();
        let token = client_issuer
            .issue(GrantRequest::ClientCredentials {
                client_id: "svc".to_string(),
                client_secret: "secret".to_string(),
                scope: None,
            })
            .unwrap()
            .access_token;

        // Signed with a different secret than `issuer` holds, so validation
        // against `issuer` must fail the signature check.
        let err = issuer.validate(&token).unwrap_err();
        assert!(matches!(err, IdentityError::TokenSignatureInvalid));
    }
}
