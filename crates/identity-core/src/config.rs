//! Environment-driven configuration (spec §6).
//!
//! The teacher's services read a handful of literals straight out of
//! `main` (`"0.0.0.0:8081"`); here there are enough knobs — JWT algorithm
//! and keys, TTL, file paths, log level, port — that they are collected
//! into one struct read once at startup. A missing or malformed variable
//! is a startup misconfiguration (spec §6 "Exit codes": non-zero on
//! missing key, invalid policies, unreadable DB path).

use crate::error::{IdentityError, Result};
use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JwtAlgorithm {
    Hs256,
    Rs256,
}

impl JwtAlgorithm {
    fn parse(raw: &str) -> Result<Self> {
        match raw {
            "HS256" => Ok(JwtAlgorithm::Hs256),
            "RS256" => Ok(JwtAlgorithm::Rs256),
            other => Err(IdentityError::Config {
                reason: format!("JWT_ALG must be HS256 or RS256, got {other:?}"),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub enum SigningKeyMaterial {
    Hmac { secret: String },
    Rsa { private_pem: String, public_pem: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_alg: JwtAlgorithm,
    pub jwt_key: SigningKeyMaterial,
    pub jwt_expire_minutes: i64,
    pub policies_path: String,
    pub db_path: String,
    pub log_level: String,
    pub http_port: u16,
}

fn require_var(name: &str) -> Result<String> {
    env::var(name).map_err(|_| IdentityError::Config {
        reason: format!("missing required environment variable {name}"),
    })
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let jwt_alg = JwtAlgorithm::parse(
            &env::var("JWT_ALG").unwrap_or_else(|_| "HS256".to_string()),
        )?;

        let jwt_key = match jwt_alg {
            JwtAlgorithm::Hs256 => SigningKeyMaterial::Hmac {
                secret: require_var("JWT_SECRET")?,
            },
            JwtAlgorithm::Rs256 => SigningKeyMaterial::Rsa {
                private_pem: require_var("JWT_PRIVATE_KEY")?,
                public_pem: require_var("JWT_PUBLIC_KEY")?,
            },
        };

        let jwt_expire_minutes = env::var("JWT_EXPIRE_MINUTES")
            .unwrap_or_else(|_| "60".to_string())
            .parse::<i64>()
            .map_err(|_| IdentityError::Config {
                reason: "JWT_EXPIRE_MINUTES must be a positive integer".to_string(),
            })?;
        if jwt_expire_minutes <= 0 {
            return Err(IdentityError::Config {
                reason: "JWT_EXPIRE_MINUTES must be a positive integer".to_string(),
            });
        }

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string());
        if !matches!(log_level.as_str(), "DEBUG" | "INFO" | "WARNING" | "ERROR") {
            return Err(IdentityError::Config {
                reason: format!("LOG_LEVEL must be one of DEBUG/INFO/WARNING/ERROR, got {log_level:?}"),
            });
        }

        let http_port = env::var("HTTP_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .map_err(|_| IdentityError::Config {
                reason: "HTTP_PORT must be a valid port number".to_string(),
            })?;

        Ok(Config {
            jwt_alg,
            jwt_key,
            jwt_expire_minutes,
            policies_path: env::var("POLICIES_PATH").unwrap_or_else(|_| "policies.json".to_string()),
            db_path: env::var("DB_PATH").unwrap_or_else(|_| "identity.db".to_string()),
            log_level,
            http_port,
        })
    }
}
