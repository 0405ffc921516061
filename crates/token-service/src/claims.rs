//! Token claims and request/response shapes (spec §4.5, §6).

use serde::{Deserialize, Serialize};

/// Decoded bearer token payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub sub: String,
    pub scope: String,
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub dept: Option<String>,
    #[serde(rename = "riskScore")]
    pub risk_score: i64,
    pub iat: i64,
    pub exp: i64,
}

/// The two credential shapes `POST /auth/token` accepts, discriminated by
/// `grant_type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "grant_type", rename_all = "snake_case")]
pub enum GrantRequest {
    Password { username: String, password: String },
    ClientCredentials {
        client_id: String,
        client_secret: String,
        #[serde(default)]
        scope: Option<String>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}
