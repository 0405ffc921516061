//! Error taxonomy for the identity service.
//!
//! Every leaf component (record store, policy loader, token service, SCIM
//! service) fails with a precise variant here; the HTTP gateway performs the
//! single boundary translation into a status code (see spec §7).

use thiserror::Error;

pub type Result<T> = std::result::Result<T, IdentityError>;

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("bad request: {reason}")]
    BadRequest { reason: String },

    #[error("unsupported filter expression: {filter}")]
    BadFilter { filter: String },

    #[error("not found: {what}")]
    NotFound { what: String },

    #[error("conflict: {what}")]
    Conflict { what: String },

    #[error("forbidden: {reason}")]
    Forbidden { reason: String },

    #[error("bad credentials")]
    BadCredentials,

    #[error("token is malformed: {reason}")]
    TokenMalformed { reason: String },

    #[error("token has expired")]
    TokenExpired,

    #[error("token signature is invalid")]
    TokenSignatureInvalid,

    #[error("token algorithm does not match the configured algorithm")]
    TokenAlgorithmMismatch,

    #[error("policy parse error: {reason}")]
    PolicyParseError { reason: String },

    #[error("policy semantic error: {reason}")]
    PolicySemanticError { reason: String },

    #[error("policy io error: {reason}")]
    PolicyIOError { reason: String },

    #[error("policy evaluation error: {reason}")]
    EvaluationError { reason: String },

    #[error("rate limited")]
    RateLimited,

    #[error("service unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("invalid configuration: {reason}")]
    Config { reason: String },

    #[error("serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

impl IdentityError {
    /// The spec §7 external mapping, as an HTTP-ish status code. Kept here
    /// (rather than in the gateway) so every adapter — HTTP, CLI, tests —
    /// agrees on the same taxonomy.
    pub fn status_code(&self) -> u16 {
        match self {
            IdentityError::BadRequest { .. } | IdentityError::BadFilter { .. } => 400,
            IdentityError::BadCredentials
            | IdentityError::TokenMalformed { .. }
            | IdentityError::TokenExpired
            | IdentityError::TokenSignatureInvalid
            | IdentityError::TokenAlgorithmMismatch => 401,
            IdentityError::Forbidden { .. } => 403,
            IdentityError::NotFound { .. } => 404,
            IdentityError::Conflict { .. } => 409,
            IdentityError::RateLimited => 429,
            IdentityError::PolicyParseError { .. }
            | IdentityError::PolicySemanticError { .. }
            | IdentityError::PolicyIOError { .. }
            | IdentityError::EvaluationError { .. }
            | IdentityError::Serialization { .. }
            | IdentityError::Config { .. } => 500,
            IdentityError::Unavailable { .. } => 503,
        }
    }
}
