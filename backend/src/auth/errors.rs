//! Verification-stage error taxonomy
//!
//! Internal distinctions are for logging only. At the gate they all collapse
//! to a single observable outcome: unauthenticated.

use thiserror::Error;

/// Why a credential or token failed verification
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no account for the given email")]
    CredentialNotFound,

    #[error("password does not match")]
    InvalidCredential,

    #[error("token is not parseable: {0}")]
    MalformedToken(String),

    #[error("token signature does not verify")]
    BadSignature,

    #[error("token expired")]
    ExpiredToken,

    #[error("no session for the given token")]
    SessionNotFound,

    #[error("role does not permit access")]
    InsufficientRole,
}
