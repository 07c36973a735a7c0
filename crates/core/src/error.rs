//! Error taxonomy for the auth core.

use thiserror::Error;

/// Result type used across the auth core.
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-core error.
///
/// Keep this focused on deterministic, request-scoped failures. Every flow in
/// the core surfaces one of these; nothing here is fatal to the process.
///
/// `TokenInvalid` and `TokenExpired` are deliberately separate variants so
/// callers can offer differentiated messages ("malformed request" vs. "log in
/// again").
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Credentials rejected, stale/mismatched refresh token, expired invite
    /// window or recovery code.
    ///
    /// Login-email lookups collapse into this variant as well: an unknown
    /// email must be indistinguishable from a wrong password.
    #[error("unauthorized")]
    Unauthorized,

    /// No principal/group matches a lookup key.
    #[error("not found")]
    NotFound,

    /// Malformed input, double activation, missing invitation metadata.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Uniqueness violation at a store boundary (duplicate email/name).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A token failed signature or structural checks.
    #[error("token invalid")]
    TokenInvalid,

    /// A token verified correctly but its validity window has lapsed.
    #[error("token expired")]
    TokenExpired,

    /// Outbound mail dispatch failed where the flow treats it as fatal.
    #[error("mail dispatch failed: {0}")]
    Mail(String),

    /// Infrastructure fault (hashing, signing, storage).
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn mail(msg: impl Into<String>) -> Self {
        Self::Mail(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
