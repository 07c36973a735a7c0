//! Session lifecycle: login, refresh, logout/revoke.

use std::sync::Arc;

use stockroom_core::{AuthError, AuthResult, PrincipalId};

use crate::principal::{PrincipalProfile, SessionPair};
use crate::store::{PasswordHasher, PrincipalStore};
use crate::token::{TokenKind, TokenService};

/// What a successful login returns. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct LoginOutcome {
    pub profile: PrincipalProfile,
    pub access_token: String,
    pub refresh_token: String,
}

/// Owns the session-token pair stored on the principal.
///
/// Clearing the stored pair (logout/revoke) only blocks future refreshes; an
/// access token still within its TTL keeps working until it lapses. That is a
/// deliberate scope limitation of this core, not a bug.
pub struct AuthSessionManager {
    principals: Arc<dyn PrincipalStore>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<TokenService>,
    single_session_refresh: bool,
}

impl AuthSessionManager {
    pub fn new(
        principals: Arc<dyn PrincipalStore>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<TokenService>,
        single_session_refresh: bool,
    ) -> Self {
        Self {
            principals,
            hasher,
            tokens,
            single_session_refresh,
        }
    }

    /// Authenticate by email and password.
    ///
    /// Unknown email and wrong password both surface as `Unauthorized` —
    /// never `NotFound` — so the response shape leaks nothing to credential
    /// stuffing.
    ///
    /// The access token is always re-issued. The stored refresh token is
    /// reused when it still verifies, which preserves long-lived sessions
    /// across repeated logins; a missing, expired or malformed one is
    /// replaced.
    pub fn login(&self, email: &str, password: &str) -> AuthResult<LoginOutcome> {
        let mut principal = self
            .principals
            .find_by_email(email)?
            .ok_or(AuthError::Unauthorized)?;

        let hash = principal
            .password_hash
            .clone()
            .ok_or(AuthError::Unauthorized)?;
        if !self.hasher.verify(password, &hash)? {
            return Err(AuthError::Unauthorized);
        }

        let subject = principal.id.to_string();
        let access_token = self.tokens.issue(TokenKind::Access, &subject)?;

        let refresh_token = match &principal.refresh_token {
            Some(existing) => match self.tokens.verify(TokenKind::Refresh, existing) {
                Ok(_) => existing.clone(),
                Err(AuthError::TokenExpired) | Err(AuthError::TokenInvalid) => {
                    self.tokens.issue(TokenKind::Refresh, &subject)?
                }
                Err(e) => return Err(e),
            },
            None => self.tokens.issue(TokenKind::Refresh, &subject)?,
        };

        let pair = SessionPair {
            access_token,
            refresh_token,
        };
        principal.set_session(&pair);
        self.principals.update(&principal)?;

        Ok(LoginOutcome {
            profile: principal.profile(),
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        })
    }

    /// Exchange a refresh token for a new session pair.
    ///
    /// The presented token must verify as the `refresh` kind **and**
    /// byte-equal the principal's currently stored refresh token. The
    /// equality check is the sole revocation mechanism: once the stored value
    /// is cleared or replaced, every previously issued refresh token is
    /// permanently unusable regardless of its remaining TTL.
    ///
    /// Compare and overwrite happen in a single store operation
    /// (`swap_session`), so concurrent duplicate calls cannot both succeed.
    pub fn refresh(&self, refresh_token: &str) -> AuthResult<SessionPair> {
        let claims = self.tokens.verify(TokenKind::Refresh, refresh_token)?;
        let principal_id: PrincipalId =
            claims.sub.parse().map_err(|_| AuthError::TokenInvalid)?;

        let access_token = self.tokens.issue(TokenKind::Access, &claims.sub)?;
        let next_refresh = if self.single_session_refresh {
            self.tokens.issue(TokenKind::Refresh, &claims.sub)?
        } else {
            refresh_token.to_string()
        };

        let pair = SessionPair {
            access_token,
            refresh_token: next_refresh,
        };
        self.principals
            .swap_session(principal_id, refresh_token, pair.clone())?;

        Ok(pair)
    }

    /// End the session identified by a (still valid) access token.
    pub fn logout(&self, access_token: &str) -> AuthResult<()> {
        let claims = self.tokens.verify(TokenKind::Access, access_token)?;
        let principal_id: PrincipalId =
            claims.sub.parse().map_err(|_| AuthError::TokenInvalid)?;
        self.clear_session(principal_id)
    }

    /// Administrative revocation by principal id.
    pub fn revoke(&self, principal_id: PrincipalId) -> AuthResult<()> {
        self.clear_session(principal_id)
    }

    fn clear_session(&self, principal_id: PrincipalId) -> AuthResult<()> {
        let mut principal = self
            .principals
            .find_by_id(principal_id)?
            .ok_or(AuthError::NotFound)?;
        principal.clear_session();
        self.principals.update(&principal)
    }
}
