//! Signed, TTL-bound tokens.
//!
//! Four independent token kinds, each with its own signing secret and TTL.
//! Kind selection is enum dispatch over [`TokenKind`]; the kind is also
//! embedded in the claims, so a token presented against the wrong kind fails
//! verification even before the signature mismatch is considered.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use stockroom_core::{AuthError, AuthResult, Clock, SystemClock};

use crate::config::TokenConfig;

/// The four token kinds issued by this core.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
    PasswordRecovery,
    Invite,
}

impl core::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TokenKind::Access => write!(f, "access"),
            TokenKind::Refresh => write!(f, "refresh"),
            TokenKind::PasswordRecovery => write!(f, "password_recovery"),
            TokenKind::Invite => write!(f, "invite"),
        }
    }
}

/// Claim set carried by every token.
///
/// `sub` is the principal id for `access`/`refresh`/`password_recovery`
/// tokens and the invited email for `invite` tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub kind: TokenKind,
}

/// Issues and verifies the four token kinds.
pub struct TokenService {
    config: TokenConfig,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(config: TokenConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: TokenConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    /// Sign a token of `kind` for `subject` with the kind's secret and TTL.
    pub fn issue(&self, kind: TokenKind, subject: &str) -> AuthResult<String> {
        let cfg = self.config.for_kind(kind);
        let now = self.clock.now().timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now,
            exp: now + cfg.ttl_secs as i64,
            kind,
        };

        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(cfg.secret.as_bytes()),
        )
        .map_err(|e| AuthError::internal(format!("token signing failed: {e}")))
    }

    /// Verify a token against `kind`'s secret.
    ///
    /// Fails `TokenExpired` only for a structurally valid, correctly signed
    /// token whose TTL has lapsed; every other failure (malformed input, bad
    /// signature, kind mismatch) is `TokenInvalid`.
    pub fn verify(&self, kind: TokenKind, token: &str) -> AuthResult<Claims> {
        let cfg = self.config.for_kind(kind);

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = jsonwebtoken::decode::<Claims>(
            token,
            &DecodingKey::from_secret(cfg.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::TokenInvalid,
        })?;

        if data.claims.kind != kind {
            return Err(AuthError::TokenInvalid);
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TokenConfig;

    fn service() -> TokenService {
        TokenService::new(TokenConfig::with_secrets(
            "access-secret",
            "refresh-secret",
            "recovery-secret",
            "invite-secret",
        ))
    }

    #[test]
    fn round_trips_every_kind() {
        let svc = service();
        for kind in [
            TokenKind::Access,
            TokenKind::Refresh,
            TokenKind::PasswordRecovery,
        ] {
            let token = svc.issue(kind, "subject-id").unwrap();
            let claims = svc.verify(kind, &token).unwrap();
            assert_eq!(claims.sub, "subject-id");
            assert_eq!(claims.kind, kind);
            assert!(claims.exp > claims.iat);
        }

        let token = svc.issue(TokenKind::Invite, "a@x.com").unwrap();
        assert_eq!(svc.verify(TokenKind::Invite, &token).unwrap().sub, "a@x.com");
    }

    #[test]
    fn one_kinds_token_never_verifies_as_another() {
        let svc = service();
        let token = svc.issue(TokenKind::Refresh, "subject-id").unwrap();

        assert_eq!(
            svc.verify(TokenKind::Access, &token).unwrap_err(),
            AuthError::TokenInvalid
        );
    }

    #[test]
    fn kind_claim_is_checked_even_under_a_shared_secret() {
        // Same secret for two kinds: the signature verifies, the kind tag
        // still rejects the token.
        let config = TokenConfig::with_secrets("same", "same", "c", "d");
        let svc = TokenService::new(config);

        let token = svc.issue(TokenKind::Refresh, "subject-id").unwrap();
        assert_eq!(
            svc.verify(TokenKind::Access, &token).unwrap_err(),
            AuthError::TokenInvalid
        );
    }

    #[test]
    fn garbage_is_invalid_not_expired() {
        let svc = service();
        assert_eq!(
            svc.verify(TokenKind::Access, "not-a-token").unwrap_err(),
            AuthError::TokenInvalid
        );
    }

    #[test]
    fn lapsed_ttl_is_reported_as_expired() {
        let svc = service();

        // Mint a correctly signed access token whose window already closed.
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: "subject-id".to_string(),
            iat: now - 3600,
            exp: now - 60,
            kind: TokenKind::Access,
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret("access-secret".as_bytes()),
        )
        .unwrap();

        assert_eq!(
            svc.verify(TokenKind::Access, &token).unwrap_err(),
            AuthError::TokenExpired
        );
    }
}
