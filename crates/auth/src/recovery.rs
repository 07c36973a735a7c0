//! Password recovery.
//!
//! Two independent, mutually exclusive entry points, both culminating in a
//! password hash update: a signed link token sent by email, and a short
//! human-enterable code. Both are single-use — a successful redemption clears
//! the stored recovery state, so neither secret can be replayed before its
//! natural expiry.

use serde_json::json;
use std::sync::Arc;

use stockroom_core::{AuthError, AuthResult, Clock};

use crate::recovery_code::RecoverySecretManager;
use crate::store::{MailSender, MailTemplate, OutboundMail, PasswordHasher, PrincipalStore};
use crate::token::{TokenKind, TokenService};

pub struct RecoveryFlowManager {
    principals: Arc<dyn PrincipalStore>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<TokenService>,
    mailer: Arc<dyn MailSender>,
    secrets: RecoverySecretManager,
    clock: Arc<dyn Clock>,
    recovery_link_base: String,
}

impl RecoveryFlowManager {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        principals: Arc<dyn PrincipalStore>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<TokenService>,
        mailer: Arc<dyn MailSender>,
        secrets: RecoverySecretManager,
        clock: Arc<dyn Clock>,
        recovery_link_base: impl Into<String>,
    ) -> Self {
        Self {
            principals,
            hasher,
            tokens,
            mailer,
            secrets,
            clock,
            recovery_link_base: recovery_link_base.into(),
        }
    }

    /// Start a recovery: persist a fresh link token, code and expiry on the
    /// principal and email the link.
    ///
    /// Mail dispatch failures are logged, not surfaced — the secrets are
    /// already persisted, so the caller can retry or use the code path.
    pub fn request_recovery(&self, email: &str) -> AuthResult<()> {
        let mut principal = self
            .principals
            .find_by_email(email)?
            .ok_or(AuthError::NotFound)?;

        let code = self.secrets.generate_code()?;
        let token = self
            .tokens
            .issue(TokenKind::PasswordRecovery, &principal.id.to_string())?;

        principal.recovery_token = Some(token.clone());
        principal.recovery_code = Some(code.code.clone());
        principal.recovery_code_expiry = Some(code.expires_at);
        self.principals.update(&principal)?;

        let mail = OutboundMail {
            to: principal.email.clone(),
            template: MailTemplate::PasswordRecovery,
            data: json!({
                "name": principal.name,
                "link": format!("{}/{}", self.recovery_link_base, token),
                "code": code.code,
            }),
        };
        if let Err(e) = self.mailer.send(mail) {
            tracing::warn!(email = %principal.email, error = %e, "recovery email dispatch failed");
        }

        Ok(())
    }

    /// Link-token path.
    ///
    /// The principal must still hold this exact token value — not just be the
    /// subject the token names — which is what makes the link single-use.
    /// Intentionally succeeds for inactive principals.
    pub fn redeem_by_token(&self, token: &str, new_password: &str) -> AuthResult<()> {
        self.tokens.verify(TokenKind::PasswordRecovery, token)?;

        let mut principal = self
            .principals
            .find_by_recovery_token(token)?
            .ok_or(AuthError::NotFound)?;

        principal.password_hash = Some(self.hasher.hash(new_password)?);
        principal.clear_recovery_state();
        self.principals.update(&principal)
    }

    /// Short-code path. Fails `Unauthorized` once the stored expiry has
    /// passed.
    pub fn redeem_by_code(&self, code: &str, new_password: &str) -> AuthResult<()> {
        let mut principal = self
            .principals
            .find_by_recovery_code(code)?
            .ok_or(AuthError::NotFound)?;

        let expiry = principal
            .recovery_code_expiry
            .ok_or(AuthError::Unauthorized)?;
        if self.clock.now() > expiry {
            return Err(AuthError::Unauthorized);
        }

        principal.password_hash = Some(self.hasher.hash(new_password)?);
        principal.clear_recovery_state();
        self.principals.update(&principal)
    }
}
