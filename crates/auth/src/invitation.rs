//! Invitation and account activation.
//!
//! An invite creates an inactive, credential-less principal and emails an
//! activation link. Activation is hard time-boxed: the invite token's own TTL
//! is generous, but the real expiry is the wall-clock window measured from
//! `invited_at` — exclusive at the boundary, so activation exactly at the
//! window edge is rejected.

use chrono::Duration;
use serde_json::json;
use std::sync::Arc;

use stockroom_core::{AuthError, AuthResult, Clock, PrincipalId};

use crate::principal::{Principal, PrincipalProfile};
use crate::store::{GroupStore, MailSender, MailTemplate, OutboundMail, PasswordHasher, PrincipalStore};
use crate::token::{TokenKind, TokenService};

pub struct InvitationManager {
    principals: Arc<dyn PrincipalStore>,
    groups: Arc<dyn GroupStore>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<TokenService>,
    mailer: Arc<dyn MailSender>,
    clock: Arc<dyn Clock>,
    activation_window: Duration,
    invite_link_base: String,
    default_group: String,
}

impl InvitationManager {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        principals: Arc<dyn PrincipalStore>,
        groups: Arc<dyn GroupStore>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<TokenService>,
        mailer: Arc<dyn MailSender>,
        clock: Arc<dyn Clock>,
        activation_window_secs: u64,
        invite_link_base: impl Into<String>,
        default_group: impl Into<String>,
    ) -> Self {
        Self {
            principals,
            groups,
            hasher,
            tokens,
            mailer,
            clock,
            activation_window: Duration::seconds(activation_window_secs as i64),
            invite_link_base: invite_link_base.into(),
            default_group: default_group.into(),
        }
    }

    /// Invite `email`. All-or-nothing: if the invitation email cannot be
    /// dispatched, the freshly created principal is deleted again and the
    /// mail error is surfaced.
    pub fn invite(&self, name: &str, email: &str) -> AuthResult<PrincipalProfile> {
        if self.principals.find_by_email(email)?.is_some() {
            return Err(AuthError::bad_request("email already registered"));
        }

        let token = self.tokens.issue(TokenKind::Invite, email)?;
        let principal =
            Principal::invited(name, email, token.clone(), self.clock.now());
        let created = self.principals.create(principal)?;

        if let Err(e) = self.mailer.send(self.invitation_mail(&created, &token)) {
            if let Err(del) = self.principals.delete(created.id) {
                tracing::warn!(principal = %created.id, error = %del, "invite rollback delete failed");
            }
            return Err(e);
        }

        Ok(created.profile())
    }

    /// Redeem an invite token and set the first credential.
    ///
    /// The lookup is anchored on the token's verified email claim so that a
    /// replay after a successful activation (which clears the stored token)
    /// still reports `BadRequest("already activated")` rather than a generic
    /// miss. A token that verifies but is no longer the stored one (e.g.
    /// superseded by a reinvite) is `NotFound`.
    pub fn activate(&self, token: &str, new_password: &str) -> AuthResult<PrincipalProfile> {
        let claims = self
            .tokens
            .verify(TokenKind::Invite, token)
            .map_err(|_| AuthError::Unauthorized)?;

        let mut principal = self
            .principals
            .find_by_email(&claims.sub)?
            .ok_or(AuthError::NotFound)?;

        if principal.active && principal.activated_at.is_some() {
            return Err(AuthError::bad_request("already activated"));
        }
        if principal.invite_token.as_deref() != Some(token) {
            return Err(AuthError::NotFound);
        }
        let invited_at = principal
            .invited_at
            .ok_or_else(|| AuthError::bad_request("missing invitation timestamp"))?;

        let now = self.clock.now();
        if now - invited_at >= self.activation_window {
            return Err(AuthError::Unauthorized);
        }

        principal.password_hash = Some(self.hasher.hash(new_password)?);
        principal.active = true;
        principal.activated_at = Some(now);
        principal.invite_token = None;
        principal.invited_at = None;

        if let Some(group) = self.groups.find_by_name(&self.default_group)? {
            principal.rules = group.rules().to_vec();
        }

        self.principals.update(&principal)?;
        Ok(principal.profile())
    }

    /// Restart the activation window for a not-yet-activated principal:
    /// fresh token, fresh `invited_at`, resent email. A mail failure here is
    /// logged, not surfaced — the new token is already persisted.
    pub fn reinvite(&self, principal_id: PrincipalId) -> AuthResult<()> {
        let mut principal = self
            .principals
            .find_by_id(principal_id)?
            .ok_or(AuthError::NotFound)?;

        if principal.active && principal.activated_at.is_some() {
            return Err(AuthError::bad_request("already activated"));
        }

        let token = self.tokens.issue(TokenKind::Invite, &principal.email)?;
        principal.invite_token = Some(token.clone());
        principal.invited_at = Some(self.clock.now());
        self.principals.update(&principal)?;

        if let Err(e) = self.mailer.send(self.invitation_mail(&principal, &token)) {
            tracing::warn!(principal = %principal.id, error = %e, "reinvite email dispatch failed");
        }

        Ok(())
    }

    fn invitation_mail(&self, principal: &Principal, token: &str) -> OutboundMail {
        OutboundMail {
            to: principal.email.clone(),
            template: MailTemplate::Invitation,
            data: json!({
                "name": principal.name,
                "link": format!("{}/{}", self.invite_link_base, token),
            }),
        }
    }
}
