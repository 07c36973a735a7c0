//! Principal (authenticable account) state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{GroupId, PrincipalId};

use crate::rule::PermissionRule;

/// The (access, refresh) token tuple currently considered valid for a
/// principal. At most one live pair exists per principal; a fresh
/// login/refresh overwrites it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// An authenticable account.
///
/// Created on signup or admin invite; mutated by every flow in this crate.
/// `password_hash` is absent until activation for invited accounts. Group
/// references are ordered: attachment order is the tie-break used by
/// permission resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: PrincipalId,
    pub name: String,
    /// Globally unique.
    pub email: String,
    pub password_hash: Option<String>,
    pub active: bool,

    pub invited_at: Option<DateTime<Utc>>,
    pub activated_at: Option<DateTime<Utc>>,

    pub access_token: Option<String>,
    pub refresh_token: Option<String>,

    pub recovery_token: Option<String>,
    pub recovery_code: Option<String>,
    pub recovery_code_expiry: Option<DateTime<Utc>>,

    pub invite_token: Option<String>,

    /// Owned rules; take precedence over group rules on key conflicts.
    pub rules: Vec<PermissionRule>,
    /// Attached groups, in attachment order.
    pub groups: Vec<GroupId>,
}

impl Principal {
    /// An active account with a credential already hashed by the caller.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: PrincipalId::new(),
            name: name.into(),
            email: email.into(),
            password_hash: Some(password_hash.into()),
            active: true,
            invited_at: None,
            activated_at: None,
            access_token: None,
            refresh_token: None,
            recovery_token: None,
            recovery_code: None,
            recovery_code_expiry: None,
            invite_token: None,
            rules: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// A not-yet-activated account created by an admin invite: inactive, no
    /// credential, holding the invite token.
    pub fn invited(
        name: impl Into<String>,
        email: impl Into<String>,
        invite_token: impl Into<String>,
        invited_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: PrincipalId::new(),
            name: name.into(),
            email: email.into(),
            password_hash: None,
            active: false,
            invited_at: Some(invited_at),
            activated_at: None,
            access_token: None,
            refresh_token: None,
            recovery_token: None,
            recovery_code: None,
            recovery_code_expiry: None,
            invite_token: Some(invite_token.into()),
            rules: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Public view of the account. Never carries the password hash or any
    /// stored secret.
    pub fn profile(&self) -> PrincipalProfile {
        PrincipalProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            active: self.active,
            invited_at: self.invited_at,
            activated_at: self.activated_at,
        }
    }

    pub fn set_session(&mut self, pair: &SessionPair) {
        self.access_token = Some(pair.access_token.clone());
        self.refresh_token = Some(pair.refresh_token.clone());
    }

    pub fn clear_session(&mut self) {
        self.access_token = None;
        self.refresh_token = None;
    }

    pub fn clear_recovery_state(&mut self) {
        self.recovery_token = None;
        self.recovery_code = None;
        self.recovery_code_expiry = None;
    }
}

/// What `login` returns alongside the session tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalProfile {
    pub id: PrincipalId,
    pub name: String,
    pub email: String,
    pub active: bool,
    pub invited_at: Option<DateTime<Utc>>,
    pub activated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_never_exposes_stored_secrets() {
        let mut p = Principal::new("Ada", "ada@example.com", "$2b$04$hash");
        p.access_token = Some("access".into());
        p.recovery_code = Some("AB12".into());

        let json = serde_json::to_value(p.profile()).unwrap();
        let body = json.to_string();
        assert!(!body.contains("hash"));
        assert!(!body.contains("access"));
        assert!(!body.contains("AB12"));
    }

    #[test]
    fn invited_accounts_start_inactive_without_credential() {
        let p = Principal::invited("Ada", "ada@example.com", "tok", Utc::now());
        assert!(!p.active);
        assert!(p.password_hash.is_none());
        assert!(p.invite_token.is_some());
        assert!(p.invited_at.is_some());
        assert!(p.activated_at.is_none());
    }
}
