//! Collaborator contracts.
//!
//! The auth core makes no storage or transport assumptions: persistence,
//! password hashing and mail dispatch are consumed through these traits.
//! In-memory implementations live in `stockroom-infra`; production adapters
//! (SQL, SMTP) are out of scope for this core.

use serde_json::Value as JsonValue;
use std::sync::Arc;

use stockroom_core::{AuthResult, GroupId, PrincipalId};

use crate::group::Group;
use crate::principal::{Principal, SessionPair};

/// Principal persistence.
///
/// ## Lookup semantics
///
/// `find_*` return `Ok(None)` for a missing record; `Err` is reserved for
/// infrastructure faults. The token/code lookups are by **exact stored
/// value** — this is what makes recovery links and invite tokens single-use
/// once the stored value is cleared or replaced.
///
/// ## `swap_session`
///
/// Refresh rotation must be safe under concurrent duplicate calls, so the
/// compare on the stored refresh token and the write of the new pair happen
/// in one store operation (compare-and-swap), not as separate read/verify/
/// write steps. Implementations must:
/// - fail `NotFound` when no principal has `id`
/// - fail `Unauthorized` unless the stored refresh token byte-equals
///   `expected_refresh`
/// - otherwise persist `session` and return the updated principal
pub trait PrincipalStore: Send + Sync {
    fn create(&self, principal: Principal) -> AuthResult<Principal>;
    fn find_by_id(&self, id: PrincipalId) -> AuthResult<Option<Principal>>;
    fn find_by_email(&self, email: &str) -> AuthResult<Option<Principal>>;
    fn find_by_recovery_token(&self, token: &str) -> AuthResult<Option<Principal>>;
    fn find_by_recovery_code(&self, code: &str) -> AuthResult<Option<Principal>>;
    fn find_by_invite_token(&self, token: &str) -> AuthResult<Option<Principal>>;

    /// Persist the full record. Fails `NotFound` for an unknown id.
    fn update(&self, principal: &Principal) -> AuthResult<()>;

    /// Atomic conditional session overwrite (see trait docs).
    fn swap_session(
        &self,
        id: PrincipalId,
        expected_refresh: &str,
        session: SessionPair,
    ) -> AuthResult<Principal>;

    /// Remove the record. Used as the compensating action when an invitation
    /// email fails to dispatch.
    fn delete(&self, id: PrincipalId) -> AuthResult<()>;
}

/// Group persistence (read side only; group administration is a collaborator
/// concern).
pub trait GroupStore: Send + Sync {
    fn find_by_id(&self, id: GroupId) -> AuthResult<Option<Group>>;
    fn find_by_name(&self, name: &str) -> AuthResult<Option<Group>>;
}

/// Password hashing with a configurable cost factor.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> AuthResult<String>;
    fn verify(&self, plaintext: &str, hash: &str) -> AuthResult<bool>;
}

/// Templated outbound mail.
#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MailTemplate {
    PasswordRecovery,
    Invitation,
}

/// Recipient + template + payload, handed to the mail collaborator.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OutboundMail {
    pub to: String,
    pub template: MailTemplate,
    pub data: JsonValue,
}

/// Fire-and-forget mail dispatch. Whether a failure aborts the surrounding
/// flow is decided by the caller (invitation aborts, recovery logs).
pub trait MailSender: Send + Sync {
    fn send(&self, mail: OutboundMail) -> AuthResult<()>;
}

impl<S> PrincipalStore for Arc<S>
where
    S: PrincipalStore + ?Sized,
{
    fn create(&self, principal: Principal) -> AuthResult<Principal> {
        (**self).create(principal)
    }

    fn find_by_id(&self, id: PrincipalId) -> AuthResult<Option<Principal>> {
        (**self).find_by_id(id)
    }

    fn find_by_email(&self, email: &str) -> AuthResult<Option<Principal>> {
        (**self).find_by_email(email)
    }

    fn find_by_recovery_token(&self, token: &str) -> AuthResult<Option<Principal>> {
        (**self).find_by_recovery_token(token)
    }

    fn find_by_recovery_code(&self, code: &str) -> AuthResult<Option<Principal>> {
        (**self).find_by_recovery_code(code)
    }

    fn find_by_invite_token(&self, token: &str) -> AuthResult<Option<Principal>> {
        (**self).find_by_invite_token(token)
    }

    fn update(&self, principal: &Principal) -> AuthResult<()> {
        (**self).update(principal)
    }

    fn swap_session(
        &self,
        id: PrincipalId,
        expected_refresh: &str,
        session: SessionPair,
    ) -> AuthResult<Principal> {
        (**self).swap_session(id, expected_refresh, session)
    }

    fn delete(&self, id: PrincipalId) -> AuthResult<()> {
        (**self).delete(id)
    }
}

impl<S> GroupStore for Arc<S>
where
    S: GroupStore + ?Sized,
{
    fn find_by_id(&self, id: GroupId) -> AuthResult<Option<Group>> {
        (**self).find_by_id(id)
    }

    fn find_by_name(&self, name: &str) -> AuthResult<Option<Group>> {
        (**self).find_by_name(name)
    }
}

impl<H> PasswordHasher for Arc<H>
where
    H: PasswordHasher + ?Sized,
{
    fn hash(&self, plaintext: &str) -> AuthResult<String> {
        (**self).hash(plaintext)
    }

    fn verify(&self, plaintext: &str, hash: &str) -> AuthResult<bool> {
        (**self).verify(plaintext, hash)
    }
}

impl<M> MailSender for Arc<M>
where
    M: MailSender + ?Sized,
{
    fn send(&self, mail: OutboundMail) -> AuthResult<()> {
        (**self).send(mail)
    }
}
