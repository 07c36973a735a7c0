//! In-memory principal/group stores.
//!
//! Intended for tests/dev. Not optimized for performance; lookups by
//! secondary keys (email, tokens, codes) are linear scans.

use std::collections::HashMap;
use std::sync::RwLock;

use stockroom_auth::{Group, GroupStore, Principal, PrincipalStore, SessionPair};
use stockroom_core::{AuthError, AuthResult, GroupId, PrincipalId};

#[derive(Debug, Default)]
pub struct InMemoryPrincipalStore {
    records: RwLock<HashMap<PrincipalId, Principal>>,
}

impl InMemoryPrincipalStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> AuthResult<std::sync::RwLockReadGuard<'_, HashMap<PrincipalId, Principal>>> {
        self.records
            .read()
            .map_err(|_| AuthError::internal("lock poisoned"))
    }

    fn write(
        &self,
    ) -> AuthResult<std::sync::RwLockWriteGuard<'_, HashMap<PrincipalId, Principal>>> {
        self.records
            .write()
            .map_err(|_| AuthError::internal("lock poisoned"))
    }

    fn find_where<F>(&self, pred: F) -> AuthResult<Option<Principal>>
    where
        F: Fn(&Principal) -> bool,
    {
        Ok(self.read()?.values().find(|p| pred(p)).cloned())
    }
}

impl PrincipalStore for InMemoryPrincipalStore {
    fn create(&self, principal: Principal) -> AuthResult<Principal> {
        let mut records = self.write()?;
        if records.values().any(|p| p.email == principal.email) {
            return Err(AuthError::conflict(format!(
                "email already registered: {}",
                principal.email
            )));
        }
        records.insert(principal.id, principal.clone());
        Ok(principal)
    }

    fn find_by_id(&self, id: PrincipalId) -> AuthResult<Option<Principal>> {
        Ok(self.read()?.get(&id).cloned())
    }

    fn find_by_email(&self, email: &str) -> AuthResult<Option<Principal>> {
        self.find_where(|p| p.email == email)
    }

    fn find_by_recovery_token(&self, token: &str) -> AuthResult<Option<Principal>> {
        self.find_where(|p| p.recovery_token.as_deref() == Some(token))
    }

    fn find_by_recovery_code(&self, code: &str) -> AuthResult<Option<Principal>> {
        self.find_where(|p| p.recovery_code.as_deref() == Some(code))
    }

    fn find_by_invite_token(&self, token: &str) -> AuthResult<Option<Principal>> {
        self.find_where(|p| p.invite_token.as_deref() == Some(token))
    }

    fn update(&self, principal: &Principal) -> AuthResult<()> {
        let mut records = self.write()?;
        match records.get_mut(&principal.id) {
            Some(existing) => {
                *existing = principal.clone();
                Ok(())
            }
            None => Err(AuthError::NotFound),
        }
    }

    fn swap_session(
        &self,
        id: PrincipalId,
        expected_refresh: &str,
        session: SessionPair,
    ) -> AuthResult<Principal> {
        // Compare and overwrite under one write lock: concurrent duplicate
        // refreshes cannot both observe the same stored value.
        let mut records = self.write()?;
        let principal = records.get_mut(&id).ok_or(AuthError::NotFound)?;

        if principal.refresh_token.as_deref() != Some(expected_refresh) {
            return Err(AuthError::Unauthorized);
        }

        principal.set_session(&session);
        Ok(principal.clone())
    }

    fn delete(&self, id: PrincipalId) -> AuthResult<()> {
        match self.write()?.remove(&id) {
            Some(_) => Ok(()),
            None => Err(AuthError::NotFound),
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryGroupStore {
    records: RwLock<HashMap<GroupId, Group>>,
}

impl InMemoryGroupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a group, enforcing name uniqueness.
    pub fn create(&self, group: Group) -> AuthResult<Group> {
        let mut records = self
            .records
            .write()
            .map_err(|_| AuthError::internal("lock poisoned"))?;
        if records.values().any(|g| g.name == group.name) {
            return Err(AuthError::conflict(format!(
                "group name already taken: {}",
                group.name
            )));
        }
        records.insert(group.id, group.clone());
        Ok(group)
    }
}

impl GroupStore for InMemoryGroupStore {
    fn find_by_id(&self, id: GroupId) -> AuthResult<Option<Group>> {
        Ok(self
            .records
            .read()
            .map_err(|_| AuthError::internal("lock poisoned"))?
            .get(&id)
            .cloned())
    }

    fn find_by_name(&self, name: &str) -> AuthResult<Option<Group>> {
        Ok(self
            .records
            .read()
            .map_err(|_| AuthError::internal("lock poisoned"))?
            .values()
            .find(|g| g.name == name)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_rejects_duplicate_email() {
        let store = InMemoryPrincipalStore::new();
        store
            .create(Principal::new("Ada", "ada@example.com", "h1"))
            .unwrap();

        let err = store
            .create(Principal::new("Other", "ada@example.com", "h2"))
            .unwrap_err();
        assert!(matches!(err, AuthError::Conflict(_)));
    }

    #[test]
    fn swap_session_requires_matching_stored_refresh() {
        let store = InMemoryPrincipalStore::new();
        let mut p = Principal::new("Ada", "ada@example.com", "h");
        p.refresh_token = Some("current".into());
        let p = store.create(p).unwrap();

        let pair = SessionPair {
            access_token: "a2".into(),
            refresh_token: "r2".into(),
        };

        assert_eq!(
            store
                .swap_session(p.id, "stale", pair.clone())
                .unwrap_err(),
            AuthError::Unauthorized
        );

        let updated = store.swap_session(p.id, "current", pair).unwrap();
        assert_eq!(updated.refresh_token.as_deref(), Some("r2"));
        assert_eq!(updated.access_token.as_deref(), Some("a2"));
    }

    #[test]
    fn swap_session_on_unknown_principal_is_not_found() {
        let store = InMemoryPrincipalStore::new();
        let err = store
            .swap_session(
                PrincipalId::new(),
                "anything",
                SessionPair {
                    access_token: "a".into(),
                    refresh_token: "r".into(),
                },
            )
            .unwrap_err();
        assert_eq!(err, AuthError::NotFound);
    }
}
