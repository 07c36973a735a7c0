//! Permission rules.

use serde::{Deserialize, Serialize};

/// The action requested against a (route, domain) pair.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Read,
    Create,
    Replace,
    Update,
    Delete,
}

/// A capability grant scoped to one (route, domain) pair.
///
/// Each rule carries five independent action flags plus its own `active`
/// flag; an inactive rule never grants anything, but it still participates in
/// deduplication (it can shadow a later rule for the same key).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRule {
    pub route: String,
    pub domain: String,
    pub active: bool,
    pub can_read: bool,
    pub can_create: bool,
    pub can_replace: bool,
    pub can_update: bool,
    pub can_delete: bool,
}

impl PermissionRule {
    /// A rule with every action flag cleared.
    pub fn new(route: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            domain: domain.into(),
            active: true,
            can_read: false,
            can_create: false,
            can_replace: false,
            can_update: false,
            can_delete: false,
        }
    }

    /// The (route, domain) key this rule is scoped to.
    pub fn key(&self) -> (&str, &str) {
        (&self.route, &self.domain)
    }

    /// Whether this rule's flag for `action` is set. Ignores `active`;
    /// callers gate on that separately.
    pub fn allows(&self, action: Action) -> bool {
        match action {
            Action::Read => self.can_read,
            Action::Create => self.can_create,
            Action::Replace => self.can_replace,
            Action::Update => self.can_update,
            Action::Delete => self.can_delete,
        }
    }

    pub fn with_read(mut self) -> Self {
        self.can_read = true;
        self
    }

    pub fn with_create(mut self) -> Self {
        self.can_create = true;
        self
    }

    pub fn with_replace(mut self) -> Self {
        self.can_replace = true;
        self
    }

    pub fn with_update(mut self) -> Self {
        self.can_update = true;
        self
    }

    pub fn with_delete(mut self) -> Self {
        self.can_delete = true;
        self
    }

    /// All five action flags set.
    pub fn with_all(self) -> Self {
        self.with_read()
            .with_create()
            .with_replace()
            .with_update()
            .with_delete()
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_tracks_individual_flags() {
        let rule = PermissionRule::new("components", "warehouse")
            .with_read()
            .with_update();

        assert!(rule.allows(Action::Read));
        assert!(rule.allows(Action::Update));
        assert!(!rule.allows(Action::Create));
        assert!(!rule.allows(Action::Replace));
        assert!(!rule.allows(Action::Delete));
    }

    #[test]
    fn with_all_sets_every_flag() {
        let rule = PermissionRule::new("components", "warehouse").with_all();

        for action in [
            Action::Read,
            Action::Create,
            Action::Replace,
            Action::Update,
            Action::Delete,
        ] {
            assert!(rule.allows(action));
        }
    }

    #[test]
    fn allows_ignores_active_flag() {
        // Gating on `active` is the resolver's job.
        let rule = PermissionRule::new("components", "warehouse")
            .with_read()
            .inactive();
        assert!(rule.allows(Action::Read));
        assert!(!rule.active);
    }
}
