//! Permission groups.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use stockroom_core::{AuthError, AuthResult, GroupId};

use crate::rule::PermissionRule;

/// A named, ordered set of permission rules shared by many principals.
///
/// # Invariants
/// - Group names are unique (enforced by the store).
/// - Within one group no two rules share the same (route, domain) pair,
///   enforced here at write time, before persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub active: bool,
    rules: Vec<PermissionRule>,
}

impl Group {
    pub fn new(name: impl Into<String>, rules: Vec<PermissionRule>) -> AuthResult<Self> {
        Self::ensure_unique_keys(&rules)?;
        Ok(Self {
            id: GroupId::new(),
            name: name.into(),
            active: true,
            rules,
        })
    }

    /// Append a rule, rejecting a duplicate (route, domain) key.
    pub fn add_rule(&mut self, rule: PermissionRule) -> AuthResult<()> {
        if self.rules.iter().any(|r| r.key() == rule.key()) {
            return Err(AuthError::conflict(format!(
                "duplicate rule for ({}, {})",
                rule.route, rule.domain
            )));
        }
        self.rules.push(rule);
        Ok(())
    }

    /// The group's rules in insertion order.
    pub fn rules(&self) -> &[PermissionRule] {
        &self.rules
    }

    fn ensure_unique_keys(rules: &[PermissionRule]) -> AuthResult<()> {
        let mut seen: HashSet<(&str, &str)> = HashSet::new();
        for rule in rules {
            if !seen.insert(rule.key()) {
                return Err(AuthError::conflict(format!(
                    "duplicate rule for ({}, {})",
                    rule.route, rule.domain
                )));
            }
        }
        Ok(())
    }
}
