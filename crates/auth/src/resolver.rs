//! Permission resolution.
//!
//! Merges a principal's own rules with its groups' rules into a deduplicated
//! access-control list and answers yes/no authorization queries. The merge is
//! a stable first-wins fold keyed by (route, domain): personal rules beat
//! group rules, earlier-attached groups beat later ones. That ordering is the
//! only tie-break mechanism and must be preserved exactly.

use std::collections::HashSet;
use std::sync::Arc;

use stockroom_core::{AuthError, AuthResult, PrincipalId};

use crate::principal::Principal;
use crate::rule::{Action, PermissionRule};
use crate::store::{GroupStore, PrincipalStore};

pub struct PermissionResolver {
    principals: Arc<dyn PrincipalStore>,
    groups: Arc<dyn GroupStore>,
}

impl PermissionResolver {
    pub fn new(principals: Arc<dyn PrincipalStore>, groups: Arc<dyn GroupStore>) -> Self {
        Self { principals, groups }
    }

    /// Candidate rule list: the principal's own rules first, then each
    /// attached group's rules in attachment order. Missing and inactive
    /// groups contribute nothing.
    pub fn resolve(&self, principal: &Principal) -> AuthResult<Vec<PermissionRule>> {
        let mut rules = principal.rules.clone();
        for group_id in &principal.groups {
            if let Some(group) = self.groups.find_by_id(*group_id)? {
                if group.active {
                    rules.extend(group.rules().iter().cloned());
                }
            }
        }
        Ok(rules)
    }

    /// Stable first-wins dedup keyed by (route, domain): walking the candidate
    /// list in order, only the first rule seen per key survives.
    pub fn deduplicate(rules: Vec<PermissionRule>) -> Vec<PermissionRule> {
        let mut seen: HashSet<(String, String)> = HashSet::new();
        rules
            .into_iter()
            .filter(|rule| seen.insert((rule.route.clone(), rule.domain.clone())))
            .collect()
    }

    /// Whether `principal_id` may perform `action` on (route, domain).
    ///
    /// Returns `Ok(false)` for any non-match (no rule, inactive rule, flag
    /// unset); errors only when the principal itself cannot be loaded.
    pub fn authorize(
        &self,
        principal_id: PrincipalId,
        route: &str,
        domain: &str,
        action: Action,
    ) -> AuthResult<bool> {
        let principal = self
            .principals
            .find_by_id(principal_id)?
            .ok_or(AuthError::NotFound)?;

        let rules = Self::deduplicate(self.resolve(&principal)?);
        Ok(rules
            .iter()
            .any(|r| r.route == route && r.domain == domain && r.active && r.allows(action)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rule(route: &str, domain: &str) -> PermissionRule {
        PermissionRule::new(route, domain).with_read()
    }

    #[test]
    fn dedup_keeps_the_first_rule_per_key() {
        let first = rule("components", "warehouse");
        let shadowed = rule("components", "warehouse").with_delete();
        let other = rule("budgets", "finance");

        let kept = PermissionResolver::deduplicate(vec![
            first.clone(),
            shadowed,
            other.clone(),
        ]);

        assert_eq!(kept, vec![first, other]);
    }

    #[test]
    fn dedup_preserves_relative_order() {
        let rules = vec![
            rule("a", "x"),
            rule("b", "x"),
            rule("a", "y"),
            rule("b", "x").with_all(),
        ];
        let kept = PermissionResolver::deduplicate(rules);

        let keys: Vec<(String, String)> = kept
            .iter()
            .map(|r| (r.route.clone(), r.domain.clone()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("a".into(), "x".into()),
                ("b".into(), "x".into()),
                ("a".into(), "y".into()),
            ]
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: dedup is a stable first-wins fold. Every surviving rule
        /// is the first occurrence of its key, and survivors keep their
        /// relative input order.
        #[test]
        fn dedup_is_a_stable_first_wins_fold(
            keys in prop::collection::vec((0u8..5, 0u8..3, any::<bool>()), 0..40)
        ) {
            let rules: Vec<PermissionRule> = keys
                .iter()
                .map(|(route, domain, can_read)| {
                    let mut r = PermissionRule::new(format!("r{route}"), format!("d{domain}"));
                    r.can_read = *can_read;
                    r
                })
                .collect();

            let kept = PermissionResolver::deduplicate(rules.clone());

            // Each key survives exactly once, as its first occurrence.
            let mut expected = Vec::new();
            let mut seen = std::collections::HashSet::new();
            for r in &rules {
                if seen.insert((r.route.clone(), r.domain.clone())) {
                    expected.push(r.clone());
                }
            }
            prop_assert_eq!(kept, expected);
        }
    }
}
