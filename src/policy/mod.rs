//! Role policy - which sensitivity labels each role may see
//!
//! Lookups never fail: a role that is not in the policy gets the empty
//! label set, so an unrecognised role name ends up with no fields.

pub mod filter;

use std::collections::{BTreeSet, HashMap};

use crate::catalog::Sensitivity;

pub use filter::{compute_allowed_fields, AccessGrant};

/// Built-in role names
pub const BASIC_ROLE: &str = "basic";
pub const ADMIN_ROLE: &str = "admin";

/// Role name to granted sensitivity labels
#[derive(Debug, Default, Clone)]
pub struct RolePolicy {
    roles: HashMap<String, BTreeSet<Sensitivity>>,
}

impl RolePolicy {
    /// Create an empty policy (every role gets nothing)
    pub fn new() -> Self {
        Self {
            roles: HashMap::new(),
        }
    }

    /// Built-in policy: `basic` sees public fields, `admin` sees everything labelled
    pub fn builtin() -> Self {
        Self::new()
            .role(BASIC_ROLE, [Sensitivity::Public])
            .role(
                ADMIN_ROLE,
                [
                    Sensitivity::Public,
                    Sensitivity::Pii,
                    Sensitivity::Confidential,
                ],
            )
    }

    /// Add or replace a role. `Unclassified` is never stored.
    #[must_use]
    pub fn role(
        mut self,
        name: impl Into<String>,
        labels: impl IntoIterator<Item = Sensitivity>,
    ) -> Self {
        self.insert_role(name, labels);
        self
    }

    /// Add or replace a role in place
    pub fn insert_role(
        &mut self,
        name: impl Into<String>,
        labels: impl IntoIterator<Item = Sensitivity>,
    ) {
        let labels = labels.into_iter().filter(|s| s.is_grantable()).collect();
        self.roles.insert(name.into(), labels);
    }

    /// Labels a role may see. Unknown roles get the empty set.
    pub fn allowed_sensitivities(&self, role: &str) -> BTreeSet<Sensitivity> {
        self.roles.get(role).cloned().unwrap_or_default()
    }

    /// Check if a role is defined
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains_key(role)
    }

    /// List all role names, sorted
    pub fn list_roles(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.roles.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_roles() {
        let policy = RolePolicy::builtin();

        let basic = policy.allowed_sensitivities(BASIC_ROLE);
        assert_eq!(basic.len(), 1);
        assert!(basic.contains(&Sensitivity::Public));

        let admin = policy.allowed_sensitivities(ADMIN_ROLE);
        assert!(admin.contains(&Sensitivity::Pii));
        assert!(admin.contains(&Sensitivity::Confidential));

        assert_eq!(policy.list_roles(), vec!["admin", "basic"]);
    }

    #[test]
    fn test_unknown_role_is_empty() {
        let policy = RolePolicy::builtin();
        assert!(policy.allowed_sensitivities("nonexistent-role").is_empty());
        assert!(policy.allowed_sensitivities("Admin").is_empty());
        assert!(!policy.has_role("nonexistent-role"));
    }

    #[test]
    fn test_unclassified_never_granted() {
        let policy = RolePolicy::new().role(
            "auditor",
            [Sensitivity::Public, Sensitivity::Unclassified],
        );
        let labels = policy.allowed_sensitivities("auditor");
        assert_eq!(labels.len(), 1);
        assert!(!labels.contains(&Sensitivity::Unclassified));
    }

    #[test]
    fn test_custom_labels_stored() {
        let policy = RolePolicy::new().role(
            "ops",
            [Sensitivity::Public, Sensitivity::parse("Internal")],
        );
        let labels = policy.allowed_sensitivities("ops");
        assert!(labels.contains(&Sensitivity::Label("internal".to_string())));
        assert_eq!(labels.len(), 2);
    }
}
