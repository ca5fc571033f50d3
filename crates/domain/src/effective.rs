//! Effective privilege snapshot derived from assignments and role definitions.


use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{PrivilegeTier, RoleAssignment, RoleDefinition, has_rank};

/// Label returned when a principal holds no effective role.
pub const FALLBACK_ROLE_LABEL: &str = "User";

/// Privileges a principal holds at one evaluation instant.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct EffectivePrivileges {
    roles: Vec<RoleDefinition>,
    assignments: Vec<RoleAssignment>,
    highest_tier: Option<PrivilegeTier>,
    permissions: BTreeSet<String>,
    modules: BTreeSet<String>,
}

impl EffectivePrivileges {
    /// Returns the snapshot of a principal without roles.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Aggregates the privileges of `principal_id` at `now`.
    ///
    /// A role counts when it is active and at least one active, unexpired
    /// assignment of this principal references it. Effective roles are ordered
    /// by rank, then by role id, so the first role decides the highest tier.
    /// Every active assignment is kept in the snapshot, including expired ones
    /// and ones pointing at inactive roles.
    #[must_use]
    pub fn aggregate(
        principal_id: &str,
        assignments: Vec<RoleAssignment>,
        roles: Vec<RoleDefinition>,
        now: DateTime<Utc>,
    ) -> Self {
        let assignments: Vec<RoleAssignment> = assignments
            .into_iter()
            .filter(|assignment| assignment.is_active && assignment.principal_id == principal_id)
            .collect();

        let current_role_ids: BTreeSet<&str> = assignments
            .iter()
            .filter(|assignment| assignment.is_current_at(now))
            .map(|assignment| assignment.role_id.as_str())
            .collect();

        let mut effective_roles: Vec<RoleDefinition> = Vec::new();
        for role in roles {
            let is_effective = role.is_active() && current_role_ids.contains(role.role_id());
            let is_duplicate = effective_roles
                .iter()
                .any(|existing| existing.role_id() == role.role_id());
            if is_effective && !is_duplicate {
                effective_roles.push(role);
            }
        }
        effective_roles.sort_by(|left, right| {
            left.rank()
                .cmp(&right.rank())
                .then_with(|| left.role_id().cmp(right.role_id()))
        });

        let permissions = effective_roles
            .iter()
            .flat_map(|role| role.permissions().iter().cloned())
            .collect();
        let modules = effective_roles
            .iter()
            .flat_map(|role| role.modules().iter().cloned())
            .collect();
        let highest_tier = effective_roles.first().map(RoleDefinition::tier);

        Self {
            roles: effective_roles,
            assignments,
            highest_tier,
            permissions,
            modules,
        }
    }

    /// Returns effective roles ordered from most to least privileged.
    #[must_use]
    pub fn roles(&self) -> &[RoleDefinition] {
        &self.roles
    }

    /// Returns active assignments, whether or not their role is effective.
    #[must_use]
    pub fn assignments(&self) -> &[RoleAssignment] {
        &self.assignments
    }

    /// Returns the most privileged tier among effective roles.
    #[must_use]
    pub fn highest_tier(&self) -> Option<PrivilegeTier> {
        self.highest_tier
    }

    /// Returns the union of permission keys across effective roles.
    #[must_use]
    pub fn permissions(&self) -> &BTreeSet<String> {
        &self.permissions
    }

    /// Returns the union of module keys across effective roles.
    #[must_use]
    pub fn modules(&self) -> &BTreeSet<String> {
        &self.modules
    }

    /// Returns whether no role is effective.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Returns whether the snapshot holds the permission key.
    #[must_use]
    pub fn has_permission(&self, key: &str) -> bool {
        self.permissions.contains(key)
    }

    /// Returns whether any requested permission is held. Empty input is never satisfied.
    #[must_use]
    pub fn has_any_permission<S: AsRef<str>>(&self, keys: &[S]) -> bool {
        keys.iter().any(|key| self.has_permission(key.as_ref()))
    }

    /// Returns whether every requested permission is held. Empty input is never satisfied.
    #[must_use]
    pub fn has_all_permissions<S: AsRef<str>>(&self, keys: &[S]) -> bool {
        !keys.is_empty() && keys.iter().all(|key| self.has_permission(key.as_ref()))
    }

    /// Returns whether the snapshot unlocks the module key.
    #[must_use]
    pub fn has_module(&self, key: &str) -> bool {
        self.modules.contains(key)
    }

    /// Returns whether any requested module is unlocked. Empty input is never satisfied.
    #[must_use]
    pub fn has_any_module<S: AsRef<str>>(&self, keys: &[S]) -> bool {
        keys.iter().any(|key| self.has_module(key.as_ref()))
    }

    /// Returns whether the highest tier is at least as privileged as `required`.
    #[must_use]
    pub fn meets_tier(&self, required: PrivilegeTier) -> bool {
        has_rank(self.highest_tier, required)
    }

    /// Returns the display name of the most privileged effective role.
    #[must_use]
    pub fn primary_role_label(&self) -> &str {
        self.roles
            .first()
            .map_or(FALLBACK_ROLE_LABEL, RoleDefinition::display_name)
    }
}
