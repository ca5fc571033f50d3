use std::collections::HashMap;

use async_trait::async_trait;
use caduceus_application::PrivilegeRepository;
use caduceus_core::{AppError, AppResult};
use caduceus_domain::{RoleAssignment, RoleDefinition};
use tokio::sync::RwLock;

/// In-memory privilege repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryPrivilegeRepository {
    roles: RwLock<HashMap<String, RoleDefinition>>,
    assignments: RwLock<Vec<RoleAssignment>>,
}

impl InMemoryPrivilegeRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a role definition.
    pub async fn insert_role(&self, role: RoleDefinition) -> AppResult<()> {
        let mut roles = self.roles.write().await;
        if roles.contains_key(role.role_id()) {
            return Err(AppError::Conflict(format!(
                "role '{}' already exists",
                role.role_id()
            )));
        }

        roles.insert(role.role_id().to_owned(), role);
        Ok(())
    }

    /// Stores a role assignment.
    pub async fn insert_assignment(&self, assignment: RoleAssignment) -> AppResult<()> {
        let mut assignments = self.assignments.write().await;
        if assignments
            .iter()
            .any(|stored| stored.assignment_id == assignment.assignment_id)
        {
            return Err(AppError::Conflict(format!(
                "assignment '{}' already exists",
                assignment.assignment_id
            )));
        }

        assignments.push(assignment);
        Ok(())
    }
}

#[async_trait]
impl PrivilegeRepository for InMemoryPrivilegeRepository {
    async fn list_active_assignments(&self, principal_id: &str) -> AppResult<Vec<RoleAssignment>> {
        Ok(self
            .assignments
            .read()
            .await
            .iter()
            .filter(|assignment| assignment.is_active && assignment.principal_id == principal_id)
            .cloned()
            .collect())
    }

    async fn list_role_definitions(&self, role_ids: &[String]) -> AppResult<Vec<RoleDefinition>> {
        let roles = self.roles.read().await;
        let mut listed: Vec<RoleDefinition> = role_ids
            .iter()
            .filter_map(|role_id| roles.get(role_id).cloned())
            .collect();
        listed.sort_by(|left, right| left.role_id().cmp(right.role_id()));
        listed.dedup_by(|left, right| left.role_id() == right.role_id());

        Ok(listed)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use caduceus_application::{PrivilegeRepository, PrivilegeResolver};
    use caduceus_core::AppError;
    use caduceus_domain::{PrivilegeTier, RoleAssignment, RoleDefinition, RoleDefinitionInput};

    use super::InMemoryPrivilegeRepository;

    fn role(role_id: &str, tier: PrivilegeTier, is_active: bool) -> RoleDefinition {
        let result = RoleDefinition::new(RoleDefinitionInput {
            role_id: role_id.to_owned(),
            name: tier.as_str().to_owned(),
            display_name: format!("{tier} role"),
            rank: tier.rank(),
            tier,
            permissions: vec![format!("{role_id}.use")],
            modules: vec!["admin".to_owned()],
            is_active,
        });
        match result {
            Ok(role) => role,
            Err(error) => panic!("test role must be valid: {error}"),
        }
    }

    fn assignment(
        assignment_id: &str,
        principal_id: &str,
        role_id: &str,
        is_active: bool,
    ) -> RoleAssignment {
        RoleAssignment {
            assignment_id: assignment_id.to_owned(),
            principal_id: principal_id.to_owned(),
            role_id: role_id.to_owned(),
            is_active,
            expires_at: None,
            assigned_by: None,
            assigned_at: None,
        }
    }

    #[tokio::test]
    async fn duplicate_role_is_rejected() {
        let repository = InMemoryPrivilegeRepository::new();
        let org = role("org", PrivilegeTier::OrganizationAdmin, true);
        assert!(repository.insert_role(org.clone()).await.is_ok());
        assert!(matches!(
            repository.insert_role(org).await,
            Err(AppError::Conflict(ref message)) if message.contains("org")
        ));
    }

    #[tokio::test]
    async fn only_active_assignments_of_the_principal_are_listed() {
        let repository = InMemoryPrivilegeRepository::new();
        for stored in [
            assignment("a-1", "H00000001", "org", true),
            assignment("a-2", "H00000001", "staff", false),
            assignment("a-3", "H00000002", "org", true),
        ] {
            assert!(repository.insert_assignment(stored).await.is_ok());
        }

        let listed = repository.list_active_assignments("H00000001").await;
        assert!(listed.is_ok_and(|listed| listed.len() == 1 && listed[0].assignment_id == "a-1"));
    }

    #[tokio::test]
    async fn role_listing_includes_inactive_roles() {
        let repository = InMemoryPrivilegeRepository::new();
        assert!(repository.insert_role(role("staff", PrivilegeTier::Staff, false)).await.is_ok());

        let listed = repository
            .list_role_definitions(&["staff".to_owned(), "missing".to_owned()])
            .await;
        assert!(listed.is_ok_and(|listed| listed.len() == 1 && !listed[0].is_active()));
    }

    #[tokio::test]
    async fn resolver_reads_through_in_memory_store() {
        let repository = Arc::new(InMemoryPrivilegeRepository::new());
        for stored in [
            role("org", PrivilegeTier::OrganizationAdmin, true),
            role("staff", PrivilegeTier::Staff, false),
        ] {
            assert!(repository.insert_role(stored).await.is_ok());
        }
        for stored in [
            assignment("a-1", "H00000001", "org", true),
            assignment("a-2", "H00000001", "staff", true),
        ] {
            assert!(repository.insert_assignment(stored).await.is_ok());
        }

        let resolver = PrivilegeResolver::new(repository);
        let snapshot = match resolver.resolve("H00000001").await {
            Ok(snapshot) => snapshot,
            Err(error) => panic!("resolve must succeed: {error}"),
        };

        assert_eq!(snapshot.highest_tier(), Some(PrivilegeTier::OrganizationAdmin));
        assert_eq!(snapshot.assignments().len(), 2);
        assert!(snapshot.has_permission("org.use"));
        assert!(!snapshot.has_permission("staff.use"));
        assert_eq!(snapshot.primary_role_label(), "organization_admin role");
    }
}
