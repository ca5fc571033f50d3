use async_trait::async_trait;
use caduceus_core::AppResult;
use caduceus_domain::{RoleAssignment, RoleDefinition};

/// Repository port for the two reads privilege resolution depends on.
#[async_trait]
pub trait PrivilegeRepository: Send + Sync {
    /// Lists assignments for a principal whose stored active flag is set.
    ///
    /// The principal identifier is an opaque join key for the store.
    async fn list_active_assignments(&self, principal_id: &str) -> AppResult<Vec<RoleAssignment>>;

    /// Lists role definitions matching the ids, including inactive roles.
    async fn list_role_definitions(&self, role_ids: &[String]) -> AppResult<Vec<RoleDefinition>>;
}
