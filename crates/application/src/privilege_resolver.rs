use std::collections::BTreeSet;
use std::sync::Arc;

use caduceus_core::AppError;
use caduceus_domain::EffectivePrivileges;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, warn};

use crate::PrivilegeRepository;


/// Failure while loading the data a privilege snapshot is built from.
///
/// A failed lookup is never reported as an empty snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Role assignments for the principal could not be loaded.
    #[error("assignment lookup failed for principal '{principal_id}': {source}")]
    AssignmentLookup {
        /// Principal being resolved.
        principal_id: String,
        /// Store failure.
        #[source]
        source: AppError,
    },

    /// Role definitions referenced by the assignments could not be loaded.
    #[error("role lookup failed for principal '{principal_id}': {source}")]
    RoleLookup {
        /// Principal being resolved.
        principal_id: String,
        /// Store failure.
        #[source]
        source: AppError,
    },
}

impl From<ResolveError> for AppError {
    fn from(value: ResolveError) -> Self {
        Self::Internal(value.to_string())
    }
}

/// Application service resolving effective privileges for principals.
#[derive(Clone)]
pub struct PrivilegeResolver {
    repository: Arc<dyn PrivilegeRepository>,
}

impl PrivilegeResolver {
    /// Creates a resolver backed by a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn PrivilegeRepository>) -> Self {
        Self { repository }
    }

    /// Resolves the privileges `principal_id` holds right now.
    pub async fn resolve(&self, principal_id: &str) -> Result<EffectivePrivileges, ResolveError> {
        self.resolve_at(principal_id, Utc::now()).await
    }

    /// Resolves the privileges `principal_id` holds at the evaluation instant.
    pub async fn resolve_at(
        &self,
        principal_id: &str,
        now: DateTime<Utc>,
    ) -> Result<EffectivePrivileges, ResolveError> {
        let assignments = self
            .repository
            .list_active_assignments(principal_id)
            .await
            .map_err(|source| {
                warn!(principal_id, error = %source, "assignment lookup failed");
                ResolveError::AssignmentLookup {
                    principal_id: principal_id.to_owned(),
                    source,
                }
            })?;

        if assignments.is_empty() {
            debug!(principal_id, "principal has no role assignments");
            return Ok(EffectivePrivileges::empty());
        }

        let role_ids: Vec<String> = assignments
            .iter()
            .filter(|assignment| assignment.is_active)
            .map(|assignment| assignment.role_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        if role_ids.is_empty() {
            debug!(principal_id, "principal has no active role assignments");
            return Ok(EffectivePrivileges::empty());
        }

        let roles = self
            .repository
            .list_role_definitions(&role_ids)
            .await
            .map_err(|source| {
                warn!(principal_id, error = %source, "role lookup failed");
                ResolveError::RoleLookup {
                    principal_id: principal_id.to_owned(),
                    source,
                }
            })?;

        let snapshot = EffectivePrivileges::aggregate(principal_id, assignments, roles, now);
        debug!(
            principal_id,
            effective_roles = snapshot.roles().len(),
            highest_tier = snapshot.highest_tier().map(|tier| tier.as_str()),
            "resolved effective privileges"
        );

        Ok(snapshot)
    }
}
