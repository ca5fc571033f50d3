use async_trait::async_trait;

use caduceus_application::PrivilegeRepository;
use caduceus_core::{AppError, AppResult};
use caduceus_domain::{RoleAssignment, RoleDefinition};

use sqlx::PgPool;
use tracing::warn;

use crate::privilege_rows::{AssignmentRow, RoleRow, decode_roles};

/// PostgreSQL-backed repository for role assignment and role definition reads.
#[derive(Clone)]
pub struct PostgresPrivilegeRepository {
    pool: PgPool,
}

impl PostgresPrivilegeRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PrivilegeRepository for PostgresPrivilegeRepository {
    async fn list_active_assignments(&self, principal_id: &str) -> AppResult<Vec<RoleAssignment>> {
        let rows = sqlx::query_as::<_, AssignmentRow>(
            r#"
            SELECT
                assignments.id::text AS assignment_id,
                assignments.platform_id AS principal_id,
                assignments.role_id::text AS role_id,
                assignments.is_active,
                assignments.expires_at,
                assignments.assigned_by::text AS assigned_by,
                assignments.created_at AS assigned_at
            FROM role_assignments AS assignments
            WHERE assignments.platform_id = $1
              AND assignments.is_active = TRUE
            ORDER BY assignments.created_at, assignments.id
            "#,
        )
        .bind(principal_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            warn!(principal_id, %error, "role assignment query failed");
            AppError::Internal(format!(
                "failed to load role assignments for principal '{principal_id}': {error}"
            ))
        })?;

        Ok(rows.into_iter().map(RoleAssignment::from).collect())
    }

    async fn list_role_definitions(&self, role_ids: &[String]) -> AppResult<Vec<RoleDefinition>> {
        if role_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT
                roles.id::text AS role_id,
                roles.name,
                roles.display_name,
                roles.rank,
                roles.privilege_level,
                roles.permissions,
                roles.modules,
                roles.is_active
            FROM roles
            WHERE roles.id::text = ANY($1)
            ORDER BY roles.rank, roles.id
            "#,
        )
        .bind(role_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            warn!(requested = role_ids.len(), %error, "role definition query failed");
            AppError::Internal(format!("failed to load role definitions: {error}"))
        })?;

        decode_roles(rows)
    }
}
