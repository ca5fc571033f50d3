use std::str::FromStr;

use caduceus_core::{AppError, AppResult};
use caduceus_domain::{PrivilegeTier, RoleAssignment, RoleDefinition, RoleDefinitionInput};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::FromRow;

/// Columns selected for assignment rows, aliased to the row field names.
pub(crate) const ASSIGNMENT_REST_SELECT: &str = "assignment_id:id,principal_id:platform_id,role_id,is_active,expires_at,assigned_by,assigned_at:created_at";

/// Columns selected for role rows, aliased to the row field names.
pub(crate) const ROLE_REST_SELECT: &str =
    "role_id:id,name,display_name,rank,privilege_level,permissions,modules,is_active";

/// Stored role assignment as returned by the data platform.
#[derive(Debug, Clone, FromRow, Deserialize)]
pub(crate) struct AssignmentRow {
    pub(crate) assignment_id: String,
    pub(crate) principal_id: String,
    pub(crate) role_id: String,
    pub(crate) is_active: bool,
    pub(crate) expires_at: Option<DateTime<Utc>>,
    pub(crate) assigned_by: Option<String>,
    pub(crate) assigned_at: Option<DateTime<Utc>>,
}

impl From<AssignmentRow> for RoleAssignment {
    fn from(row: AssignmentRow) -> Self {
        Self {
            assignment_id: row.assignment_id,
            principal_id: row.principal_id,
            role_id: row.role_id,
            is_active: row.is_active,
            expires_at: row.expires_at,
            assigned_by: row.assigned_by,
            assigned_at: row.assigned_at,
        }
    }
}

/// Stored role definition as returned by the data platform.
#[derive(Debug, Clone, FromRow, Deserialize)]
pub(crate) struct RoleRow {
    pub(crate) role_id: String,
    pub(crate) name: String,
    pub(crate) display_name: String,
    pub(crate) rank: i32,
    pub(crate) privilege_level: String,
    #[serde(default)]
    pub(crate) permissions: Option<Vec<String>>,
    #[serde(default)]
    pub(crate) modules: Option<Vec<String>>,
    pub(crate) is_active: bool,
}

impl RoleRow {
    /// Decodes the row, rejecting unknown tiers and rank/tier disagreement.
    pub(crate) fn into_domain(self) -> AppResult<RoleDefinition> {
        let role_id = self.role_id;
        let tier = PrivilegeTier::from_str(self.privilege_level.as_str()).map_err(|error| {
            AppError::Internal(format!("failed to decode role '{role_id}': {error}"))
        })?;
        let rank = u16::try_from(self.rank).map_err(|_| {
            AppError::Internal(format!(
                "failed to decode role '{role_id}': rank {} is out of range",
                self.rank
            ))
        })?;

        RoleDefinition::new(RoleDefinitionInput {
            role_id: role_id.clone(),
            name: self.name,
            display_name: self.display_name,
            rank,
            tier,
            permissions: self.permissions.unwrap_or_default(),
            modules: self.modules.unwrap_or_default(),
            is_active: self.is_active,
        })
        .map_err(|error| AppError::Internal(format!("failed to decode role '{role_id}': {error}")))
    }
}

/// Decodes role rows, failing on the first malformed row.
pub(crate) fn decode_roles(rows: Vec<RoleRow>) -> AppResult<Vec<RoleDefinition>> {
    rows.into_iter().map(RoleRow::into_domain).collect()
}
