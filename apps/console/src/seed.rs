use std::path::Path;

use caduceus_core::{AppError, AppResult};
use caduceus_domain::{PrivilegeTier, RoleAssignment, RoleDefinition, RoleDefinitionInput};
use caduceus_infrastructure::InMemoryPrivilegeRepository;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct PrivilegeSeed {
    #[serde(default)]
    roles: Vec<RoleSeed>,
    #[serde(default)]
    assignments: Vec<AssignmentSeed>,
}

#[derive(Debug, Deserialize)]
struct RoleSeed {
    role_id: String,
    name: String,
    display_name: String,
    tier: PrivilegeTier,
    rank: Option<u16>,
    #[serde(default)]
    permissions: Vec<String>,
    #[serde(default)]
    modules: Vec<String>,
    #[serde(default = "default_active")]
    is_active: bool,
}

#[derive(Debug, Deserialize)]
struct AssignmentSeed {
    assignment_id: String,
    principal_id: String,
    role_id: String,
    #[serde(default = "default_active")]
    is_active: bool,
    expires_at: Option<DateTime<Utc>>,
    assigned_by: Option<String>,
    assigned_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

impl PrivilegeSeed {
    pub fn read(path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|error| {
            AppError::Validation(format!(
                "failed to read privilege seed '{}': {error}",
                path.display()
            ))
        })?;

        Self::parse(contents.as_str())
    }

    pub fn parse(contents: &str) -> AppResult<Self> {
        serde_json::from_str(contents)
            .map_err(|error| AppError::Validation(format!("invalid privilege seed: {error}")))
    }

    pub async fn load_into(self, repository: &InMemoryPrivilegeRepository) -> AppResult<()> {
        let role_count = self.roles.len();
        let assignment_count = self.assignments.len();

        for seed in self.roles {
            let role = RoleDefinition::new(RoleDefinitionInput {
                rank: seed.rank.unwrap_or_else(|| seed.tier.rank()),
                role_id: seed.role_id,
                name: seed.name,
                display_name: seed.display_name,
                tier: seed.tier,
                permissions: seed.permissions,
                modules: seed.modules,
                is_active: seed.is_active,
            })?;
            repository.insert_role(role).await?;
        }

        for seed in self.assignments {
            repository
                .insert_assignment(RoleAssignment {
                    assignment_id: seed.assignment_id,
                    principal_id: seed.principal_id,
                    role_id: seed.role_id,
                    is_active: seed.is_active,
                    expires_at: seed.expires_at,
                    assigned_by: seed.assigned_by,
                    assigned_at: seed.assigned_at,
                })
                .await?;
        }

        info!(
            roles = role_count,
            assignments = assignment_count,
            "seeded in-memory privilege store"
        );
        Ok(())
    }
}
