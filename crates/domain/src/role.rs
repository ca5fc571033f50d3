use std::collections::BTreeSet;

use caduceus_core::{AppError, AppResult, NonEmptyString};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::PrivilegeTier;

/// Role definition with its privilege tier, permissions and modules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleDefinition {
    role_id: NonEmptyString,
    name: NonEmptyString,
    display_name: NonEmptyString,
    rank: u16,
    tier: PrivilegeTier,
    permissions: BTreeSet<String>,
    modules: BTreeSet<String>,
    is_active: bool,
}

/// Input payload used to construct a validated role definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDefinitionInput {
    /// Opaque role identifier assigned by the store.
    pub role_id: String,
    /// Stable machine name, for example `hospital_admin`.
    pub name: String,
    /// User-facing role name.
    pub display_name: String,
    /// Stored numeric rank.
    pub rank: u16,
    /// Stored privilege tier label.
    pub tier: PrivilegeTier,
    /// Permission keys granted by the role. Duplicates are collapsed.
    pub permissions: Vec<String>,
    /// Module keys unlocked by the role. Duplicates are collapsed.
    pub modules: Vec<String>,
    /// Whether the role is currently active.
    pub is_active: bool,
}

impl RoleDefinition {
    /// Creates a validated role definition.
    ///
    /// The stored rank must equal the rank of the stored tier.
    pub fn new(input: RoleDefinitionInput) -> AppResult<Self> {
        let RoleDefinitionInput {
            role_id,
            name,
            display_name,
            rank,
            tier,
            permissions,
            modules,
            is_active,
        } = input;

        if tier.rank() != rank {
            return Err(AppError::Validation(format!(
                "role '{role_id}' has rank {rank} but tier '{}' requires rank {}",
                tier.as_str(),
                tier.rank()
            )));
        }

        Ok(Self {
            role_id: NonEmptyString::new(role_id)?,
            name: NonEmptyString::new(name)?,
            display_name: NonEmptyString::new(display_name)?,
            rank,
            tier,
            permissions: permissions.into_iter().collect(),
            modules: modules.into_iter().collect(),
            is_active,
        })
    }

    /// Returns the opaque role identifier.
    #[must_use]
    pub fn role_id(&self) -> &str {
        self.role_id.as_str()
    }

    /// Returns the machine name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the user-facing name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the numeric rank.
    #[must_use]
    pub fn rank(&self) -> u16 {
        self.rank
    }

    /// Returns the privilege tier.
    #[must_use]
    pub fn tier(&self) -> PrivilegeTier {
        self.tier
    }

    /// Returns the permission keys.
    #[must_use]
    pub fn permissions(&self) -> &BTreeSet<String> {
        &self.permissions
    }

    /// Returns the module keys.
    #[must_use]
    pub fn modules(&self) -> &BTreeSet<String> {
        &self.modules
    }

    /// Returns whether the role is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }
}

/// Read-time state of a role assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentState {
    /// Active and not yet expired.
    Current,
    /// Active but past its expiry.
    Expired,
    /// Switched off by an administrator.
    Deactivated,
}

/// Assignment linking a principal to a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleAssignment {
    /// Stable assignment identifier.
    pub assignment_id: String,
    /// Platform identifier of the principal holding the role.
    pub principal_id: String,
    /// Referenced role identifier.
    pub role_id: String,
    /// Assignment active flag.
    pub is_active: bool,
    /// Optional expiry; the assignment stops counting at this instant.
    pub expires_at: Option<DateTime<Utc>>,
    /// Subject that granted the role, when recorded.
    pub assigned_by: Option<String>,
    /// Grant timestamp, when recorded.
    pub assigned_at: Option<DateTime<Utc>>,
}

impl RoleAssignment {
    /// Returns the assignment state at the evaluation instant.
    #[must_use]
    pub fn state_at(&self, now: DateTime<Utc>) -> AssignmentState {
        if !self.is_active {
            return AssignmentState::Deactivated;
        }

        match self.expires_at {
            Some(expires_at) if expires_at <= now => AssignmentState::Expired,
            _ => AssignmentState::Current,
        }
    }

    /// Returns whether the assignment is active and unexpired at `now`.
    #[must_use]
    pub fn is_current_at(&self, now: DateTime<Utc>) -> bool {
        self.state_at(now) == AssignmentState::Current
    }
}
