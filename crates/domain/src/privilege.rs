use std::str::FromStr;

use caduceus_core::AppError;
use serde::{Deserialize, Serialize};

/// Closed, totally ordered set of privilege tiers.
///
/// Every tier maps to a fixed numeric rank; a lower rank is more privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivilegeTier {
    /// Unrestricted platform operator.
    SuperAdmin,
    /// Operator managing every organization on the platform.
    PlatformAdmin,
    /// Administrator of one organization and its hospitals.
    OrganizationAdmin,
    /// Administrator of one hospital.
    HospitalAdmin,
    /// Head of a hospital department.
    DepartmentHead,
    /// Practitioner with clinical module access.
    Clinician,
    /// General staff member.
    Staff,
    /// Read-only access.
    Viewer,
}

impl PrivilegeTier {
    /// Returns the numeric rank of this tier.
    #[must_use]
    pub fn rank(self) -> u16 {
        match self {
            Self::SuperAdmin => 1,
            Self::PlatformAdmin => 2,
            Self::OrganizationAdmin => 3,
            Self::HospitalAdmin => 4,
            Self::DepartmentHead => 5,
            Self::Clinician => 6,
            Self::Staff => 7,
            Self::Viewer => 8,
        }
    }

    /// Returns the tier registered for a numeric rank.
    #[must_use]
    pub fn from_rank(rank: u16) -> Option<Self> {
        Self::all().iter().copied().find(|tier| tier.rank() == rank)
    }

    /// Returns a stable storage value for this tier.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::PlatformAdmin => "platform_admin",
            Self::OrganizationAdmin => "organization_admin",
            Self::HospitalAdmin => "hospital_admin",
            Self::DepartmentHead => "department_head",
            Self::Clinician => "clinician",
            Self::Staff => "staff",
            Self::Viewer => "viewer",
        }
    }

    /// Returns all tiers from most to least privileged.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[PrivilegeTier] = &[
            PrivilegeTier::SuperAdmin,
            PrivilegeTier::PlatformAdmin,
            PrivilegeTier::OrganizationAdmin,
            PrivilegeTier::HospitalAdmin,
            PrivilegeTier::DepartmentHead,
            PrivilegeTier::Clinician,
            PrivilegeTier::Staff,
            PrivilegeTier::Viewer,
        ];

        ALL
    }
}

impl FromStr for PrivilegeTier {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|tier| tier.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown privilege tier '{value}'")))
    }
}

impl std::fmt::Display for PrivilegeTier {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Returns whether `current` is at least as privileged as `required`.
///
/// An absent tier never satisfies a requirement.
#[must_use]
pub fn has_rank(current: Option<PrivilegeTier>, required: PrivilegeTier) -> bool {
    current.is_some_and(|tier| tier.rank() <= required.rank())
}
