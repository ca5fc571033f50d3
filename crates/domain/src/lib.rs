//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod effective;
pub mod identifier;
mod privilege;
mod role;

pub use effective::{EffectivePrivileges, FALLBACK_ROLE_LABEL};
pub use identifier::{Classification, IdentifierError, ParsedIdentifier};
pub use privilege::{PrivilegeTier, has_rank};
pub use role::{AssignmentState, RoleAssignment, RoleDefinition, RoleDefinitionInput};
