//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_privilege_repository;
mod postgres_privilege_repository;
mod privilege_rows;
mod rest_privilege_repository;

pub use in_memory_privilege_repository::InMemoryPrivilegeRepository;
pub use postgres_privilege_repository::PostgresPrivilegeRepository;
pub use rest_privilege_repository::RestPrivilegeRepository;
