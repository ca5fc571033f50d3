//! Application services and ports.

#![forbid(unsafe_code)]

mod privilege_ports;
mod privilege_resolver;

pub use privilege_ports::PrivilegeRepository;
pub use privilege_resolver::{PrivilegeResolver, ResolveError};
