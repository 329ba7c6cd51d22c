//! Role-scoped visibility
//!
//! Roles, tenant levels, the caller identity and the single resolver that
//! maps them to a [`ScopeFilter`].

pub mod caller;
pub mod level;
pub mod resolver;

pub use caller::Caller;
pub use level::{AdminRole, TenantLevel};
pub use resolver::{resolve_scope, ChargerView, ScopeFilter};
