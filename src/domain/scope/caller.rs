use super::level::AdminRole;
use super::resolver::{resolve_scope, ScopeFilter};
use crate::domain::record::Ownership;
use crate::shared::errors::DomainError;

/// The authenticated admin on whose behalf a request runs.
///
/// Built once per request from verified token claims; the scope is never
/// taken from a request body.
#[derive(Debug, Clone, PartialEq)]
pub struct Caller {
    pub user_id: i32,
    pub username: String,
    pub role: AdminRole,
    pub ownership: Ownership,
    pub scope: ScopeFilter,
}

impl Caller {
    pub fn new(
        user_id: i32,
        username: impl Into<String>,
        role: AdminRole,
        ownership: Ownership,
    ) -> Result<Self, DomainError> {
        let ownership = ownership.truncated(role.level());
        let scope = resolve_scope(role, &ownership)?;
        Ok(Self {
            user_id,
            username: username.into(),
            role,
            ownership,
            scope,
        })
    }

    /// Name stamped into `created_by` / `modified_by`.
    pub fn actor(&self) -> &str {
        &self.username
    }
}
