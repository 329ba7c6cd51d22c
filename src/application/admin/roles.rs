//! Role reference data. Only the super-admin writes it.

use crate::application::gateway::ScopedGateway;
use crate::domain::{
    AdminRole, Caller, DomainError, DomainResult, NewRole, Ownership, Role, ScopeFilter,
    UpdateOutcome,
};

#[derive(Clone)]
pub struct RoleAdminService {
    gateway: ScopedGateway,
}

impl RoleAdminService {
    pub fn new(gateway: ScopedGateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self, active_only: bool) -> DomainResult<Vec<Role>> {
        self.gateway
            .list::<Role, _>(&ScopeFilter::Global, active_only, |_| true)
            .await
    }

    pub async fn create(&self, caller: &Caller, draft: NewRole) -> DomainResult<Role> {
        ensure_super(caller)?;
        self.gateway
            .create(draft, Ownership::default(), &caller.scope, caller.actor())
            .await
    }

    /// The super-admin role itself stays active; everything else may toggle.
    pub async fn set_active(
        &self,
        caller: &Caller,
        role_id: i32,
        active: bool,
    ) -> DomainResult<UpdateOutcome<Role>> {
        ensure_super(caller)?;
        if role_id == AdminRole::SuperAdmin.role_id() && !active {
            return Err(DomainError::Validation("the superadmin role cannot be deactivated".into()));
        }
        self.gateway
            .set_active::<Role>(&role_id, active, &caller.scope, caller.actor())
            .await
    }
}

fn ensure_super(caller: &Caller) -> DomainResult<()> {
    if caller.role == AdminRole::SuperAdmin {
        Ok(())
    } else {
        Err(DomainError::Forbidden("roles are managed by the super-admin".into()))
    }
}
