//! User management inside the caller's scope

use tracing::info;

use crate::application::gateway::ScopedGateway;
use crate::application::identity::hash_secret;
use crate::domain::{
    AdminRole, Caller, DomainError, DomainResult, NewUser, Ownership, Record, Role, ScopeFilter,
    TenantLevel, UpdateOutcome, User, UserPatch,
};

#[derive(Debug, Clone, Default)]
pub struct CreateUserInput {
    pub role_id: i32,
    pub username: String,
    pub email_id: String,
    pub password: String,
    pub phone_no: Option<String>,
    pub wallet_balance: Option<f64>,
    /// Tenant node for a user created one level below the caller.
    pub reseller_id: Option<i32>,
    pub client_id: Option<i32>,
    pub association_id: Option<i32>,
}

impl CreateUserInput {
    fn node_id(&self, level: TenantLevel) -> Option<i32> {
        match level {
            TenantLevel::Reseller => self.reseller_id,
            TenantLevel::Client => self.client_id,
            TenantLevel::Association => self.association_id,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    pub username: Option<String>,
    pub phone_no: Option<String>,
    pub password: Option<String>,
    pub wallet_balance: Option<f64>,
}

#[derive(Clone)]
pub struct UserAdminService {
    gateway: ScopedGateway,
    bcrypt_cost: u32,
}

impl UserAdminService {
    pub fn new(gateway: ScopedGateway, bcrypt_cost: u32) -> Self {
        Self {
            gateway,
            bcrypt_cost,
        }
    }

    /// Users in scope whose role the caller manages. The super-admin sees all.
    pub async fn list(&self, caller: &Caller, active_only: bool) -> DomainResult<Vec<User>> {
        let role = caller.role;
        self.gateway
            .list::<User, _>(&caller.scope, active_only, move |u| {
                role == AdminRole::SuperAdmin || role.can_manage(u.role_id)
            })
            .await
    }

    pub async fn get(&self, caller: &Caller, user_id: i32) -> DomainResult<User> {
        let user = self.gateway.get::<User>(&user_id, &caller.scope).await?;
        self.ensure_manageable(caller, &user)?;
        Ok(user)
    }

    /// Roles the caller may hand out, active ones only.
    pub async fn assignable_roles(&self, caller: &Caller) -> DomainResult<Vec<Role>> {
        let role = caller.role;
        self.gateway
            .list::<Role, _>(&ScopeFilter::Global, true, move |r| role.can_manage(r.role_id))
            .await
    }

    pub async fn create(&self, caller: &Caller, input: CreateUserInput) -> DomainResult<User> {
        let target = self.target_role(caller, input.role_id).await?;
        let owner = self.owner_for(caller, target, &input).await?;

        let password_hash = if input.password.trim().is_empty() {
            String::new()
        } else {
            hash_secret(input.password, self.bcrypt_cost).await?
        };
        if input.wallet_balance.is_some_and(|w| !w.is_finite() || w < 0.0) {
            return Err(DomainError::Validation("wallet_balance must be non-negative".into()));
        }

        let draft = NewUser {
            role_id: input.role_id,
            username: input.username,
            email_id: input.email_id,
            password_hash,
            phone_no: input.phone_no,
            wallet_balance: input.wallet_balance,
        };
        self.gateway
            .create(draft, owner, &caller.scope, caller.actor())
            .await
    }

    pub async fn update(
        &self,
        caller: &Caller,
        user_id: i32,
        input: UpdateUserInput,
    ) -> DomainResult<UpdateOutcome<User>> {
        if input.wallet_balance.is_some_and(|w| !w.is_finite() || w < 0.0) {
            return Err(DomainError::Validation("wallet_balance must be non-negative".into()));
        }
        let password_hash = match input.password {
            Some(p) if p.trim().is_empty() => {
                return Err(DomainError::Validation("password must not be blank".into()))
            }
            Some(p) => Some(hash_secret(p, self.bcrypt_cost).await?),
            None => None,
        };
        if input.username.as_deref().is_some_and(|u| u.trim().is_empty()) {
            return Err(DomainError::Validation("username must not be blank".into()));
        }

        let patch = UserPatch {
            username: input.username,
            phone_no: input.phone_no,
            password_hash,
            wallet_balance: input.wallet_balance,
        };
        let role = caller.role;
        self.gateway
            .update::<User, _>(&user_id, &caller.scope, caller.actor(), move |u| {
                if role != AdminRole::SuperAdmin && !role.can_manage(u.role_id) {
                    return Err(User::not_found(&u.user_id));
                }
                patch.apply(u);
                Ok(())
            })
            .await
    }

    pub async fn set_active(
        &self,
        caller: &Caller,
        user_id: i32,
        active: bool,
    ) -> DomainResult<UpdateOutcome<User>> {
        if user_id == caller.user_id && !active {
            return Err(DomainError::Validation("cannot deactivate own account".into()));
        }
        let user = self.get(caller, user_id).await?;
        let outcome = self
            .gateway
            .set_active::<User>(&user.user_id, active, &caller.scope, caller.actor())
            .await?;
        info!(user_id, active, by = %caller.actor(), "user status changed");
        Ok(outcome)
    }

    /// The caller's own wallet balance.
    pub async fn wallet(&self, caller: &Caller) -> DomainResult<f64> {
        let me = self.gateway.get::<User>(&caller.user_id, &caller.scope).await?;
        Ok(me.wallet_balance)
    }

    // ── Helpers ─────────────────────────────────────────────────

    fn ensure_manageable(&self, caller: &Caller, user: &User) -> DomainResult<()> {
        if caller.role == AdminRole::SuperAdmin || caller.role.can_manage(user.role_id) {
            Ok(())
        } else {
            Err(User::not_found(&user.user_id))
        }
    }

    async fn target_role(&self, caller: &Caller, role_id: i32) -> DomainResult<AdminRole> {
        if role_id <= 0 {
            return Err(DomainError::MissingFields(vec!["role_id"]));
        }
        let row = self
            .gateway
            .repos()
            .roles()
            .find_by_id(&role_id)
            .await?
            .filter(|r| r.is_active());
        let Some(role) = row.and_then(|r| r.admin_role()) else {
            return Err(DomainError::Validation(format!("role_id {role_id} is not an active role")));
        };
        if !caller.role.can_manage(role_id) {
            return Err(DomainError::Forbidden(format!("cannot create {role} users")));
        }
        Ok(role)
    }

    /// Scope ids for a new user of `target`: the caller's own node, or a
    /// node one level down that the caller can see.
    async fn owner_for(
        &self,
        caller: &Caller,
        target: AdminRole,
        input: &CreateUserInput,
    ) -> DomainResult<Ownership> {
        let Some(level) = target.level() else {
            return Ok(Ownership::default());
        };
        if Some(level) == caller.scope.level() {
            return Ok(caller.ownership);
        }
        let id = input
            .node_id(level)
            .ok_or(DomainError::MissingFields(vec![level.id_field()]))?;
        self.gateway.node_ownership(level, id, &caller.scope).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::admin::testkit::Kit;

    fn input(role: AdminRole, email: &str) -> CreateUserInput {
        CreateUserInput {
            role_id: role.role_id(),
            username: email.split('@').next().unwrap_or("user").to_string(),
            email_id: email.to_string(),
            password: "correct horse".into(),
            ..CreateUserInput::default()
        }
    }

    #[tokio::test]
    async fn reseller_creates_client_admin_for_own_client() {
        let kit = Kit::new().await;
        let svc = kit.users();
        let mut req = input(AdminRole::ClientAdmin, "ops@acme.test");
        req.client_id = Some(kit.client.client_id);

        let user = svc.create(&kit.reseller_admin(), req).await.unwrap();
        assert_eq!(user.reseller_id, Some(kit.reseller.reseller_id));
        assert_eq!(user.client_id, Some(kit.client.client_id));
        assert_eq!(user.association_id, None);
        assert!(user.password_hash.starts_with("$2"));
    }

    #[tokio::test]
    async fn taken_username_is_a_conflict() {
        let kit = Kit::new().await;
        let mut req = input(AdminRole::ClientAdmin, "second@acme.test");
        req.username = "acme-admin".into();
        req.client_id = Some(kit.client.client_id);

        let err = kit.users().create(&kit.reseller_admin(), req).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let own = kit.client_admin();
        let rename = UpdateUserInput {
            username: Some("volt-admin".into()),
            ..UpdateUserInput::default()
        };
        let err = kit.users().update(&kit.super_admin(), own.user_id, rename).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn client_admin_requires_client_id() {
        let kit = Kit::new().await;
        let err = kit
            .users()
            .create(&kit.reseller_admin(), input(AdminRole::ClientAdmin, "ops@acme.test"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::MissingFields(f) if f == vec!["client_id"]));
    }

    #[tokio::test]
    async fn foreign_client_reads_as_missing() {
        let kit = Kit::new().await;
        let mut req = input(AdminRole::ClientAdmin, "ops@acme.test");
        req.client_id = Some(kit.other_client.client_id);

        let err = kit.users().create(&kit.reseller_admin(), req).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "client", .. }));
    }

    #[tokio::test]
    async fn roles_outside_manageable_set_are_forbidden() {
        let kit = Kit::new().await;
        let err = kit
            .users()
            .create(&kit.client_admin(), input(AdminRole::ResellerAdmin, "x@x.test"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn association_admin_creates_end_user_in_own_association() {
        let kit = Kit::new().await;
        let user = kit
            .users()
            .create(&kit.association_admin(), input(AdminRole::EndUser, "driver@x.test"))
            .await
            .unwrap();
        assert_eq!(user.ownership(), kit.association.ownership());
    }

    #[tokio::test]
    async fn blank_password_is_reported_missing() {
        let kit = Kit::new().await;
        let mut req = input(AdminRole::EndUser, "driver@x.test");
        req.password = "  ".into();
        let err = kit.users().create(&kit.association_admin(), req).await.unwrap_err();
        assert!(matches!(err, DomainError::MissingFields(f) if f == vec!["password"]));
    }

    #[tokio::test]
    async fn listing_is_limited_to_scope_and_managed_roles() {
        let kit = Kit::new().await;
        let svc = kit.users();
        svc.create(&kit.association_admin(), input(AdminRole::EndUser, "driver@x.test"))
            .await
            .unwrap();

        let seen = svc.list(&kit.client_admin(), false).await.unwrap();
        assert!(seen.iter().all(|u| u.client_id == Some(kit.client.client_id)));
        assert!(seen.iter().all(|u| u.role_id != AdminRole::EndUser.role_id()));

        let all = svc.list(&kit.super_admin(), false).await.unwrap();
        assert!(all.iter().any(|u| u.email_id == "driver@x.test"));
    }

    #[tokio::test]
    async fn update_and_deactivate_user() {
        let kit = Kit::new().await;
        let svc = kit.users();
        let user = svc
            .create(&kit.association_admin(), input(AdminRole::EndUser, "driver@x.test"))
            .await
            .unwrap();

        let outcome = svc
            .update(
                &kit.association_admin(),
                user.user_id,
                UpdateUserInput {
                    wallet_balance: Some(150.0),
                    ..UpdateUserInput::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(outcome.into_inner().wallet_balance, 150.0);

        svc.set_active(&kit.association_admin(), user.user_id, false)
            .await
            .unwrap();
        let active = svc.list(&kit.association_admin(), true).await.unwrap();
        assert!(active.iter().all(|u| u.user_id != user.user_id));
        assert!(!svc.get(&kit.association_admin(), user.user_id).await.unwrap().is_active());
    }

    #[tokio::test]
    async fn cannot_deactivate_self() {
        let kit = Kit::new().await;
        let me = kit.client_admin();
        let err = kit.users().set_active(&me, me.user_id, false).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn assignable_roles_follow_caller() {
        let kit = Kit::new().await;
        let roles = kit.users().assignable_roles(&kit.association_admin()).await.unwrap();
        let names: Vec<_> = roles.iter().map(|r| r.role_name.as_str()).collect();
        assert_eq!(names, vec!["associationadmin", "user"]);
    }
}
