//! Identity service: application-layer orchestration of logins
//!
//! Every failed check yields the same `InvalidCredentials`, and an unknown
//! email still pays for one bcrypt verification.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::domain::{
    normalize_email, AdminRole, Caller, DomainError, DomainResult, Ownership, Record,
    RepositoryProvider, ScopeFilter, Tenant, TenantLevel, User,
};
use crate::infrastructure::crypto::{
    create_token, dummy_hash, hash_password, verify_dummy, verify_password, JwtConfig, TokenClaims,
};

/// Display data of the tenant node a caller is scoped to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenantRef {
    pub level: TenantLevel,
    pub id: i32,
    pub name: String,
}

/// Authentication result returned after a successful credential check
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub user: User,
    pub role: AdminRole,
    pub scope: ScopeFilter,
    /// Scope ids truncated to the role's level.
    pub scope_ids: Ownership,
    pub tenant: Option<TenantRef>,
}

/// A verified login plus its bearer token
#[derive(Debug, Clone)]
pub struct LoginSession {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub auth: AuthResult,
}

/// bcrypt on the blocking pool.
pub async fn hash_secret(password: String, cost: u32) -> DomainResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&password, cost))
        .await
        .map_err(|e| DomainError::Internal(format!("hash task failed: {e}")))?
        .map_err(|e| DomainError::Internal(format!("Failed to hash password: {e}")))
}

async fn verify_secret(password: String, hash: Option<String>, dummy: String) -> bool {
    tokio::task::spawn_blocking(move || match hash {
        Some(hash) => verify_password(&password, &hash).unwrap_or(false),
        None => verify_dummy(&password, &dummy),
    })
    .await
    .unwrap_or(false)
}

pub struct IdentityService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
    /// Same bcrypt cost as stored hashes.
    dummy_hash: String,
}

impl IdentityService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        jwt_config: JwtConfig,
        bcrypt_cost: u32,
    ) -> DomainResult<Self> {
        let dummy_hash = dummy_hash(bcrypt_cost)
            .map_err(|e| DomainError::Internal(format!("Failed to hash password: {e}")))?;
        Ok(Self {
            repos,
            jwt_config,
            dummy_hash,
        })
    }

    // ── Authentication ──────────────────────────────────────────

    /// Checks credentials for a namespace.
    ///
    /// `role_name` is `None` for the super-admin login and the namespace's
    /// role name otherwise.
    pub async fn authenticate(
        &self,
        email: &str,
        secret: &str,
        role_name: Option<&str>,
    ) -> DomainResult<AuthResult> {
        let expected = match role_name {
            None => Some(AdminRole::SuperAdmin),
            Some(name) => AdminRole::from_name(name)
                .filter(|r| !matches!(r, AdminRole::SuperAdmin | AdminRole::EndUser)),
        };
        let label = expected.map_or("unknown", AdminRole::name);

        let result = self.check(email, secret, role_name, expected).await;
        let outcome = match &result {
            Ok(_) => "success",
            Err(DomainError::InvalidCredentials) => "rejected",
            Err(_) => "error",
        };
        metrics::counter!("auth_attempts_total", "role" => label, "outcome" => outcome).increment(1);

        match &result {
            Ok(auth) => info!(user_id = auth.user.user_id, role = %auth.role, "login succeeded"),
            Err(DomainError::InvalidCredentials) => warn!(role = label, "login rejected"),
            Err(e) => warn!(role = label, error = %e, "login failed"),
        }
        result
    }

    async fn check(
        &self,
        email: &str,
        secret: &str,
        role_name: Option<&str>,
        expected: Option<AdminRole>,
    ) -> DomainResult<AuthResult> {
        let user = self
            .repos
            .users()
            .find_by_natural_key(&normalize_email(email))
            .await?;

        let hash = user.as_ref().map(|u| u.password_hash.clone());
        let matched = verify_secret(secret.to_string(), hash, self.dummy_hash.clone()).await;
        let (Some(user), true, Some(role)) = (user, matched, expected) else {
            return Err(DomainError::InvalidCredentials);
        };

        if !user.is_active() || user.role_id != role.role_id() {
            return Err(DomainError::InvalidCredentials);
        }

        if let Some(name) = role_name {
            let row = self.repos.roles().find_by_id(&user.role_id).await?;
            let valid = row.is_some_and(|r| r.is_active() && r.role_name == name);
            if !valid {
                return Err(DomainError::InvalidCredentials);
            }
        }

        let scope_ids = user.ownership().truncated(role.level());
        let scope = crate::domain::resolve_scope(role, &scope_ids)?;
        let tenant = self.tenant_ref(&scope).await?;

        Ok(AuthResult {
            user,
            role,
            scope,
            scope_ids,
            tenant,
        })
    }

    async fn tenant_ref(&self, scope: &ScopeFilter) -> DomainResult<Option<TenantRef>> {
        let ScopeFilter::Tenant { level, id } = *scope else {
            return Ok(None);
        };
        let name = match level {
            TenantLevel::Reseller => self.name_of(self.repos.resellers().find_by_id(&id).await?),
            TenantLevel::Client => self.name_of(self.repos.clients().find_by_id(&id).await?),
            TenantLevel::Association => {
                self.name_of(self.repos.associations().find_by_id(&id).await?)
            }
        };
        let name = name.ok_or(DomainError::ScopeNotFound {
            level: level.as_str(),
            id: id.to_string(),
        })?;
        Ok(Some(TenantRef { level, id, name }))
    }

    fn name_of<T: Tenant>(&self, row: Option<T>) -> Option<String> {
        row.map(|t| t.display_name().to_string())
    }

    /// Authenticates and issues a JWT carrying the role and scope ids.
    pub async fn login(
        &self,
        email: &str,
        secret: &str,
        role_name: Option<&str>,
    ) -> DomainResult<LoginSession> {
        let auth = self.authenticate(email, secret, role_name).await?;

        let claims = TokenClaims::new(
            auth.user.user_id,
            &auth.user.username,
            auth.role,
            auth.scope_ids,
            &self.jwt_config,
        );
        let token = create_token(&claims, &self.jwt_config)
            .map_err(|e| DomainError::Internal(format!("Failed to create token: {e}")))?;

        Ok(LoginSession {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expiration_hours * 3600,
            auth,
        })
    }

    pub fn jwt_config(&self) -> &JwtConfig {
        &self.jwt_config
    }

    // ── Sessions ────────────────────────────────────────────────

    /// Rebuilds the caller behind a verified token.
    ///
    /// The user row and its role are re-read, so deactivating either one
    /// revokes outstanding tokens on their next request. A token whose
    /// scope ids no longer match the user row is rejected as well.
    pub async fn resume(&self, claims: &TokenClaims, role: AdminRole) -> DomainResult<Caller> {
        let Some(user) = self.repos.users().find_by_id(&claims.sub).await? else {
            return Err(DomainError::InvalidCredentials);
        };
        if !user.is_active() || user.role_id != role.role_id() {
            return Err(DomainError::InvalidCredentials);
        }
        let role_row = self.repos.roles().find_by_id(&user.role_id).await?;
        if !role_row.is_some_and(|r| r.is_active()) {
            return Err(DomainError::InvalidCredentials);
        }

        let scope_ids = user.ownership().truncated(role.level());
        if claims.scope_ids() != scope_ids {
            return Err(DomainError::InvalidCredentials);
        }
        Caller::new(user.user_id, user.username, role, scope_ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{ScopedGateway, SequenceAllocator};
    use crate::domain::{Audit, Client, Draft, NewTenant, NewUser, Reseller, Role};
    use crate::infrastructure::storage::InMemoryRepositoryProvider;

    const COST: u32 = 4;

    struct Fixture {
        repos: Arc<dyn RepositoryProvider>,
        gw: ScopedGateway,
        identity: IdentityService,
    }

    fn fixture() -> Fixture {
        let repos: Arc<dyn RepositoryProvider> = Arc::new(InMemoryRepositoryProvider::new());
        let gw = ScopedGateway::new(repos.clone(), Arc::new(SequenceAllocator::new()));
        let identity =
            IdentityService::new(repos.clone(), JwtConfig::new("test-secret", 1), COST).unwrap();
        Fixture { repos, gw, identity }
    }

    async fn add_user(fx: &Fixture, role: AdminRole, email: &str, owner: Ownership) -> User {
        let draft = NewUser {
            role_id: role.role_id(),
            username: email.split('@').next().unwrap_or("u").to_string(),
            email_id: email.into(),
            password_hash: hash_secret("correct horse".into(), COST).await.unwrap(),
            phone_no: None,
            wallet_balance: None,
        };
        fx.gw.create(draft, owner, &ScopeFilter::Global, "root").await.unwrap()
    }

    async fn add_client(fx: &Fixture) -> Client {
        let reseller: Reseller = fx
            .gw
            .create(
                NewTenant {
                    name: "Volt".into(),
                    phone_no: "1".into(),
                    email_id: "volt@x.test".into(),
                    address: "a".into(),
                },
                Ownership::default(),
                &ScopeFilter::Global,
                "root",
            )
            .await
            .unwrap();
        fx.gw
            .create(
                NewTenant {
                    name: "Acme".into(),
                    phone_no: "2".into(),
                    email_id: "acme@x.test".into(),
                    address: "b".into(),
                },
                reseller.ownership(),
                &ScopeFilter::Global,
                "root",
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn super_admin_logs_in_with_global_scope() {
        let fx = fixture();
        add_user(&fx, AdminRole::SuperAdmin, "root@x.test", Ownership::default()).await;

        let session = fx.identity.login("ROOT@x.test ", "correct horse", None).await.unwrap();
        assert_eq!(session.auth.scope, ScopeFilter::Global);
        assert!(session.auth.tenant.is_none());
        assert!(!session.token.is_empty());
    }

    #[tokio::test]
    async fn wrong_secret_and_unknown_email_look_the_same() {
        let fx = fixture();
        add_user(&fx, AdminRole::SuperAdmin, "root@x.test", Ownership::default()).await;

        let wrong = fx.identity.authenticate("root@x.test", "nope", None).await.unwrap_err();
        let unknown = fx.identity.authenticate("who@x.test", "nope", None).await.unwrap_err();
        assert!(matches!(wrong, DomainError::InvalidCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn client_admin_gets_client_scope_and_name() {
        let fx = fixture();
        let client = add_client(&fx).await;
        add_user(&fx, AdminRole::ClientAdmin, "ops@acme.test", client.ownership()).await;

        let auth = fx
            .identity
            .authenticate("ops@acme.test", "correct horse", Some("clientadmin"))
            .await
            .unwrap();
        assert_eq!(auth.scope, ScopeFilter::client(client.client_id));
        assert_eq!(
            auth.tenant,
            Some(TenantRef {
                level: TenantLevel::Client,
                id: client.client_id,
                name: "Acme".into(),
            })
        );
    }

    #[tokio::test]
    async fn wrong_namespace_is_invalid_credentials() {
        let fx = fixture();
        let client = add_client(&fx).await;
        add_user(&fx, AdminRole::ClientAdmin, "ops@acme.test", client.ownership()).await;

        for ns in [Some("reselleradmin"), Some("superadmin"), Some("bogus"), None] {
            let err = fx
                .identity
                .authenticate("ops@acme.test", "correct horse", ns)
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::InvalidCredentials), "namespace {ns:?}");
        }
    }

    #[tokio::test]
    async fn inactive_user_or_role_cannot_log_in() {
        let fx = fixture();
        let client = add_client(&fx).await;
        let user = add_user(&fx, AdminRole::ClientAdmin, "ops@acme.test", client.ownership()).await;

        fx.gw
            .set_active::<Role>(&AdminRole::ClientAdmin.role_id(), false, &ScopeFilter::Global, "root")
            .await
            .unwrap();
        let err = fx
            .identity
            .authenticate("ops@acme.test", "correct horse", Some("clientadmin"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidCredentials));

        fx.gw
            .set_active::<Role>(&AdminRole::ClientAdmin.role_id(), true, &ScopeFilter::Global, "root")
            .await
            .unwrap();
        fx.gw
            .set_active::<User>(&user.user_id, false, &ScopeFilter::Global, "root")
            .await
            .unwrap();
        let err = fx
            .identity
            .authenticate("ops@acme.test", "correct horse", Some("clientadmin"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn missing_tenant_row_is_scope_not_found() {
        let fx = fixture();
        let orphan = Ownership {
            reseller_id: Some(40),
            client_id: Some(41),
            association_id: None,
        };
        let user: User = NewUser {
            role_id: AdminRole::ClientAdmin.role_id(),
            username: "ghost".into(),
            email_id: "ghost@x.test".into(),
            password_hash: hash_secret("correct horse".into(), COST).await.unwrap(),
            phone_no: None,
            wallet_balance: None,
        }
        .into_record(90, orphan, Audit::created("root"));
        fx.repos.users().insert(&user).await.unwrap();

        let err = fx
            .identity
            .authenticate("ghost@x.test", "correct horse", Some("clientadmin"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ScopeNotFound { level: "client", .. }));
    }

    #[tokio::test]
    async fn token_stops_working_once_user_is_deactivated() {
        let fx = fixture();
        let client = add_client(&fx).await;
        let user = add_user(&fx, AdminRole::ClientAdmin, "ops@acme.test", client.ownership()).await;
        let session = fx
            .identity
            .login("ops@acme.test", "correct horse", Some("clientadmin"))
            .await
            .unwrap();
        let claims = crate::infrastructure::crypto::verify_token(&session.token, fx.identity.jwt_config()).unwrap();

        let caller = fx.identity.resume(&claims, AdminRole::ClientAdmin).await.unwrap();
        assert_eq!(caller.user_id, user.user_id);
        assert_eq!(caller.scope, ScopeFilter::client(client.client_id));

        fx.gw
            .set_active::<User>(&user.user_id, false, &ScopeFilter::Global, "root")
            .await
            .unwrap();
        let err = fx.identity.resume(&claims, AdminRole::ClientAdmin).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn token_stops_working_once_role_is_deactivated() {
        let fx = fixture();
        let client = add_client(&fx).await;
        let user = add_user(&fx, AdminRole::ClientAdmin, "ops@acme.test", client.ownership()).await;
        let claims = TokenClaims::new(
            user.user_id,
            &user.username,
            AdminRole::ClientAdmin,
            client.ownership(),
            fx.identity.jwt_config(),
        );
        assert!(fx.identity.resume(&claims, AdminRole::ClientAdmin).await.is_ok());

        fx.gw
            .set_active::<Role>(&AdminRole::ClientAdmin.role_id(), false, &ScopeFilter::Global, "root")
            .await
            .unwrap();
        let err = fx.identity.resume(&claims, AdminRole::ClientAdmin).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn token_for_unknown_user_or_stale_scope_is_rejected() {
        let fx = fixture();
        let client = add_client(&fx).await;
        let user = add_user(&fx, AdminRole::ClientAdmin, "ops@acme.test", client.ownership()).await;

        let unknown = TokenClaims::new(
            user.user_id + 100,
            "nobody",
            AdminRole::ClientAdmin,
            client.ownership(),
            fx.identity.jwt_config(),
        );
        let err = fx.identity.resume(&unknown, AdminRole::ClientAdmin).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidCredentials));

        let stale = TokenClaims::new(
            user.user_id,
            &user.username,
            AdminRole::ClientAdmin,
            Ownership {
                client_id: Some(client.client_id + 1),
                ..client.ownership()
            },
            fx.identity.jwt_config(),
        );
        let err = fx.identity.resume(&stale, AdminRole::ClientAdmin).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[test]
    fn dummy_hash_follows_configured_cost() {
        let repos: Arc<dyn RepositoryProvider> = Arc::new(InMemoryRepositoryProvider::new());
        for cost in [4, 5] {
            let identity =
                IdentityService::new(repos.clone(), JwtConfig::new("test-secret", 1), cost).unwrap();
            assert_eq!(identity.dummy_hash.split('$').nth(2), Some(format!("{cost:02}").as_str()));
        }
    }
}
