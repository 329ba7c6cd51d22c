//! The caller's own account and tenant node

use serde::Serialize;

use crate::application::gateway::ScopedGateway;
use crate::application::identity::hash_secret;
use crate::domain::{
    Association, Caller, Client, ContactPatch, DomainError, DomainResult, Reseller, ScopeFilter,
    Tenant, TenantLevel, UpdateOutcome, User, UserPatch,
};

/// The tenant row a profile is joined to.
#[derive(Debug, Clone, PartialEq)]
pub enum TenantProfile {
    Reseller(Reseller),
    Client(Client),
    Association(Association),
}

impl TenantProfile {
    pub fn level(&self) -> TenantLevel {
        match self {
            Self::Reseller(_) => TenantLevel::Reseller,
            Self::Client(_) => TenantLevel::Client,
            Self::Association(_) => TenantLevel::Association,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Reseller(r) => r.display_name(),
            Self::Client(c) => c.display_name(),
            Self::Association(a) => a.display_name(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Profile {
    pub user: User,
    pub tenant: Option<TenantProfile>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OwnProfilePatch {
    pub username: Option<String>,
    pub phone_no: Option<String>,
    #[serde(skip)]
    pub password: Option<String>,
}

#[derive(Clone)]
pub struct ProfileService {
    gateway: ScopedGateway,
    bcrypt_cost: u32,
}

impl ProfileService {
    pub fn new(gateway: ScopedGateway, bcrypt_cost: u32) -> Self {
        Self {
            gateway,
            bcrypt_cost,
        }
    }

    pub async fn fetch(&self, caller: &Caller) -> DomainResult<Profile> {
        let user = self.gateway.get::<User>(&caller.user_id, &caller.scope).await?;
        let tenant = self.own_tenant(&caller.scope).await?;
        Ok(Profile { user, tenant })
    }

    async fn own_tenant(&self, scope: &ScopeFilter) -> DomainResult<Option<TenantProfile>> {
        let ScopeFilter::Tenant { level, id } = *scope else {
            return Ok(None);
        };
        let missing = || DomainError::ScopeNotFound {
            level: level.as_str(),
            id: id.to_string(),
        };
        let repos = self.gateway.repos();
        let tenant = match level {
            TenantLevel::Reseller => TenantProfile::Reseller(
                repos.resellers().find_by_id(&id).await?.ok_or_else(missing)?,
            ),
            TenantLevel::Client => {
                TenantProfile::Client(repos.clients().find_by_id(&id).await?.ok_or_else(missing)?)
            }
            TenantLevel::Association => TenantProfile::Association(
                repos.associations().find_by_id(&id).await?.ok_or_else(missing)?,
            ),
        };
        Ok(Some(tenant))
    }

    pub async fn update(
        &self,
        caller: &Caller,
        patch: OwnProfilePatch,
    ) -> DomainResult<UpdateOutcome<User>> {
        if patch.username.as_deref().is_some_and(|u| u.trim().is_empty()) {
            return Err(DomainError::Validation("username must not be blank".into()));
        }
        let password_hash = match patch.password {
            Some(p) if p.trim().is_empty() => {
                return Err(DomainError::Validation("password must not be blank".into()))
            }
            Some(p) => Some(hash_secret(p, self.bcrypt_cost).await?),
            None => None,
        };
        let user_patch = UserPatch {
            username: patch.username,
            phone_no: patch.phone_no,
            password_hash,
            wallet_balance: None,
        };
        self.gateway
            .update::<User, _>(&caller.user_id, &caller.scope, caller.actor(), move |u| {
                user_patch.apply(u);
                Ok(())
            })
            .await
    }

    /// Contact fields of the node the caller is scoped to.
    pub async fn update_tenant(
        &self,
        caller: &Caller,
        patch: ContactPatch,
    ) -> DomainResult<TenantProfile> {
        let ScopeFilter::Tenant { level, id } = caller.scope else {
            return Err(DomainError::Forbidden("the super-admin has no tenant row".into()));
        };
        let tenants = super::tenants::TenantAdminService::new(self.gateway.clone());
        Ok(match level {
            TenantLevel::Reseller => TenantProfile::Reseller(
                tenants.update::<Reseller>(caller, id, patch).await?.into_inner(),
            ),
            TenantLevel::Client => TenantProfile::Client(
                tenants.update::<Client>(caller, id, patch).await?.into_inner(),
            ),
            TenantLevel::Association => TenantProfile::Association(
                tenants.update::<Association>(caller, id, patch).await?.into_inner(),
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::admin::testkit::Kit;

    #[tokio::test]
    async fn profile_joins_own_tenant() {
        let kit = Kit::new().await;
        let profile = kit.profile().fetch(&kit.association_admin()).await.unwrap();
        assert_eq!(profile.user.association_id, Some(kit.association.association_id));
        assert_eq!(
            profile.tenant,
            Some(TenantProfile::Association(kit.association.clone()))
        );

        let root = kit.profile().fetch(&kit.super_admin()).await.unwrap();
        assert!(root.tenant.is_none());
    }

    #[tokio::test]
    async fn own_password_change_is_hashed() {
        let kit = Kit::new().await;
        let updated = kit
            .profile()
            .update(
                &kit.client_admin(),
                OwnProfilePatch {
                    password: Some("new secret".into()),
                    ..OwnProfilePatch::default()
                },
            )
            .await
            .unwrap()
            .into_inner();
        assert!(crate::infrastructure::crypto::verify_password("new secret", &updated.password_hash).unwrap());
    }

    #[tokio::test]
    async fn tenant_update_keeps_email() {
        let kit = Kit::new().await;
        let tenant = kit
            .profile()
            .update_tenant(
                &kit.reseller_admin(),
                ContactPatch {
                    address: Some("2 Side St".into()),
                    ..ContactPatch::default()
                },
            )
            .await
            .unwrap();
        match tenant {
            TenantProfile::Reseller(r) => {
                assert_eq!(r.reseller_address, "2 Side St");
                assert_eq!(r.reseller_email_id, kit.reseller.reseller_email_id);
            }
            other => panic!("unexpected tenant {other:?}"),
        }
    }
}
