//! Reseller, client and association management

use crate::application::gateway::ScopedGateway;
use crate::domain::{
    Association, Caller, ContactPatch, Draft, DomainError, DomainResult, NewTenant, Ownership,
    Record, Tenant, UpdateOutcome,
};

#[derive(Clone)]
pub struct TenantAdminService {
    gateway: ScopedGateway,
}

impl TenantAdminService {
    pub fn new(gateway: ScopedGateway) -> Self {
        Self { gateway }
    }

    pub async fn list<T: Tenant>(&self, caller: &Caller, active_only: bool) -> DomainResult<Vec<T>> {
        self.gateway
            .list::<T, _>(&caller.scope, active_only, |_| true)
            .await
    }

    pub async fn get<T: Tenant>(&self, caller: &Caller, id: i32) -> DomainResult<T> {
        self.gateway.get::<T>(&id, &caller.scope).await
    }

    /// Creates a tenant node below the caller.
    ///
    /// Nodes one level down hang off the caller's own node. Deeper nodes need
    /// `parent_id`, which must name a visible node of the parent level.
    pub async fn create<T>(
        &self,
        caller: &Caller,
        draft: NewTenant,
        parent_id: Option<i32>,
    ) -> DomainResult<T>
    where
        T: Tenant,
        NewTenant: Draft<T>,
    {
        let owner = self.parent_chain(caller, T::LEVEL, parent_id).await?;
        self.gateway
            .create::<T, _>(draft, owner, &caller.scope, caller.actor())
            .await
    }

    async fn parent_chain(
        &self,
        caller: &Caller,
        level: crate::domain::TenantLevel,
        parent_id: Option<i32>,
    ) -> DomainResult<Ownership> {
        if caller.scope.next_level() == Some(level) {
            return Ok(caller.ownership);
        }
        let below_caller = caller.scope.level().map_or(true, |own| level > own);
        match (level.parent(), below_caller) {
            (Some(parent), true) => {
                let id = parent_id.ok_or(DomainError::MissingFields(vec![parent.id_field()]))?;
                self.gateway.node_ownership(parent, id, &caller.scope).await
            }
            _ => Err(DomainError::Forbidden(format!(
                "{} admins cannot create a {}",
                caller.role, level
            ))),
        }
    }

    /// Name, phone and address only. Email and parent links never change.
    pub async fn update<T: Tenant>(
        &self,
        caller: &Caller,
        id: i32,
        patch: ContactPatch,
    ) -> DomainResult<UpdateOutcome<T>> {
        let blank = [&patch.name, &patch.phone_no, &patch.address]
            .into_iter()
            .flatten()
            .any(|v| v.trim().is_empty());
        if blank {
            return Err(DomainError::Validation("contact fields must not be blank".into()));
        }
        self.gateway
            .update::<T, _>(&id, &caller.scope, caller.actor(), move |row| {
                row.apply_contact(&patch);
                Ok(())
            })
            .await
    }

    /// Soft-delete or restore a node below the caller. A caller cannot
    /// deactivate the node it is scoped to.
    pub async fn set_active<T: Tenant>(
        &self,
        caller: &Caller,
        id: i32,
        active: bool,
    ) -> DomainResult<UpdateOutcome<T>> {
        if caller.scope.level() == Some(T::LEVEL) {
            return Err(DomainError::Forbidden(format!("cannot change status of own {}", T::LEVEL)));
        }
        self.gateway
            .set_active::<T>(&id, active, &caller.scope, caller.actor())
            .await
    }

    /// Associations under one client the caller can see.
    pub async fn associations_of_client(
        &self,
        caller: &Caller,
        client_id: i32,
        active_only: bool,
    ) -> DomainResult<Vec<Association>> {
        let client = self
            .gateway
            .get::<crate::domain::Client>(&client_id, &caller.scope)
            .await?;
        let client_id = *client.id();
        self.gateway
            .list::<Association, _>(&caller.scope, active_only, move |a| a.client_id == client_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::admin::testkit::{contact, Kit};
    use crate::domain::{ChargerView, Client, Reseller, ScopeFilter};

    #[tokio::test]
    async fn reseller_creates_client_under_itself() {
        let kit = Kit::new().await;
        let client: Client = kit
            .tenants()
            .create(&kit.reseller_admin(), contact("Nova"), None)
            .await
            .unwrap();
        assert_eq!(client.reseller_id, kit.reseller.reseller_id);
        assert_eq!(client.client_id, kit.other_client.client_id + 1);
    }

    #[tokio::test]
    async fn association_copies_reseller_from_client() {
        let kit = Kit::new().await;
        let assoc: Association = kit
            .tenants()
            .create(&kit.super_admin(), contact("Dock"), Some(kit.other_client.client_id))
            .await
            .unwrap();
        assert_eq!(assoc.client_id, kit.other_client.client_id);
        assert_eq!(assoc.reseller_id, kit.other_client.reseller_id);
    }

    #[tokio::test]
    async fn client_admin_cannot_create_clients() {
        let kit = Kit::new().await;
        let err = kit
            .tenants()
            .create::<Client>(&kit.client_admin(), contact("Nova"), Some(kit.reseller.reseller_id))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn acme_scenario_end_to_end() {
        let kit = Kit::new().await;
        let svc = kit.tenants();

        let acme: Client = svc
            .create(&kit.reseller_admin(), contact("Acme North"), None)
            .await
            .unwrap();
        let acme_admin = kit.caller_for_client(&acme);

        let before: Vec<Association> = svc.list(&acme_admin, false).await.unwrap();
        assert!(before.is_empty());

        let hub: Association = svc
            .create(&kit.reseller_admin(), contact("North Hub"), Some(acme.client_id))
            .await
            .unwrap();

        let after: Vec<Association> = svc.list(&acme_admin, false).await.unwrap();
        assert_eq!(after, vec![hub.clone()]);

        let south: Association = svc
            .create(&acme_admin, contact("South Hub"), None)
            .await
            .unwrap();
        let chargers = kit.chargers();
        let cp = vec![kit.add_charger("CP-NORTH").await.charger_id];
        chargers
            .assign(&kit.super_admin(), &cp, kit.reseller.reseller_id, None)
            .await
            .unwrap();
        chargers
            .assign(&kit.reseller_admin(), &cp, acme.client_id, Some(2.0))
            .await
            .unwrap();
        chargers
            .assign(&acme_admin, &cp, south.association_id, Some(1.0))
            .await
            .unwrap();

        let south_admin = kit.caller_for_association(&south);
        let theirs = chargers.list(&south_admin, ChargerView::All, false).await.unwrap();
        assert_eq!(theirs.len(), 1);

        let hub_admin = kit.caller_for_association(&hub);
        let visible = chargers.list(&hub_admin, ChargerView::All, false).await.unwrap();
        assert!(visible.is_empty());
        let err = chargers.get(&hub_admin, "CP-NORTH").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn lists_are_isolated_between_resellers() {
        let kit = Kit::new().await;
        let theirs = kit.caller_for_reseller(&kit.other_reseller);

        let mine: Vec<Client> = kit.tenants().list(&kit.reseller_admin(), false).await.unwrap();
        let other: Vec<Client> = kit.tenants().list(&theirs, false).await.unwrap();
        assert!(mine.iter().all(|c| c.reseller_id == kit.reseller.reseller_id));
        assert_eq!(other, vec![kit.other_client.clone()]);

        let err = kit
            .tenants()
            .get::<Client>(&theirs, kit.client.client_id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn contact_update_keeps_email_and_noop_is_success() {
        let kit = Kit::new().await;
        let svc = kit.tenants();
        let patch = ContactPatch {
            name: Some(kit.client.client_name.clone()),
            ..ContactPatch::default()
        };
        let outcome = svc
            .update::<Client>(&kit.client_admin(), kit.client.client_id, patch)
            .await
            .unwrap();
        assert!(outcome.is_noop());
        assert_eq!(outcome.into_inner().client_email_id, kit.client.client_email_id);
    }

    #[tokio::test]
    async fn cannot_deactivate_own_node() {
        let kit = Kit::new().await;
        let err = kit
            .tenants()
            .set_active::<Reseller>(&kit.reseller_admin(), kit.reseller.reseller_id, false)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn associations_of_foreign_client_are_hidden() {
        let kit = Kit::new().await;
        let err = kit
            .tenants()
            .associations_of_client(&kit.reseller_admin(), kit.other_client.client_id, false)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));

        let own = kit
            .tenants()
            .associations_of_client(&kit.reseller_admin(), kit.client.client_id, false)
            .await
            .unwrap();
        assert_eq!(own.len(), 2);
        assert!(ScopeFilter::client(kit.client.client_id).permits(&own[0].ownership()));
    }
}
