//! Tariff rows. Clients manage them for their associations; associations
//! read their own.

use crate::application::gateway::ScopedGateway;
use crate::domain::{
    Caller, DomainError, DomainResult, FinanceDetail, FinancePatch, NewFinance, TenantLevel,
    UpdateOutcome,
};

#[derive(Clone)]
pub struct FinanceAdminService {
    gateway: ScopedGateway,
}

impl FinanceAdminService {
    pub fn new(gateway: ScopedGateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self, caller: &Caller, active_only: bool) -> DomainResult<Vec<FinanceDetail>> {
        self.gateway
            .list::<FinanceDetail, _>(&caller.scope, active_only, |_| true)
            .await
    }

    pub async fn create(&self, caller: &Caller, draft: NewFinance) -> DomainResult<FinanceDetail> {
        ensure_client(caller)?;
        if draft.association_id <= 0 {
            return Err(DomainError::MissingFields(vec!["association_id"]));
        }
        let owner = self
            .gateway
            .node_ownership(TenantLevel::Association, draft.association_id, &caller.scope)
            .await?;
        self.gateway
            .create(draft, owner, &caller.scope, caller.actor())
            .await
    }

    pub async fn update(
        &self,
        caller: &Caller,
        finance_id: i32,
        patch: FinancePatch,
    ) -> DomainResult<UpdateOutcome<FinanceDetail>> {
        ensure_client(caller)?;
        if !patch.is_valid() {
            return Err(DomainError::Validation("rates must be non-negative numbers".into()));
        }
        self.gateway
            .update::<FinanceDetail, _>(&finance_id, &caller.scope, caller.actor(), move |row| {
                patch.apply(row);
                Ok(())
            })
            .await
    }

    pub async fn set_active(
        &self,
        caller: &Caller,
        finance_id: i32,
        active: bool,
    ) -> DomainResult<UpdateOutcome<FinanceDetail>> {
        ensure_client(caller)?;
        self.gateway
            .set_active::<FinanceDetail>(&finance_id, active, &caller.scope, caller.actor())
            .await
    }
}

fn ensure_client(caller: &Caller) -> DomainResult<()> {
    if caller.scope.level() == Some(TenantLevel::Client) {
        Ok(())
    } else {
        Err(DomainError::Forbidden("finance details are managed by client admins".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::admin::testkit::{rates, Kit};

    #[tokio::test]
    async fn client_creates_for_own_association_only() {
        let kit = Kit::new().await;
        let svc = kit.finance();

        let row = svc
            .create(
                &kit.client_admin(),
                NewFinance {
                    association_id: kit.association.association_id,
                    rates: rates(),
                },
            )
            .await
            .unwrap();
        assert_eq!(row.reseller_id, kit.reseller.reseller_id);
        assert_eq!(row.client_id, kit.client.client_id);

        let foreign = kit.caller_for_client(&kit.other_client);
        let err = svc
            .create(
                &foreign,
                NewFinance {
                    association_id: kit.association.association_id,
                    rates: rates(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "association", .. }));
    }

    #[tokio::test]
    async fn association_reads_but_cannot_write() {
        let kit = Kit::new().await;
        let svc = kit.finance();
        let own = kit.add_finance(kit.association.association_id).await;
        kit.add_finance(kit.other_association.association_id).await;

        let seen = svc.list(&kit.association_admin(), false).await.unwrap();
        assert_eq!(seen, vec![own.clone()]);

        let err = svc
            .set_active(&kit.association_admin(), own.finance_id, false)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn negative_rates_are_rejected() {
        let kit = Kit::new().await;
        let own = kit.add_finance(kit.association.association_id).await;
        let err = kit
            .finance()
            .update(
                &kit.client_admin(),
                own.finance_id,
                FinancePatch {
                    gst: Some(-5.0),
                    ..FinancePatch::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
