//! Charger inventory and hand-down

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::application::gateway::{AssignmentResult, ScopedGateway};
use crate::domain::session::sort_by_stop_time_desc;
use crate::domain::{
    AdminRole, AssignmentTarget, Association, Caller, Charger, ChargerPatch, ChargerView, Client,
    DevicePatch, DeviceSession, DomainError, DomainResult, FinanceDetail, NewCharger, Ownership,
    Record, Reseller, Tenant, TenantLevel, UpdateOutcome,
};

/// A charger handed down by the caller, with the node now holding it.
#[derive(Debug, Clone)]
pub struct AllocatedCharger {
    pub charger: Charger,
    pub assignee_level: TenantLevel,
    pub assignee_id: i32,
    /// `None` when the assignee row is missing.
    pub assignee_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChargerSessions {
    pub charger_id: String,
    pub sessions: Vec<DeviceSession>,
}

#[derive(Clone)]
pub struct ChargerAdminService {
    gateway: ScopedGateway,
}

impl ChargerAdminService {
    pub fn new(gateway: ScopedGateway) -> Self {
        Self { gateway }
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn list(
        &self,
        caller: &Caller,
        view: ChargerView,
        active_only: bool,
    ) -> DomainResult<Vec<Charger>> {
        let scope = caller.scope;
        self.gateway
            .list::<Charger, _>(&scope, active_only, move |c| scope.admits_charger(&c.chain(), view))
            .await
    }

    pub async fn get(&self, caller: &Caller, charger_id: &str) -> DomainResult<Charger> {
        self.gateway
            .get::<Charger>(&charger_id.to_string(), &caller.scope)
            .await
    }

    /// Allocated chargers joined to the name of the node holding them.
    pub async fn allocated(&self, caller: &Caller) -> DomainResult<Vec<AllocatedCharger>> {
        let Some(level) = caller.scope.next_level() else {
            return Err(DomainError::Forbidden(
                "association admins do not hand chargers down".into(),
            ));
        };
        let chargers = self.list(caller, ChargerView::Allocated, false).await?;
        let ids: Vec<i32> = chargers
            .iter()
            .filter_map(|c| c.chain().id_at(level))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let names = self.names_at(level, &ids).await?;

        Ok(chargers
            .into_iter()
            .filter_map(|charger| {
                let assignee_id = charger.chain().id_at(level)?;
                Some(AllocatedCharger {
                    assignee_name: names.get(&assignee_id).cloned(),
                    assignee_level: level,
                    assignee_id,
                    charger,
                })
            })
            .collect())
    }

    async fn names_at(&self, level: TenantLevel, ids: &[i32]) -> DomainResult<HashMap<i32, String>> {
        let repos = self.gateway.repos();
        Ok(match level {
            TenantLevel::Reseller => index_names(repos.resellers().find_by_ids(ids).await?),
            TenantLevel::Client => index_names(repos.clients().find_by_ids(ids).await?),
            TenantLevel::Association => index_names(repos.associations().find_by_ids(ids).await?),
        })
    }

    /// Chargers held by one client, each with its sessions, latest stop first.
    pub async fn sessions_for_client(
        &self,
        caller: &Caller,
        client_id: i32,
    ) -> DomainResult<Vec<ChargerSessions>> {
        let client = self.gateway.get::<Client>(&client_id, &caller.scope).await?;
        let chargers = self
            .gateway
            .list::<Charger, _>(&caller.scope, false, move |c| {
                c.assigned_client_id == Some(client.client_id)
            })
            .await?;
        let ids: Vec<String> = chargers.iter().map(|c| c.charger_id.clone()).collect();

        let mut by_charger: HashMap<String, Vec<DeviceSession>> = HashMap::new();
        for session in self.gateway.repos().sessions().find_by_chargers(&ids).await? {
            by_charger
                .entry(session.charger_id.clone())
                .or_default()
                .push(session);
        }

        Ok(ids
            .into_iter()
            .map(|charger_id| {
                let mut sessions = by_charger.remove(&charger_id).unwrap_or_default();
                sort_by_stop_time_desc(&mut sessions);
                ChargerSessions {
                    charger_id,
                    sessions,
                }
            })
            .collect())
    }

    // ── Commands ────────────────────────────────────────────────

    pub async fn create(&self, caller: &Caller, draft: NewCharger) -> DomainResult<Charger> {
        let id = draft.charger_id.trim().to_string();
        self.gateway
            .create_keyed(draft, id, Ownership::default(), &caller.scope, caller.actor())
            .await
    }

    /// Hardware attributes; platform operator only.
    pub async fn update(
        &self,
        caller: &Caller,
        charger_id: &str,
        patch: ChargerPatch,
    ) -> DomainResult<UpdateOutcome<Charger>> {
        if caller.role != AdminRole::SuperAdmin {
            return Err(DomainError::Forbidden("only the super-admin edits chargers".into()));
        }
        self.gateway
            .update::<Charger, _>(&charger_id.to_string(), &caller.scope, caller.actor(), move |c| {
                patch.apply(c);
                Ok(())
            })
            .await
    }

    /// Site settings; the association operating the charger only.
    pub async fn update_device(
        &self,
        caller: &Caller,
        charger_id: &str,
        patch: DevicePatch,
    ) -> DomainResult<UpdateOutcome<Charger>> {
        if caller.scope.level() != Some(TenantLevel::Association) {
            return Err(DomainError::Forbidden(
                "device settings belong to the operating association".into(),
            ));
        }
        if let Some(finance_id) = patch.finance_id {
            let tariff = self
                .gateway
                .get::<FinanceDetail>(&finance_id, &caller.scope)
                .await
                .map_err(|e| match e {
                    DomainError::NotFound { .. } => DomainError::Validation(format!(
                        "finance_id {finance_id} does not belong to this association"
                    )),
                    other => other,
                })?;
            if !tariff.is_active() {
                return Err(DomainError::Validation(format!("finance_id {finance_id} is inactive")));
            }
        }
        if patch.lat.is_some_and(|v| !(-90.0..=90.0).contains(&v))
            || patch.long.is_some_and(|v| !(-180.0..=180.0).contains(&v))
        {
            return Err(DomainError::Validation("coordinates out of range".into()));
        }

        self.gateway
            .update::<Charger, _>(&charger_id.to_string(), &caller.scope, caller.actor(), move |c| {
                patch.apply(c);
                Ok(())
            })
            .await
    }

    pub async fn set_active(
        &self,
        caller: &Caller,
        charger_id: &str,
        active: bool,
    ) -> DomainResult<UpdateOutcome<Charger>> {
        self.gateway
            .set_active::<Charger>(&charger_id.to_string(), active, &caller.scope, caller.actor())
            .await
    }

    /// Hands chargers to a node one level below the caller.
    ///
    /// Resellers and clients must state the commission they keep.
    pub async fn assign(
        &self,
        caller: &Caller,
        charger_ids: &[String],
        target_id: i32,
        commission: Option<f64>,
    ) -> DomainResult<AssignmentResult> {
        let Some(level) = caller.scope.next_level() else {
            return Err(DomainError::Forbidden(
                "association admins do not hand chargers down".into(),
            ));
        };
        match (level, commission) {
            (TenantLevel::Client, None) => {
                return Err(DomainError::MissingFields(vec!["reseller_commission"]))
            }
            (TenantLevel::Association, None) => {
                return Err(DomainError::MissingFields(vec!["client_commission"]))
            }
            (_, Some(c)) if !c.is_finite() || c < 0.0 => {
                return Err(DomainError::Validation("commission must be non-negative".into()))
            }
            _ => {}
        }

        let chain = self.active_node(caller, level, target_id).await?;
        let target = AssignmentTarget::from_chain(level, &chain).ok_or_else(|| {
            DomainError::Internal(format!("{level} {target_id} has an incomplete parent chain"))
        })?;
        self.gateway
            .assign_chargers(charger_ids, target, commission, &caller.scope, caller.actor())
            .await
    }

    async fn active_node(&self, caller: &Caller, level: TenantLevel, id: i32) -> DomainResult<Ownership> {
        let scope = &caller.scope;
        let (chain, active) = match level {
            TenantLevel::Reseller => node(self.gateway.get::<Reseller>(&id, scope).await?),
            TenantLevel::Client => node(self.gateway.get::<Client>(&id, scope).await?),
            TenantLevel::Association => node(self.gateway.get::<Association>(&id, scope).await?),
        };
        if !active {
            return Err(DomainError::Validation(format!("{level} {id} is inactive")));
        }
        Ok(chain)
    }
}

fn node<T: Tenant>(row: T) -> (Ownership, bool) {
    (row.ownership(), row.is_active())
}

fn index_names<T: Tenant>(rows: Vec<T>) -> HashMap<i32, String> {
    rows.into_iter()
        .map(|t| (*t.id(), t.display_name().to_string()))
        .collect()
}
