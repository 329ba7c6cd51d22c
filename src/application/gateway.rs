//! Scoped CRUD gateway
//!
//! Every admin operation runs through here. Reads are filtered by the
//! caller's [`ScopeFilter`]; rows outside it behave exactly like rows that do
//! not exist. Writes stamp audit fields and report no-op updates as success.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use super::sequence::SequenceAllocator;
use crate::domain::{
    Association, AssignmentTarget, Audit, Charger, Client, Draft, DomainError, DomainResult,
    Ownership, Record, RepositoryProvider, Reseller, ScopeFilter, TenantLevel, UpdateOutcome,
};

/// Outcome of a bulk charger assignment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentResult {
    pub level: TenantLevel,
    pub target_id: i32,
    /// Chargers that moved to the target.
    pub assigned: Vec<String>,
    /// Chargers already held by the target; only commission and date changed.
    pub refreshed: Vec<String>,
}

#[derive(Clone)]
pub struct ScopedGateway {
    repos: Arc<dyn RepositoryProvider>,
    sequences: Arc<SequenceAllocator>,
}

impl ScopedGateway {
    pub fn new(repos: Arc<dyn RepositoryProvider>, sequences: Arc<SequenceAllocator>) -> Self {
        Self { repos, sequences }
    }

    pub fn repos(&self) -> &dyn RepositoryProvider {
        self.repos.as_ref()
    }

    // ── Reads ───────────────────────────────────────────────────

    /// Rows visible to `scope`, optionally only active ones, narrowed by `extra`.
    pub async fn list<T, F>(&self, scope: &ScopeFilter, active_only: bool, extra: F) -> DomainResult<Vec<T>>
    where
        T: Record,
        F: Fn(&T) -> bool + Send,
    {
        let rows = T::repository(self.repos()).find_scoped(scope).await?;
        Ok(rows
            .into_iter()
            .filter(|r| !active_only || r.is_active())
            .filter(|r| extra(r))
            .collect())
    }

    /// One row by id. Inactive rows are returned; out-of-scope rows are not.
    pub async fn get<T: Record>(&self, id: &T::Id, scope: &ScopeFilter) -> DomainResult<T> {
        T::repository(self.repos())
            .find_by_id(id)
            .await?
            .filter(|r| scope.permits(&r.ownership()))
            .ok_or_else(|| T::not_found(id))
    }

    /// Ownership chain of a tenant node the caller can see.
    pub async fn node_ownership(
        &self,
        level: TenantLevel,
        id: i32,
        scope: &ScopeFilter,
    ) -> DomainResult<Ownership> {
        Ok(match level {
            TenantLevel::Reseller => self.get::<Reseller>(&id, scope).await?.ownership(),
            TenantLevel::Client => self.get::<Client>(&id, scope).await?.ownership(),
            TenantLevel::Association => self.get::<Association>(&id, scope).await?.ownership(),
        })
    }

    // ── Creates ─────────────────────────────────────────────────

    /// Inserts a record with the next sequential id.
    ///
    /// `owner` is the parent chain the record is created under and must lie
    /// inside `scope`. A natural-key conflict is reported before an id is
    /// allocated, so it never burns one.
    pub async fn create<T, D>(
        &self,
        draft: D,
        owner: Ownership,
        scope: &ScopeFilter,
        actor: &str,
    ) -> DomainResult<T>
    where
        T: Record<Id = i32>,
        D: Draft<T>,
    {
        Self::check_draft(&draft, &owner, scope)?;
        let repo = T::repository(self.repos());

        let lane = self.sequences.lane(T::ENTITY).await;
        if let Some(key) = draft.natural_key() {
            if repo.find_by_natural_key(&key).await?.is_some() {
                return Err(DomainError::Conflict(format!("{} {} already exists", T::ENTITY, key)));
            }
        }
        if let Some(key) = draft.alternate_key() {
            if repo.find_by_alternate_key(&key).await?.is_some() {
                return Err(DomainError::Conflict(format!("{} {} already exists", T::ENTITY, key)));
            }
        }
        let id = self.sequences.next_id(repo, &lane).await?;
        let record = draft.into_record(id, owner, Audit::created(actor));
        repo.insert(&record).await?;
        drop(lane);

        info!(entity = T::ENTITY, id, by = %actor, "record created");
        Ok(record)
    }

    /// Inserts a record whose id is supplied by the caller.
    pub async fn create_keyed<T, D>(
        &self,
        draft: D,
        id: T::Id,
        owner: Ownership,
        scope: &ScopeFilter,
        actor: &str,
    ) -> DomainResult<T>
    where
        T: Record,
        D: Draft<T>,
    {
        Self::check_draft(&draft, &owner, scope)?;
        let repo = T::repository(self.repos());

        let _lane = self.sequences.lane(T::ENTITY).await;
        if repo.find_by_id(&id).await?.is_some() {
            return Err(DomainError::Conflict(format!(
                "{} {}={} already exists",
                T::ENTITY,
                T::ID_FIELD,
                id
            )));
        }
        let record = draft.into_record(id, owner, Audit::created(actor));
        repo.insert(&record).await?;

        info!(entity = T::ENTITY, id = %record.id(), by = %actor, "record created");
        Ok(record)
    }

    fn check_draft<T: Record, D: Draft<T>>(
        draft: &D,
        owner: &Ownership,
        scope: &ScopeFilter,
    ) -> DomainResult<()> {
        let missing = draft.missing_fields();
        if !missing.is_empty() {
            return Err(DomainError::MissingFields(missing));
        }
        if !scope.permits(owner) {
            return Err(DomainError::Forbidden(format!(
                "cannot create {} outside own scope",
                T::ENTITY
            )));
        }
        Ok(())
    }

    // ── Updates ─────────────────────────────────────────────────

    /// Applies `patch` to a row in scope.
    ///
    /// A patch that leaves every field unchanged is a [`UpdateOutcome::NoOp`];
    /// the audit stamp is still written. Zero matched rows is `NotFound`.
    pub async fn update<T, F>(
        &self,
        id: &T::Id,
        scope: &ScopeFilter,
        actor: &str,
        patch: F,
    ) -> DomainResult<UpdateOutcome<T>>
    where
        T: Record,
        F: FnOnce(&mut T) -> DomainResult<()> + Send,
    {
        let current = self.get::<T>(id, scope).await?;
        let mut next = current.clone();
        patch(&mut next)?;

        if next.ownership() != current.ownership() && !scope.permits(&next.ownership()) {
            return Err(DomainError::Forbidden(format!(
                "cannot move {} outside own scope",
                T::ENTITY
            )));
        }

        let repo = T::repository(self.repos());
        let renamed = next.alternate_key().filter(|k| Some(k) != current.alternate_key().as_ref());
        if let Some(key) = renamed {
            if repo.find_by_alternate_key(&key).await?.is_some_and(|other| other.id() != id) {
                return Err(DomainError::Conflict(format!("{} {} already exists", T::ENTITY, key)));
            }
        }

        let unchanged = next == current;
        next.audit_mut().touch(actor);

        let matched = repo.replace(&next).await?;
        if matched == 0 {
            return Err(T::not_found(id));
        }

        if unchanged {
            debug!(entity = T::ENTITY, id = %id, by = %actor, "update matched but changed nothing");
            Ok(UpdateOutcome::NoOp(next))
        } else {
            info!(entity = T::ENTITY, id = %id, by = %actor, "record updated");
            Ok(UpdateOutcome::Modified(next))
        }
    }

    /// Soft-delete or restore.
    pub async fn set_active<T: Record>(
        &self,
        id: &T::Id,
        active: bool,
        scope: &ScopeFilter,
        actor: &str,
    ) -> DomainResult<UpdateOutcome<T>> {
        let outcome = self
            .update::<T, _>(id, scope, actor, |row| {
                row.audit_mut().status = active;
                Ok(())
            })
            .await?;
        info!(entity = T::ENTITY, id = %id, active, by = %actor, "status set");
        Ok(outcome)
    }

    // ── Charger assignment ──────────────────────────────────────

    /// Hands chargers down one level, to `target`.
    ///
    /// Every charger must exist and be held inside `scope`; otherwise nothing
    /// is written and the unknown ids are reported together.
    pub async fn assign_chargers(
        &self,
        charger_ids: &[String],
        target: AssignmentTarget,
        commission: Option<f64>,
        scope: &ScopeFilter,
        actor: &str,
    ) -> DomainResult<AssignmentResult> {
        let mut seen = HashSet::new();
        let ids: Vec<String> = charger_ids
            .iter()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty() && seen.insert(id.clone()))
            .collect();
        if ids.is_empty() {
            return Err(DomainError::MissingFields(vec!["charger_id"]));
        }
        if scope.next_level() != Some(target.level()) {
            return Err(DomainError::Forbidden(format!(
                "chargers can only be assigned to the {} level",
                scope
                    .next_level()
                    .map_or("next", |l| l.as_str())
            )));
        }
        let target_chain = target.chain();
        let target_id = target_chain.id_at(target.level()).unwrap_or_default();
        if !scope.permits(&target_chain) {
            return Err(DomainError::not_found(
                target.level().as_str(),
                target.level().id_field(),
                target_id,
            ));
        }

        let repo = self.repos().chargers();
        let mut rows: Vec<Charger> = repo
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .filter(|c| scope.permits(&c.chain()))
            .collect();

        let found: HashSet<&str> = rows.iter().map(|c| c.charger_id.as_str()).collect();
        let missing: Vec<String> = ids
            .iter()
            .filter(|id| !found.contains(id.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(DomainError::PartialNotFound {
                entity: Charger::ENTITY,
                missing,
            });
        }

        let now = Utc::now();
        let mut assigned = Vec::new();
        let mut refreshed = Vec::new();
        for charger in rows.iter_mut() {
            let already_there = charger.chain().truncated(Some(target.level())) == target_chain;
            charger.assign(target, commission, now);
            charger.audit.touch(actor);
            if already_there {
                refreshed.push(charger.charger_id.clone());
            } else {
                assigned.push(charger.charger_id.clone());
            }
        }

        let matched = repo.replace_many(&rows).await?;
        if matched != rows.len() as u64 {
            return Err(DomainError::Storage(format!(
                "assignment matched {matched} of {} chargers",
                rows.len()
            )));
        }

        info!(
            level = %target.level(),
            target_id,
            assigned = assigned.len(),
            refreshed = refreshed.len(),
            by = %actor,
            "chargers assigned"
        );
        Ok(AssignmentResult {
            level: target.level(),
            target_id,
            assigned,
            refreshed,
        })
    }
}
