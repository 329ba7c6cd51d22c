//! Hierarchy resolver
//!
//! Turns an authenticated role plus its scope ids into the [`ScopeFilter`]
//! every read and write is constrained by. Pure: no I/O happens here.

use serde::{Deserialize, Serialize};

use super::level::{AdminRole, TenantLevel};
use crate::domain::record::Ownership;
use crate::shared::errors::DomainError;

/// Visibility predicate for one caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeFilter {
    /// Super-admin: every row.
    Global,
    /// Rows whose id at `level` equals `id`.
    Tenant { level: TenantLevel, id: i32 },
}

/// Charger listings relative to the caller's own level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChargerView {
    #[default]
    All,
    /// Handed down to the next level.
    Allocated,
    /// Held at the caller's level, not yet handed down.
    Unallocated,
}

impl ScopeFilter {
    pub fn reseller(id: i32) -> Self {
        Self::Tenant {
            level: TenantLevel::Reseller,
            id,
        }
    }

    pub fn client(id: i32) -> Self {
        Self::Tenant {
            level: TenantLevel::Client,
            id,
        }
    }

    pub fn association(id: i32) -> Self {
        Self::Tenant {
            level: TenantLevel::Association,
            id,
        }
    }

    pub fn level(&self) -> Option<TenantLevel> {
        match self {
            Self::Global => None,
            Self::Tenant { level, .. } => Some(*level),
        }
    }

    pub fn tenant_id(&self) -> Option<i32> {
        match self {
            Self::Global => None,
            Self::Tenant { id, .. } => Some(*id),
        }
    }

    /// The level a caller with this scope hands chargers and users down to.
    pub fn next_level(&self) -> Option<TenantLevel> {
        match self {
            Self::Global => Some(TenantLevel::Reseller),
            Self::Tenant { level, .. } => level.child(),
        }
    }

    pub fn permits(&self, owner: &Ownership) -> bool {
        match self {
            Self::Global => true,
            Self::Tenant { level, id } => owner.id_at(*level) == Some(*id),
        }
    }

    /// Charger predicate for the given view. Uses an explicit "is assigned"
    /// check on the next level's field.
    pub fn admits_charger(&self, chain: &Ownership, view: ChargerView) -> bool {
        if !self.permits(chain) {
            return false;
        }
        match (view, self.next_level()) {
            (ChargerView::All, _) => true,
            (ChargerView::Allocated, Some(next)) => chain.id_at(next).is_some(),
            (ChargerView::Allocated, None) => true,
            (ChargerView::Unallocated, Some(next)) => chain.id_at(next).is_none(),
            (ChargerView::Unallocated, None) => false,
        }
    }
}

/// Maps a role and the user's scope ids to the filter for every query made
/// on the user's behalf.
///
/// Fails with `ScopeNotFound` when the role requires a scope id the user does
/// not carry, and with `Forbidden` for roles that have no admin surface.
pub fn resolve_scope(role: AdminRole, ids: &Ownership) -> Result<ScopeFilter, DomainError> {
    if role == AdminRole::EndUser {
        return Err(DomainError::Forbidden(
            "end users have no administrative scope".into(),
        ));
    }
    let Some(level) = role.level() else {
        return Ok(ScopeFilter::Global);
    };
    ids.id_at(level)
        .map(|id| ScopeFilter::Tenant { level, id })
        .ok_or(DomainError::ScopeNotFound {
            level: level.as_str(),
            id: "null".into(),
        })
}
