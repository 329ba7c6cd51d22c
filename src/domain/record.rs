//! Behaviour shared by every record the admin surfaces manage.

use std::fmt;
use std::hash::Hash;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::repositories::{RecordRepository, RepositoryProvider};
use super::scope::TenantLevel;
use crate::shared::errors::DomainError;

/// Audit columns stamped by the gateway on create and on every write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Audit {
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub modified_by: Option<String>,
    pub modified_at: Option<DateTime<Utc>>,
    /// `false` means soft-deleted.
    pub status: bool,
}

impl Audit {
    pub fn created(by: &str) -> Self {
        Self {
            created_by: by.to_string(),
            created_at: Utc::now(),
            modified_by: None,
            modified_at: None,
            status: true,
        }
    }

    pub fn touch(&mut self, by: &str) {
        self.modified_by = Some(by.to_string());
        self.modified_at = Some(Utc::now());
    }
}

/// Where a record sits in the reseller → client → association chain.
///
/// For chargers this is the assignment chain; for tenant rows it includes the
/// row's own id at its level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ownership {
    pub reseller_id: Option<i32>,
    pub client_id: Option<i32>,
    pub association_id: Option<i32>,
}

impl Ownership {
    pub fn id_at(&self, level: TenantLevel) -> Option<i32> {
        match level {
            TenantLevel::Reseller => self.reseller_id,
            TenantLevel::Client => self.client_id,
            TenantLevel::Association => self.association_id,
        }
    }

    /// Keeps the ids at `level` and above, clearing everything below it.
    pub fn truncated(self, level: Option<TenantLevel>) -> Self {
        match level {
            None => Self::default(),
            Some(TenantLevel::Reseller) => Self {
                reseller_id: self.reseller_id,
                ..Self::default()
            },
            Some(TenantLevel::Client) => Self {
                association_id: None,
                ..self
            },
            Some(TenantLevel::Association) => self,
        }
    }

    /// True when every id from the reseller down to `level` is present.
    pub fn covers(&self, level: TenantLevel) -> bool {
        TenantLevel::ALL
            .iter()
            .take_while(|l| **l <= level)
            .all(|l| self.id_at(*l).is_some())
    }
}

/// Primary key of a record.
pub trait RecordId: Clone + Eq + Ord + Hash + fmt::Display + Send + Sync + 'static {
    /// The numeric value when ids are allocated from a sequence.
    fn sequence(&self) -> Option<i32>;
}

impl RecordId for i32 {
    fn sequence(&self) -> Option<i32> {
        Some(*self)
    }
}

impl RecordId for String {
    fn sequence(&self) -> Option<i32> {
        None
    }
}

/// A record stored in one collection and managed by the scoped gateway.
pub trait Record: Clone + PartialEq + Send + Sync + 'static {
    type Id: RecordId;

    /// Collection name used in errors, logs and sequence lanes.
    const ENTITY: &'static str;
    const ID_FIELD: &'static str;

    fn id(&self) -> &Self::Id;
    fn ownership(&self) -> Ownership;
    fn audit(&self) -> &Audit;
    fn audit_mut(&mut self) -> &mut Audit;

    /// Business-unique key of a stored record, if the collection has one.
    fn natural_key(&self) -> Option<String> {
        None
    }

    /// Second unique key, held alongside the natural key.
    fn alternate_key(&self) -> Option<String> {
        None
    }

    fn is_active(&self) -> bool {
        self.audit().status
    }

    fn repository(repos: &dyn RepositoryProvider) -> &dyn RecordRepository<Self>;

    fn not_found(id: &Self::Id) -> DomainError {
        DomainError::not_found(Self::ENTITY, Self::ID_FIELD, id)
    }
}

/// Creation payload for a record, validated before any write.
pub trait Draft<T: Record>: Send {
    /// Required fields that are absent or blank.
    fn missing_fields(&self) -> Vec<&'static str>;

    /// Business-unique key checked for conflicts before an id is allocated.
    fn natural_key(&self) -> Option<String>;

    fn alternate_key(&self) -> Option<String> {
        None
    }

    fn into_record(self, id: T::Id, owner: Ownership, audit: Audit) -> T;
}

/// Outcome of an update that matched a row.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome<T> {
    Modified(T),
    /// The payload equalled the stored values; only audit fields moved.
    NoOp(T),
}

impl<T> UpdateOutcome<T> {
    pub fn into_inner(self) -> T {
        match self {
            Self::Modified(r) | Self::NoOp(r) => r,
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, Self::NoOp(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> Ownership {
        Ownership {
            reseller_id: Some(7),
            client_id: Some(3),
            association_id: Some(11),
        }
    }

    #[test]
    fn truncation_clears_lower_levels() {
        let client_level = chain().truncated(Some(TenantLevel::Client));
        assert_eq!(client_level.client_id, Some(3));
        assert_eq!(client_level.association_id, None);

        let reseller_level = chain().truncated(Some(TenantLevel::Reseller));
        assert_eq!(reseller_level.reseller_id, Some(7));
        assert_eq!(reseller_level.client_id, None);

        assert_eq!(chain().truncated(None), Ownership::default());
    }

    #[test]
    fn covers_requires_every_ancestor() {
        let partial = Ownership {
            reseller_id: None,
            client_id: Some(3),
            association_id: None,
        };
        assert!(!partial.covers(TenantLevel::Client));
        assert!(chain().covers(TenantLevel::Association));
    }

    #[test]
    fn touch_stamps_modifier() {
        let mut audit = Audit::created("root");
        assert!(audit.status);
        assert!(audit.modified_at.is_none());

        audit.touch("ops");
        assert_eq!(audit.modified_by.as_deref(), Some("ops"));
        assert!(audit.modified_at.is_some());
    }
}
