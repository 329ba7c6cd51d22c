//! Repository traits for the domain layer
//!
//! Contains:
//! - `RecordRepository<T>`: one scoped collection of records
//! - `SessionRepository`: read-only device sessions
//! - `RepositoryProvider`: unified access to all of the above
//! - `DomainResult`: standard result type for domain operations

use async_trait::async_trait;

use super::charger::Charger;
use super::finance::FinanceDetail;
use super::record::Record;
use super::role::Role;
use super::scope::ScopeFilter;
use super::session::DeviceSession;
use super::tenant::{Association, Client, Reseller};
use super::user::User;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Storage for one collection.
///
/// Implementations apply `ScopeFilter` against the record's ownership chain
/// and report how many rows a write matched; they never decide visibility
/// or validity on their own.
#[async_trait]
pub trait RecordRepository<T: Record>: Send + Sync {
    /// Every row the scope admits, ordered by id.
    async fn find_scoped(&self, scope: &ScopeFilter) -> DomainResult<Vec<T>>;

    async fn find_by_id(&self, id: &T::Id) -> DomainResult<Option<T>>;

    /// Rows for the ids that exist. Missing ids are silently skipped.
    async fn find_by_ids(&self, ids: &[T::Id]) -> DomainResult<Vec<T>>;

    async fn find_by_natural_key(&self, key: &str) -> DomainResult<Option<T>>;

    async fn find_by_alternate_key(&self, key: &str) -> DomainResult<Option<T>>;

    /// Highest allocated id; `None` for an empty collection.
    async fn max_id(&self) -> DomainResult<Option<i32>>;

    /// Fails with `Conflict` if the id or either unique key is taken.
    async fn insert(&self, record: &T) -> DomainResult<()>;

    /// Overwrites the stored row with the same id. Returns rows matched.
    /// Fails with `Conflict` if the new alternate key belongs to another row.
    async fn replace(&self, record: &T) -> DomainResult<u64>;

    /// Overwrites several rows atomically. Returns rows matched.
    async fn replace_many(&self, records: &[T]) -> DomainResult<u64>;
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn find_by_chargers(&self, charger_ids: &[String]) -> DomainResult<Vec<DeviceSession>>;
}

// ── RepositoryProvider ──────────────────────────────────────────

/// Provides access to all domain repositories.
///
/// Constructed once at startup and shared behind an `Arc`:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let client = repos.clients().find_by_id(&3).await?;
///     let sessions = repos.sessions().find_by_chargers(&ids).await?;
/// }
/// ```
#[async_trait]
pub trait RepositoryProvider: Send + Sync {
    fn roles(&self) -> &dyn RecordRepository<Role>;
    fn users(&self) -> &dyn RecordRepository<User>;
    fn resellers(&self) -> &dyn RecordRepository<Reseller>;
    fn clients(&self) -> &dyn RecordRepository<Client>;
    fn associations(&self) -> &dyn RecordRepository<Association>;
    fn chargers(&self) -> &dyn RecordRepository<Charger>;
    fn finance(&self) -> &dyn RecordRepository<FinanceDetail>;
    fn sessions(&self) -> &dyn SessionRepository;

    /// Round-trip to the store, used by the health check.
    async fn ping(&self) -> DomainResult<()>;
}
