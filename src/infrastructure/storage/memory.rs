//! In-memory storage implementation

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::{
    AdminRole, Association, Audit, Charger, Client, DeviceSession, DomainError, DomainResult,
    FinanceDetail, Record, RecordId, RecordRepository, RepositoryProvider, Reseller, Role,
    ScopeFilter, SessionRepository, User,
};

/// One collection keyed by id, with unique indexes on the natural and
/// alternate keys.
pub struct MemoryCollection<T: Record> {
    rows: DashMap<T::Id, T>,
    keys: DashMap<String, T::Id>,
    alternates: DashMap<String, T::Id>,
}

impl<T: Record> MemoryCollection<T> {
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
            keys: DashMap::new(),
            alternates: DashMap::new(),
        }
    }

    fn sorted(mut rows: Vec<T>) -> Vec<T> {
        rows.sort_by(|a, b| a.id().cmp(b.id()));
        rows
    }

    fn lookup(&self, index: &DashMap<String, T::Id>, key: &str) -> Option<T> {
        let id = index.get(key).map(|id| id.clone())?;
        self.rows.get(&id).map(|r| r.clone())
    }

    /// Reserves `key` for `id`; a key already held by `id` is fine.
    fn claim(index: &DashMap<String, T::Id>, key: &str, id: &T::Id) -> DomainResult<()> {
        match index.entry(key.to_string()) {
            Entry::Occupied(slot) if slot.get() != id => {
                Err(DomainError::Conflict(format!("{} {} already exists", T::ENTITY, key)))
            }
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(slot) => {
                slot.insert(id.clone());
                Ok(())
            }
        }
    }
}

impl<T: Record> Default for MemoryCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> RecordRepository<T> for MemoryCollection<T> {
    async fn find_scoped(&self, scope: &ScopeFilter) -> DomainResult<Vec<T>> {
        let rows = self
            .rows
            .iter()
            .filter(|e| scope.permits(&e.value().ownership()))
            .map(|e| e.value().clone())
            .collect();
        Ok(Self::sorted(rows))
    }

    async fn find_by_id(&self, id: &T::Id) -> DomainResult<Option<T>> {
        Ok(self.rows.get(id).map(|r| r.clone()))
    }

    async fn find_by_ids(&self, ids: &[T::Id]) -> DomainResult<Vec<T>> {
        let rows = ids
            .iter()
            .filter_map(|id| self.rows.get(id).map(|r| r.clone()))
            .collect();
        Ok(Self::sorted(rows))
    }

    async fn find_by_natural_key(&self, key: &str) -> DomainResult<Option<T>> {
        Ok(self.lookup(&self.keys, key))
    }

    async fn find_by_alternate_key(&self, key: &str) -> DomainResult<Option<T>> {
        Ok(self.lookup(&self.alternates, key))
    }

    async fn max_id(&self) -> DomainResult<Option<i32>> {
        Ok(self.rows.iter().filter_map(|e| e.key().sequence()).max())
    }

    async fn insert(&self, record: &T) -> DomainResult<()> {
        let id = record.id().clone();
        if self.rows.contains_key(&id) {
            return Err(DomainError::Conflict(format!(
                "{} {}={} already exists",
                T::ENTITY,
                T::ID_FIELD,
                id
            )));
        }
        let key = record.natural_key();
        let alternate = record.alternate_key();

        if let Some(key) = &key {
            Self::claim(&self.keys, key, &id)?;
        }
        if let Some(alternate) = &alternate {
            if let Err(e) = Self::claim(&self.alternates, alternate, &id) {
                if let Some(key) = &key {
                    self.keys.remove(key);
                }
                return Err(e);
            }
        }

        match self.rows.entry(id.clone()) {
            Entry::Occupied(_) => {
                if let Some(key) = &key {
                    self.keys.remove(key);
                }
                if let Some(alternate) = &alternate {
                    self.alternates.remove(alternate);
                }
                Err(DomainError::Conflict(format!(
                    "{} {}={} already exists",
                    T::ENTITY,
                    T::ID_FIELD,
                    id
                )))
            }
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(())
            }
        }
    }

    async fn replace(&self, record: &T) -> DomainResult<u64> {
        let Some(mut row) = self.rows.get_mut(record.id()) else {
            return Ok(0);
        };
        let before = row.alternate_key();
        let after = record.alternate_key();
        if before != after {
            if let Some(after) = &after {
                Self::claim(&self.alternates, after, record.id())?;
            }
            if let Some(before) = &before {
                self.alternates.remove(before);
            }
        }
        *row = record.clone();
        Ok(1)
    }

    async fn replace_many(&self, records: &[T]) -> DomainResult<u64> {
        if records.iter().any(|r| !self.rows.contains_key(r.id())) {
            return Ok(0);
        }
        for record in records {
            self.rows.insert(record.id().clone(), record.clone());
        }
        Ok(records.len() as u64)
    }
}

/// Device sessions, appended by the charging backend.
#[derive(Default)]
pub struct MemorySessions {
    rows: DashMap<i32, DeviceSession>,
}

impl MemorySessions {
    pub fn record(&self, session: DeviceSession) {
        self.rows.insert(session.session_id, session);
    }
}

#[async_trait]
impl SessionRepository for MemorySessions {
    async fn find_by_chargers(&self, charger_ids: &[String]) -> DomainResult<Vec<DeviceSession>> {
        Ok(self
            .rows
            .iter()
            .filter(|e| charger_ids.contains(&e.value().charger_id))
            .map(|e| e.value().clone())
            .collect())
    }
}

/// In-memory storage for development and testing
pub struct InMemoryRepositoryProvider {
    roles: MemoryCollection<Role>,
    users: MemoryCollection<User>,
    resellers: MemoryCollection<Reseller>,
    clients: MemoryCollection<Client>,
    associations: MemoryCollection<Association>,
    chargers: MemoryCollection<Charger>,
    finance: MemoryCollection<FinanceDetail>,
    sessions: MemorySessions,
}

impl InMemoryRepositoryProvider {
    /// Empty store with the reserved roles seeded.
    pub fn new() -> Self {
        let store = Self {
            roles: MemoryCollection::new(),
            users: MemoryCollection::new(),
            resellers: MemoryCollection::new(),
            clients: MemoryCollection::new(),
            associations: MemoryCollection::new(),
            chargers: MemoryCollection::new(),
            finance: MemoryCollection::new(),
            sessions: MemorySessions::default(),
        };

        for role in AdminRole::ALL {
            let row = Role {
                role_id: role.role_id(),
                role_name: role.name().to_string(),
                audit: Audit::created("system"),
            };
            store.roles.rows.insert(row.role_id, row.clone());
            store.roles.keys.insert(row.role_name, row.role_id);
        }

        store
    }

    pub fn session_log(&self) -> &MemorySessions {
        &self.sessions
    }
}

impl Default for InMemoryRepositoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RepositoryProvider for InMemoryRepositoryProvider {
    fn roles(&self) -> &dyn RecordRepository<Role> {
        &self.roles
    }

    fn users(&self) -> &dyn RecordRepository<User> {
        &self.users
    }

    fn resellers(&self) -> &dyn RecordRepository<Reseller> {
        &self.resellers
    }

    fn clients(&self) -> &dyn RecordRepository<Client> {
        &self.clients
    }

    fn associations(&self) -> &dyn RecordRepository<Association> {
        &self.associations
    }

    fn chargers(&self) -> &dyn RecordRepository<Charger> {
        &self.chargers
    }

    fn finance(&self) -> &dyn RecordRepository<FinanceDetail> {
        &self.finance
    }

    fn sessions(&self) -> &dyn SessionRepository {
        &self.sessions
    }

    async fn ping(&self) -> DomainResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Draft, NewTenant, NewUser, Ownership};

    fn reseller(id: i32, email: &str) -> Reseller {
        NewTenant {
            name: format!("Reseller {id}"),
            phone_no: "555".into(),
            email_id: email.into(),
            address: "street".into(),
        }
        .into_record(id, Ownership::default(), Audit::created("root"))
    }

    #[tokio::test]
    async fn reserved_roles_are_seeded() {
        let store = InMemoryRepositoryProvider::new();
        let roles = store.roles().find_scoped(&ScopeFilter::Global).await.unwrap();
        assert_eq!(roles.len(), 5);
        assert_eq!(store.roles().max_id().await.unwrap(), Some(5));
        let admin = store.roles().find_by_natural_key("clientadmin").await.unwrap();
        assert_eq!(admin.map(|r| r.role_id), Some(3));
    }

    #[tokio::test]
    async fn duplicate_key_is_conflict_and_leaves_no_row() {
        let store = InMemoryRepositoryProvider::new();
        store.resellers().insert(&reseller(1, "a@x.test")).await.unwrap();

        let err = store.resellers().insert(&reseller(2, "a@x.test")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert!(store.resellers().find_by_id(&2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_id_releases_natural_key() {
        let store = InMemoryRepositoryProvider::new();
        store.resellers().insert(&reseller(1, "a@x.test")).await.unwrap();

        let err = store.resellers().insert(&reseller(1, "b@x.test")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert!(store.resellers().find_by_natural_key("b@x.test").await.unwrap().is_none());
    }

    fn user(id: i32, username: &str, email: &str) -> User {
        NewUser {
            role_id: AdminRole::SuperAdmin.role_id(),
            username: username.into(),
            email_id: email.into(),
            password_hash: "hash".into(),
            phone_no: None,
            wallet_balance: None,
        }
        .into_record(id, Ownership::default(), Audit::created("root"))
    }

    #[tokio::test]
    async fn usernames_are_indexed_uniquely() {
        let store = InMemoryRepositoryProvider::new();
        store.users().insert(&user(1, "ops", "ops@x.test")).await.unwrap();

        let err = store.users().insert(&user(2, "ops", "other@x.test")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert!(store.users().find_by_natural_key("other@x.test").await.unwrap().is_none());

        store.users().insert(&user(2, "audit", "audit@x.test")).await.unwrap();
        let mut renamed = user(2, "ops", "audit@x.test");
        let err = store.users().replace(&renamed).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        renamed.username = "auditor".into();
        assert_eq!(store.users().replace(&renamed).await.unwrap(), 1);
        let found = store.users().find_by_alternate_key("auditor").await.unwrap();
        assert_eq!(found.map(|u| u.user_id), Some(2));
        assert!(store.users().find_by_alternate_key("audit").await.unwrap().is_none());
        store.users().insert(&user(3, "audit", "audit3@x.test")).await.unwrap();
    }

    #[tokio::test]
    async fn replace_reports_matched_rows() {
        let store = InMemoryRepositoryProvider::new();
        let row = reseller(1, "a@x.test");
        assert_eq!(store.resellers().replace(&row).await.unwrap(), 0);
        store.resellers().insert(&row).await.unwrap();
        assert_eq!(store.resellers().replace(&row).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn scope_filter_applies_to_chain() {
        let store = InMemoryRepositoryProvider::new();
        store.resellers().insert(&reseller(1, "a@x.test")).await.unwrap();
        store.resellers().insert(&reseller(2, "b@x.test")).await.unwrap();

        let seen = store.resellers().find_scoped(&ScopeFilter::reseller(2)).await.unwrap();
        assert_eq!(seen.iter().map(|r| r.reseller_id).collect::<Vec<_>>(), vec![2]);
    }
}
