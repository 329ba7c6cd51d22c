//! SeaORM implementation of RepositoryProvider

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::domain::{
    Association, Charger, Client, DomainResult, FinanceDetail, RecordRepository,
    RepositoryProvider, Reseller, Role, SessionRepository, User,
};

use super::record_table::{db_err, SeaOrmTable};
use super::session_repository::SeaOrmSessionRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-collection repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let client = repos.clients().find_by_id(&3).await?;
/// let admins = repos.users().find_scoped(&ScopeFilter::client(3)).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    db: DatabaseConnection,
    roles: SeaOrmTable<Role>,
    users: SeaOrmTable<User>,
    resellers: SeaOrmTable<Reseller>,
    clients: SeaOrmTable<Client>,
    associations: SeaOrmTable<Association>,
    chargers: SeaOrmTable<Charger>,
    finance: SeaOrmTable<FinanceDetail>,
    sessions: SeaOrmSessionRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            roles: SeaOrmTable::new(db.clone()),
            users: SeaOrmTable::new(db.clone()),
            resellers: SeaOrmTable::new(db.clone()),
            clients: SeaOrmTable::new(db.clone()),
            associations: SeaOrmTable::new(db.clone()),
            chargers: SeaOrmTable::new(db.clone()),
            finance: SeaOrmTable::new(db.clone()),
            sessions: SeaOrmSessionRepository::new(db.clone()),
            db,
        }
    }
}

#[async_trait]
impl RepositoryProvider for SeaOrmRepositoryProvider {
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
        self.db.ping().await.map_err(db_err)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sea_orm::{ConnectOptions, Database};
    use sea_orm_migration::MigratorTrait;

    use super::*;
    use crate::application::{ScopedGateway, SequenceAllocator};
    use crate::domain::{
        AdminRole, Audit, DomainError, NewTenant, NewUser, Ownership, Record, ScopeFilter,
    };
    use crate::infrastructure::database::migrator::Migrator;

    async fn store() -> Arc<SeaOrmRepositoryProvider> {
        // One connection: every pooled connection would get its own memory db
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opts).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        Arc::new(SeaOrmRepositoryProvider::new(db))
    }

    fn tenant(name: &str) -> NewTenant {
        NewTenant {
            name: name.into(),
            phone_no: "+1 555 0100".into(),
            email_id: format!("{}@tenant.test", name.to_lowercase()),
            address: "1 Main St".into(),
        }
    }

    #[tokio::test]
    async fn migrations_seed_reserved_roles() {
        let repos = store().await;
        repos.ping().await.unwrap();
        assert_eq!(repos.roles().max_id().await.unwrap(), Some(5));
        let role = repos.roles().find_by_natural_key("clientadmin").await.unwrap().unwrap();
        assert_eq!(role.admin_role(), Some(AdminRole::ClientAdmin));
    }

    #[tokio::test]
    async fn scoped_reads_follow_tenant_columns() {
        let repos = store().await;
        let gateway = ScopedGateway::new(repos.clone(), Arc::new(SequenceAllocator::new()));
        let global = ScopeFilter::Global;

        let volt: Reseller = gateway
            .create(tenant("Volt"), Ownership::default(), &global, "root")
            .await
            .unwrap();
        let spark: Reseller = gateway
            .create(tenant("Spark"), Ownership::default(), &global, "root")
            .await
            .unwrap();
        let acme: Client = gateway
            .create(tenant("Acme"), volt.ownership(), &global, "root")
            .await
            .unwrap();
        let _globex: Client = gateway
            .create(tenant("Globex"), spark.ownership(), &global, "root")
            .await
            .unwrap();

        let seen = repos.clients().find_scoped(&ScopeFilter::reseller(volt.reseller_id)).await.unwrap();
        assert_eq!(seen.iter().map(|c| c.client_id).collect::<Vec<_>>(), vec![acme.client_id]);
        let none = repos.resellers().find_scoped(&ScopeFilter::client(acme.client_id)).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let repos = store().await;
        let user = NewUser {
            role_id: AdminRole::SuperAdmin.role_id(),
            username: "root".into(),
            email_id: "root@cms.test".into(),
            password_hash: "$2b$04$hash".into(),
            phone_no: None,
            wallet_balance: None,
        };
        let first = crate::domain::Draft::<User>::into_record(
            user,
            1,
            Ownership::default(),
            Audit::created("root"),
        );
        repos.users().insert(&first).await.unwrap();

        let mut second = first.clone();
        second.user_id = 2;
        second.username = "root-2".into();
        let err = repos.users().insert(&second).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn replace_reports_matched_rows() {
        let repos = store().await;
        let mut role = repos.roles().find_by_id(&5).await.unwrap().unwrap();
        role.audit.status = false;
        assert_eq!(repos.roles().replace(&role).await.unwrap(), 1);
        assert!(!repos.roles().find_by_id(&5).await.unwrap().unwrap().is_active());

        role.role_id = 99;
        assert_eq!(repos.roles().replace(&role).await.unwrap(), 0);
    }
}
