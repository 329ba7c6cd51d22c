//! One generic SeaORM repository for every managed table
//!
//! A [`TableRecord`] describes how a domain record maps onto its entity:
//! conversions both ways, the id column, the natural-key column and the
//! column that carries each tenant level. `SeaOrmTable<T>` turns that into a
//! full `RecordRepository<T>`.

use std::future::Future;
use std::marker::PhantomData;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait, Value,
};

use crate::domain::{
    DomainError, DomainResult, Record, RecordRepository, ScopeFilter, TenantLevel,
};
use crate::shared::retry::{retry_with_backoff, RetryConfig};

pub type ModelOf<T> = <<T as TableRecord>::Entity as EntityTrait>::Model;
pub type ColumnOf<T> = <<T as TableRecord>::Entity as EntityTrait>::Column;

/// Mapping between a domain record and its SeaORM entity.
pub trait TableRecord: Record {
    type Entity: EntityTrait;
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity> + Send + Sync + 'static;

    fn from_model(model: ModelOf<Self>) -> Self;
    fn to_active_model(&self) -> Self::ActiveModel;

    fn id_column() -> ColumnOf<Self>;
    fn id_value(id: &Self::Id) -> Value;

    /// Whether ids come from the sequence allocator.
    fn sequential() -> bool {
        true
    }

    fn natural_key_column() -> Option<ColumnOf<Self>> {
        None
    }

    /// Column behind [`Record::alternate_key`], carrying its own unique index.
    fn alternate_key_column() -> Option<ColumnOf<Self>> {
        None
    }

    /// Column holding the id of the tenant node at `level`, if the table has one.
    fn scope_column(level: TenantLevel) -> Option<ColumnOf<Self>>;
}

/// Maps a SeaORM error onto the domain taxonomy.
pub fn db_err(e: DbErr) -> DomainError {
    let msg = e.to_string();
    match e {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => DomainError::StoreUnavailable(msg),
        _ if msg.contains("UNIQUE") || msg.contains("duplicate") => DomainError::Conflict(msg),
        _ => DomainError::Storage(msg),
    }
}

/// Reads retry once on a dropped connection; writes never retry.
pub(crate) async fn read_with_retry<F, Fut, R>(operation_name: &str, operation: F) -> DomainResult<R>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = DomainResult<R>>,
{
    retry_with_backoff(
        RetryConfig::for_reads(),
        operation,
        DomainError::is_transient,
        operation_name,
    )
    .await
}

pub struct SeaOrmTable<T> {
    db: DatabaseConnection,
    _record: PhantomData<fn() -> T>,
}

impl<T: TableRecord> SeaOrmTable<T> {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            _record: PhantomData,
        }
    }

    async fn find_by_key_column(&self, column: Option<ColumnOf<T>>, key: &str) -> DomainResult<Option<T>> {
        let Some(column) = column else {
            return Ok(None);
        };
        let query = T::Entity::find().filter(column.eq(key));
        let db = &self.db;
        let model = read_with_retry(T::ENTITY, || {
            let query = query.clone();
            async move { query.one(db).await.map_err(db_err) }
        })
        .await?;
        Ok(model.map(T::from_model))
    }
}

#[async_trait]
impl<T: TableRecord> RecordRepository<T> for SeaOrmTable<T> {
    async fn find_scoped(&self, scope: &ScopeFilter) -> DomainResult<Vec<T>> {
        let mut query = T::Entity::find().order_by_asc(T::id_column());
        if let ScopeFilter::Tenant { level, id } = *scope {
            let Some(column) = T::scope_column(level) else {
                return Ok(Vec::new());
            };
            query = query.filter(column.eq(id));
        }

        let db = &self.db;
        let models = read_with_retry(T::ENTITY, || {
            let query = query.clone();
            async move { query.all(db).await.map_err(db_err) }
        })
        .await?;
        Ok(models.into_iter().map(T::from_model).collect())
    }

    async fn find_by_id(&self, id: &T::Id) -> DomainResult<Option<T>> {
        let query = T::Entity::find().filter(T::id_column().eq(T::id_value(id)));
        let db = &self.db;
        let model = read_with_retry(T::ENTITY, || {
            let query = query.clone();
            async move { query.one(db).await.map_err(db_err) }
        })
        .await?;
        Ok(model.map(T::from_model))
    }

    async fn find_by_ids(&self, ids: &[T::Id]) -> DomainResult<Vec<T>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = T::Entity::find()
            .filter(T::id_column().is_in(ids.iter().map(T::id_value)))
            .order_by_asc(T::id_column());
        let db = &self.db;
        let models = read_with_retry(T::ENTITY, || {
            let query = query.clone();
            async move { query.all(db).await.map_err(db_err) }
        })
        .await?;
        Ok(models.into_iter().map(T::from_model).collect())
    }

    async fn find_by_natural_key(&self, key: &str) -> DomainResult<Option<T>> {
        self.find_by_key_column(T::natural_key_column(), key).await
    }

    async fn find_by_alternate_key(&self, key: &str) -> DomainResult<Option<T>> {
        self.find_by_key_column(T::alternate_key_column(), key).await
    }

    async fn max_id(&self) -> DomainResult<Option<i32>> {
        if !T::sequential() {
            return Ok(None);
        }
        let query = T::Entity::find()
            .select_only()
            .column_as(T::id_column().max(), "max_id");
        let db = &self.db;
        let max = read_with_retry(T::ENTITY, || {
            let query = query.clone().into_tuple::<Option<i32>>();
            async move { query.one(db).await.map_err(db_err) }
        })
        .await?;
        Ok(max.flatten())
    }

    async fn insert(&self, record: &T) -> DomainResult<()> {
        T::Entity::insert(record.to_active_model())
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn replace(&self, record: &T) -> DomainResult<u64> {
        let result = T::Entity::update_many()
            .set(record.to_active_model())
            .filter(T::id_column().eq(T::id_value(record.id())))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected)
    }

    async fn replace_many(&self, records: &[T]) -> DomainResult<u64> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let mut matched = 0;
        for record in records {
            let result = T::Entity::update_many()
                .set(record.to_active_model())
                .filter(T::id_column().eq(T::id_value(record.id())))
                .exec(&txn)
                .await
                .map_err(db_err)?;
            matched += result.rows_affected;
        }

        if matched != records.len() as u64 {
            txn.rollback().await.map_err(db_err)?;
            return Ok(matched);
        }
        txn.commit().await.map_err(db_err)?;
        Ok(matched)
    }
}
