//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_user_roles;
mod m20240101_000002_create_users;
mod m20240101_000003_create_reseller_details;
mod m20240101_000004_create_client_details;
mod m20240101_000005_create_association_details;
mod m20240101_000006_create_charger_details;
mod m20240101_000007_create_finance_details;
mod m20240101_000008_create_device_session_details;
mod m20240101_000009_seed_user_roles;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_user_roles::Migration),
            Box::new(m20240101_000002_create_users::Migration),
            Box::new(m20240101_000003_create_reseller_details::Migration),
            Box::new(m20240101_000004_create_client_details::Migration),
            Box::new(m20240101_000005_create_association_details::Migration),
            Box::new(m20240101_000006_create_charger_details::Migration),
            Box::new(m20240101_000007_create_finance_details::Migration),
            Box::new(m20240101_000008_create_device_session_details::Migration),
            Box::new(m20240101_000009_seed_user_roles::Migration),
        ]
    }
}

/// Columns stamped on every managed table.
#[derive(Iden)]
pub enum Audit {
    CreatedBy,
    CreatedAt,
    ModifiedBy,
    ModifiedAt,
    Status,
}

pub(crate) fn audit_columns(table: &mut TableCreateStatement) -> &mut TableCreateStatement {
    table
        .col(ColumnDef::new(Audit::CreatedBy).string().not_null())
        .col(
            ColumnDef::new(Audit::CreatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(ColumnDef::new(Audit::ModifiedBy).string())
        .col(ColumnDef::new(Audit::ModifiedAt).timestamp_with_time_zone())
        .col(
            ColumnDef::new(Audit::Status)
                .boolean()
                .not_null()
                .default(true),
        )
}
