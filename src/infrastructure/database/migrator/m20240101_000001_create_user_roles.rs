//! Create user_roles table

use sea_orm_migration::prelude::*;

use super::audit_columns;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(UserRoles::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(UserRoles::RoleId)
                    .integer()
                    .not_null()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(UserRoles::RoleName)
                    .string_len(64)
                    .not_null()
                    .unique_key(),
            );
        manager
            .create_table(audit_columns(&mut table).to_owned())
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserRoles::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum UserRoles {
    Table,
    RoleId,
    RoleName,
}
