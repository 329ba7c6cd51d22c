//! Create users table

use sea_orm_migration::prelude::*;

use super::audit_columns;
use super::m20240101_000001_create_user_roles::UserRoles;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(Users::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Users::UserId)
                    .integer()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(Users::RoleId).integer().not_null())
            .col(
                ColumnDef::new(Users::Username)
                    .string_len(255)
                    .not_null()
                    .unique_key(),
            )
            .col(
                ColumnDef::new(Users::EmailId)
                    .string_len(255)
                    .not_null()
                    .unique_key(),
            )
            .col(ColumnDef::new(Users::PasswordHash).string_len(255).not_null())
            .col(ColumnDef::new(Users::PhoneNo).string_len(32))
            .col(ColumnDef::new(Users::ResellerId).integer())
            .col(ColumnDef::new(Users::ClientId).integer())
            .col(ColumnDef::new(Users::AssociationId).integer())
            .col(
                ColumnDef::new(Users::WalletBalance)
                    .double()
                    .not_null()
                    .default(0.0),
            )
            .col(ColumnDef::new(Users::AutostopTime).integer())
            .col(ColumnDef::new(Users::AutostopUnit).double())
            .col(ColumnDef::new(Users::AutostopPrice).double())
            .col(
                ColumnDef::new(Users::AutostopTimeIsChecked)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .col(
                ColumnDef::new(Users::AutostopUnitIsChecked)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .col(
                ColumnDef::new(Users::AutostopPriceIsChecked)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_users_role_id")
                    .from(Users::Table, Users::RoleId)
                    .to(UserRoles::Table, UserRoles::RoleId)
                    .on_delete(ForeignKeyAction::Restrict),
            );
        manager
            .create_table(audit_columns(&mut table).to_owned())
            .await?;

        for (name, column) in [
            ("idx_users_reseller_id", Users::ResellerId),
            ("idx_users_client_id", Users::ClientId),
            ("idx_users_association_id", Users::AssociationId),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Users::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Users {
    Table,
    UserId,
    RoleId,
    Username,
    EmailId,
    PasswordHash,
    PhoneNo,
    ResellerId,
    ClientId,
    AssociationId,
    WalletBalance,
    AutostopTime,
    AutostopUnit,
    AutostopPrice,
    AutostopTimeIsChecked,
    AutostopUnitIsChecked,
    AutostopPriceIsChecked,
}
