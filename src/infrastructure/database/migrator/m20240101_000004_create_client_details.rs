//! Create client_details table

use sea_orm_migration::prelude::*;

use super::audit_columns;
use super::m20240101_000003_create_reseller_details::ResellerDetails;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(ClientDetails::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(ClientDetails::ClientId)
                    .integer()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(ClientDetails::ResellerId).integer().not_null())
            .col(ColumnDef::new(ClientDetails::ClientName).string_len(255).not_null())
            .col(ColumnDef::new(ClientDetails::ClientPhoneNo).string_len(32).not_null())
            .col(
                ColumnDef::new(ClientDetails::ClientEmailId)
                    .string_len(255)
                    .not_null()
                    .unique_key(),
            )
            .col(ColumnDef::new(ClientDetails::ClientAddress).text().not_null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_client_details_reseller_id")
                    .from(ClientDetails::Table, ClientDetails::ResellerId)
                    .to(ResellerDetails::Table, ResellerDetails::ResellerId)
                    .on_delete(ForeignKeyAction::Restrict),
            );
        manager
            .create_table(audit_columns(&mut table).to_owned())
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_client_details_reseller_id")
                    .table(ClientDetails::Table)
                    .col(ClientDetails::ResellerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ClientDetails::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ClientDetails {
    Table,
    ClientId,
    ResellerId,
    ClientName,
    ClientPhoneNo,
    ClientEmailId,
    ClientAddress,
}
