//! Create association_details table

use sea_orm_migration::prelude::*;

use super::audit_columns;
use super::m20240101_000004_create_client_details::ClientDetails;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(AssociationDetails::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(AssociationDetails::AssociationId)
                    .integer()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(AssociationDetails::ClientId).integer().not_null())
            .col(ColumnDef::new(AssociationDetails::ResellerId).integer().not_null())
            .col(
                ColumnDef::new(AssociationDetails::AssociationName)
                    .string_len(255)
                    .not_null(),
            )
            .col(
                ColumnDef::new(AssociationDetails::AssociationPhoneNo)
                    .string_len(32)
                    .not_null(),
            )
            .col(
                ColumnDef::new(AssociationDetails::AssociationEmailId)
                    .string_len(255)
                    .not_null()
                    .unique_key(),
            )
            .col(
                ColumnDef::new(AssociationDetails::AssociationAddress)
                    .text()
                    .not_null(),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_association_details_client_id")
                    .from(AssociationDetails::Table, AssociationDetails::ClientId)
                    .to(ClientDetails::Table, ClientDetails::ClientId)
                    .on_delete(ForeignKeyAction::Restrict),
            );
        manager
            .create_table(audit_columns(&mut table).to_owned())
            .await?;

        for (name, column) in [
            ("idx_association_details_client_id", AssociationDetails::ClientId),
            ("idx_association_details_reseller_id", AssociationDetails::ResellerId),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(AssociationDetails::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AssociationDetails::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum AssociationDetails {
    Table,
    AssociationId,
    ClientId,
    ResellerId,
    AssociationName,
    AssociationPhoneNo,
    AssociationEmailId,
    AssociationAddress,
}
