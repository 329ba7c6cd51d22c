//! Create reseller_details table

use sea_orm_migration::prelude::*;

use super::audit_columns;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(ResellerDetails::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(ResellerDetails::ResellerId)
                    .integer()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(ResellerDetails::ResellerName).string_len(255).not_null())
            .col(ColumnDef::new(ResellerDetails::ResellerPhoneNo).string_len(32).not_null())
            .col(
                ColumnDef::new(ResellerDetails::ResellerEmailId)
                    .string_len(255)
                    .not_null()
                    .unique_key(),
            )
            .col(ColumnDef::new(ResellerDetails::ResellerAddress).text().not_null());
        manager
            .create_table(audit_columns(&mut table).to_owned())
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ResellerDetails::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ResellerDetails {
    Table,
    ResellerId,
    ResellerName,
    ResellerPhoneNo,
    ResellerEmailId,
    ResellerAddress,
}
