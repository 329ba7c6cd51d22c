//! Create finance_details table

use sea_orm_migration::prelude::*;

use super::audit_columns;
use super::m20240101_000005_create_association_details::AssociationDetails;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(FinanceDetails::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(FinanceDetails::FinanceId)
                    .integer()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(FinanceDetails::ResellerId).integer().not_null())
            .col(ColumnDef::new(FinanceDetails::ClientId).integer().not_null())
            .col(ColumnDef::new(FinanceDetails::AssociationId).integer().not_null());
        for rate in [
            FinanceDetails::EbCharge,
            FinanceDetails::AppCharge,
            FinanceDetails::ParkingCharge,
            FinanceDetails::RentCharge,
            FinanceDetails::OpenAEbCharge,
            FinanceDetails::OpenOtherCharge,
            FinanceDetails::Gst,
        ] {
            table.col(ColumnDef::new(rate).double().not_null().default(0.0));
        }
        table.foreign_key(
            ForeignKey::create()
                .name("fk_finance_details_association_id")
                .from(FinanceDetails::Table, FinanceDetails::AssociationId)
                .to(AssociationDetails::Table, AssociationDetails::AssociationId)
                .on_delete(ForeignKeyAction::Restrict),
        );
        manager
            .create_table(audit_columns(&mut table).to_owned())
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_finance_details_client_id")
                    .table(FinanceDetails::Table)
                    .col(FinanceDetails::ClientId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FinanceDetails::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum FinanceDetails {
    Table,
    FinanceId,
    ResellerId,
    ClientId,
    AssociationId,
    EbCharge,
    AppCharge,
    ParkingCharge,
    RentCharge,
    OpenAEbCharge,
    OpenOtherCharge,
    Gst,
}
