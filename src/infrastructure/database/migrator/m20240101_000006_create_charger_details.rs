//! Create charger_details table

use sea_orm_migration::prelude::*;

use super::audit_columns;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(ChargerDetails::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(ChargerDetails::ChargerId)
                    .string_len(64)
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(ChargerDetails::Model).string().not_null())
            .col(ColumnDef::new(ChargerDetails::Vendor).string().not_null())
            .col(ColumnDef::new(ChargerDetails::ChargerType).string().not_null())
            .col(ColumnDef::new(ChargerDetails::GunConnector).integer())
            .col(ColumnDef::new(ChargerDetails::MaxCurrent).double())
            .col(ColumnDef::new(ChargerDetails::MaxPower).double())
            .col(ColumnDef::new(ChargerDetails::SocketCount).integer())
            .col(ColumnDef::new(ChargerDetails::Lat).double())
            .col(ColumnDef::new(ChargerDetails::Long).double())
            .col(ColumnDef::new(ChargerDetails::ChargerAccessibility).integer())
            .col(ColumnDef::new(ChargerDetails::WifiUsername).string())
            .col(ColumnDef::new(ChargerDetails::WifiPassword).string())
            .col(ColumnDef::new(ChargerDetails::AssignedResellerId).integer())
            .col(ColumnDef::new(ChargerDetails::AssignedClientId).integer())
            .col(ColumnDef::new(ChargerDetails::AssignedAssociationId).integer())
            .col(ColumnDef::new(ChargerDetails::ResellerCommission).double())
            .col(ColumnDef::new(ChargerDetails::ClientCommission).double())
            .col(ColumnDef::new(ChargerDetails::AssignedResellerDate).timestamp_with_time_zone())
            .col(ColumnDef::new(ChargerDetails::AssignedClientDate).timestamp_with_time_zone())
            .col(
                ColumnDef::new(ChargerDetails::AssignedAssociationDate)
                    .timestamp_with_time_zone(),
            )
            .col(ColumnDef::new(ChargerDetails::FinanceId).integer());
        manager
            .create_table(audit_columns(&mut table).to_owned())
            .await?;

        // Scope lookups filter on the assignment chain
        for (name, column) in [
            ("idx_charger_details_reseller", ChargerDetails::AssignedResellerId),
            ("idx_charger_details_client", ChargerDetails::AssignedClientId),
            ("idx_charger_details_association", ChargerDetails::AssignedAssociationId),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(ChargerDetails::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ChargerDetails::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ChargerDetails {
    Table,
    ChargerId,
    Model,
    Vendor,
    ChargerType,
    GunConnector,
    MaxCurrent,
    MaxPower,
    SocketCount,
    Lat,
    Long,
    ChargerAccessibility,
    WifiUsername,
    WifiPassword,
    AssignedResellerId,
    AssignedClientId,
    AssignedAssociationId,
    ResellerCommission,
    ClientCommission,
    AssignedResellerDate,
    AssignedClientDate,
    AssignedAssociationDate,
    FinanceId,
}
