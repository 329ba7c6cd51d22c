//! Create device_session_details table

use sea_orm_migration::prelude::*;

use super::m20240101_000006_create_charger_details::ChargerDetails;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DeviceSessionDetails::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DeviceSessionDetails::SessionId)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DeviceSessionDetails::ChargerId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(DeviceSessionDetails::User).string().not_null())
                    .col(
                        ColumnDef::new(DeviceSessionDetails::StartTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DeviceSessionDetails::StopTime).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(DeviceSessionDetails::UnitConsumed)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(DeviceSessionDetails::Price)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_device_session_details_charger_id")
                            .from(DeviceSessionDetails::Table, DeviceSessionDetails::ChargerId)
                            .to(ChargerDetails::Table, ChargerDetails::ChargerId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_device_session_details_charger_id")
                    .table(DeviceSessionDetails::Table)
                    .col(DeviceSessionDetails::ChargerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DeviceSessionDetails::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum DeviceSessionDetails {
    Table,
    SessionId,
    ChargerId,
    User,
    StartTime,
    StopTime,
    UnitConsumed,
    Price,
}
