//! Device session entity for database
//!
//! Rows are written by the charging backend; this service only reads them.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "device_session_details")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub session_id: i32,
    pub charger_id: String,
    pub user: String,
    pub start_time: DateTime<Utc>,
    pub stop_time: Option<DateTime<Utc>>,
    #[sea_orm(column_type = "Double")]
    pub unit_consumed: f64,
    #[sea_orm(column_type = "Double")]
    pub price: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::charger_details::Entity",
        from = "Column::ChargerId",
        to = "super::charger_details::Column::ChargerId"
    )]
    Charger,
}

impl Related<super::charger_details::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Charger.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
