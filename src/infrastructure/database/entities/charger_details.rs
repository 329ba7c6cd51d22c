//! Charger entity for database

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "charger_details")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub charger_id: String,
    pub model: String,
    pub vendor: String,
    pub charger_type: String,
    pub gun_connector: Option<i32>,
    #[sea_orm(column_type = "Double", nullable)]
    pub max_current: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub max_power: Option<f64>,
    pub socket_count: Option<i32>,
    #[sea_orm(column_type = "Double", nullable)]
    pub lat: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub long: Option<f64>,
    pub charger_accessibility: Option<i32>,
    pub wifi_username: Option<String>,
    pub wifi_password: Option<String>,
    pub assigned_reseller_id: Option<i32>,
    pub assigned_client_id: Option<i32>,
    pub assigned_association_id: Option<i32>,
    #[sea_orm(column_type = "Double", nullable)]
    pub reseller_commission: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub client_commission: Option<f64>,
    pub assigned_reseller_date: Option<DateTime<Utc>>,
    pub assigned_client_date: Option<DateTime<Utc>>,
    pub assigned_association_date: Option<DateTime<Utc>>,
    pub finance_id: Option<i32>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub modified_by: Option<String>,
    pub modified_at: Option<DateTime<Utc>>,
    pub status: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::device_session_details::Entity")]
    Sessions,
}

impl Related<super::device_session_details::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
