//! Finance entity for database

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "finance_details")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub finance_id: i32,
    pub reseller_id: i32,
    pub client_id: i32,
    pub association_id: i32,
    #[sea_orm(column_type = "Double")]
    pub eb_charge: f64,
    #[sea_orm(column_type = "Double")]
    pub app_charge: f64,
    #[sea_orm(column_type = "Double")]
    pub parking_charge: f64,
    #[sea_orm(column_type = "Double")]
    pub rent_charge: f64,
    #[sea_orm(column_type = "Double")]
    pub open_a_eb_charge: f64,
    #[sea_orm(column_type = "Double")]
    pub open_other_charge: f64,
    #[sea_orm(column_type = "Double")]
    pub gst: f64,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub modified_by: Option<String>,
    pub modified_at: Option<DateTime<Utc>>,
    pub status: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::association_details::Entity",
        from = "Column::AssociationId",
        to = "super::association_details::Column::AssociationId"
    )]
    Association,
}

impl Related<super::association_details::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Association.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
