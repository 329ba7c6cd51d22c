//! Client entity for database

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "client_details")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub client_id: i32,
    pub reseller_id: i32,
    pub client_name: String,
    pub client_phone_no: String,
    #[sea_orm(unique)]
    pub client_email_id: String,
    pub client_address: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub modified_by: Option<String>,
    pub modified_at: Option<DateTime<Utc>>,
    pub status: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::reseller_details::Entity",
        from = "Column::ResellerId",
        to = "super::reseller_details::Column::ResellerId"
    )]
    Reseller,
    #[sea_orm(has_many = "super::association_details::Entity")]
    Associations,
}

impl Related<super::reseller_details::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reseller.def()
    }
}

impl Related<super::association_details::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Associations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
