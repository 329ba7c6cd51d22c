//! Association entity for database

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "association_details")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub association_id: i32,
    pub client_id: i32,
    /// Copied from the client row on insert.
    pub reseller_id: i32,
    pub association_name: String,
    pub association_phone_no: String,
    #[sea_orm(unique)]
    pub association_email_id: String,
    pub association_address: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub modified_by: Option<String>,
    pub modified_at: Option<DateTime<Utc>>,
    pub status: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::client_details::Entity",
        from = "Column::ClientId",
        to = "super::client_details::Column::ClientId"
    )]
    Client,
}

impl Related<super::client_details::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
