//! User entity for database

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i32,
    pub role_id: i32,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email_id: String,
    pub password_hash: String,
    pub phone_no: Option<String>,
    pub reseller_id: Option<i32>,
    pub client_id: Option<i32>,
    pub association_id: Option<i32>,
    #[sea_orm(column_type = "Double")]
    pub wallet_balance: f64,
    pub autostop_time: Option<i32>,
    #[sea_orm(column_type = "Double", nullable)]
    pub autostop_unit: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub autostop_price: Option<f64>,
    pub autostop_time_is_checked: bool,
    pub autostop_unit_is_checked: bool,
    pub autostop_price_is_checked: bool,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub modified_by: Option<String>,
    pub modified_at: Option<DateTime<Utc>>,
    pub status: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_roles::Entity",
        from = "Column::RoleId",
        to = "super::user_roles::Column::RoleId"
    )]
    Role,
}

impl Related<super::user_roles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Role.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
