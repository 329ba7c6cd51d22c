//! User DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::admin::{CreateUserInput, UpdateUserInput};
use crate::domain::{AdminRole, User};
use crate::interfaces::http::common::AuditDto;

/// User API representation. The password hash never leaves the server.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub user_id: i32,
    pub role_id: i32,
    pub role_name: Option<String>,
    pub username: String,
    pub email_id: String,
    pub phone_no: Option<String>,
    pub reseller_id: Option<i32>,
    pub client_id: Option<i32>,
    pub association_id: Option<i32>,
    pub wallet_balance: f64,
    pub autostop_time: Option<i32>,
    pub autostop_unit: Option<f64>,
    pub autostop_price: Option<f64>,
    pub autostop_time_is_checked: bool,
    pub autostop_unit_is_checked: bool,
    pub autostop_price_is_checked: bool,
    #[serde(flatten)]
    pub audit: AuditDto,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            role_name: AdminRole::from_role_id(u.role_id).map(|r| r.name().to_string()),
            user_id: u.user_id,
            role_id: u.role_id,
            username: u.username,
            email_id: u.email_id,
            phone_no: u.phone_no,
            reseller_id: u.reseller_id,
            client_id: u.client_id,
            association_id: u.association_id,
            wallet_balance: u.wallet_balance,
            autostop_time: u.autostop_time,
            autostop_unit: u.autostop_unit,
            autostop_price: u.autostop_price,
            autostop_time_is_checked: u.autostop_time_is_checked,
            autostop_unit_is_checked: u.autostop_unit_is_checked,
            autostop_price_is_checked: u.autostop_price_is_checked,
            audit: u.audit.into(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(range(min = 1, message = "role_id is required"))]
    pub role_id: i32,
    #[validate(length(min = 1, max = 50, message = "username must be 1-50 characters"))]
    pub username: String,
    #[validate(email(message = "invalid email format"))]
    pub email_id: String,
    #[validate(length(min = 6, max = 128, message = "password must be 6-128 characters"))]
    pub password: String,
    pub phone_no: Option<String>,
    #[validate(range(min = 0.0, message = "wallet_balance must be non-negative"))]
    pub wallet_balance: Option<f64>,
    /// Tenant node for a user one level below the caller.
    pub reseller_id: Option<i32>,
    pub client_id: Option<i32>,
    pub association_id: Option<i32>,
}

impl From<CreateUserRequest> for CreateUserInput {
    fn from(r: CreateUserRequest) -> Self {
        Self {
            role_id: r.role_id,
            username: r.username,
            email_id: r.email_id,
            password: r.password,
            phone_no: r.phone_no,
            wallet_balance: r.wallet_balance,
            reseller_id: r.reseller_id,
            client_id: r.client_id,
            association_id: r.association_id,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 50, message = "username must be 1-50 characters"))]
    pub username: Option<String>,
    pub phone_no: Option<String>,
    #[validate(length(min = 6, max = 128, message = "password must be 6-128 characters"))]
    pub password: Option<String>,
    #[validate(range(min = 0.0, message = "wallet_balance must be non-negative"))]
    pub wallet_balance: Option<f64>,
}

impl From<UpdateUserRequest> for UpdateUserInput {
    fn from(r: UpdateUserRequest) -> Self {
        Self {
            username: r.username,
            phone_no: r.phone_no,
            password: r.password,
            wallet_balance: r.wallet_balance,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WalletDto {
    pub wallet_balance: f64,
}
