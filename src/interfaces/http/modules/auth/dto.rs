//! Login DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::LoginSession;
use crate::domain::TenantLevel;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[serde(alias = "email")]
    #[validate(length(min = 1, max = 254, message = "email_id is required"))]
    pub email_id: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: LoginUser,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reseller_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reseller_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub association_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub association_name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginUser {
    pub user_id: i32,
    pub username: String,
    pub email_id: String,
    pub role_id: i32,
    pub role: String,
}

impl From<LoginSession> for LoginResponse {
    fn from(session: LoginSession) -> Self {
        let auth = session.auth;
        let ids = auth.scope_ids;
        let name_at = |level: TenantLevel| {
            auth.tenant
                .as_ref()
                .filter(|t| t.level == level)
                .map(|t| t.name.clone())
        };

        Self {
            reseller_name: name_at(TenantLevel::Reseller),
            client_name: name_at(TenantLevel::Client),
            association_name: name_at(TenantLevel::Association),
            token: session.token,
            token_type: session.token_type,
            expires_in: session.expires_in,
            reseller_id: ids.reseller_id,
            client_id: ids.client_id,
            association_id: ids.association_id,
            user: LoginUser {
                user_id: auth.user.user_id,
                username: auth.user.username,
                email_id: auth.user.email_id,
                role_id: auth.role.role_id(),
                role: auth.role.name().to_string(),
            },
        }
    }
}
