//! Admin and end-user accounts

use super::record::{Audit, Draft, Ownership, Record};
use super::repositories::{RecordRepository, RepositoryProvider};
use super::scope::AdminRole;
use crate::shared::errors::RequiredFields;

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub user_id: i32,
    pub role_id: i32,
    pub username: String,
    /// Login identifier and natural key.
    pub email_id: String,
    /// bcrypt hash; the cleartext is never stored.
    pub password_hash: String,
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
    pub audit: Audit,
}

impl User {
    pub fn admin_role(&self) -> Option<AdminRole> {
        AdminRole::from_role_id(self.role_id)
    }
}

impl Record for User {
    type Id = i32;
    const ENTITY: &'static str = "user";
    const ID_FIELD: &'static str = "user_id";

    fn id(&self) -> &i32 {
        &self.user_id
    }

    fn ownership(&self) -> Ownership {
        Ownership {
            reseller_id: self.reseller_id,
            client_id: self.client_id,
            association_id: self.association_id,
        }
    }

    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }

    fn natural_key(&self) -> Option<String> {
        Some(self.email_id.clone())
    }

    fn alternate_key(&self) -> Option<String> {
        Some(self.username.clone())
    }

    fn repository(repos: &dyn RepositoryProvider) -> &dyn RecordRepository<Self> {
        repos.users()
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub role_id: i32,
    pub username: String,
    pub email_id: String,
    /// Empty when no password was supplied.
    pub password_hash: String,
    pub phone_no: Option<String>,
    pub wallet_balance: Option<f64>,
}

impl Draft<User> for NewUser {
    fn missing_fields(&self) -> Vec<&'static str> {
        RequiredFields::new()
            .check("role_id", self.role_id > 0)
            .text("username", &self.username)
            .text("email_id", &self.email_id)
            .text("password", &self.password_hash)
            .missing()
    }

    fn natural_key(&self) -> Option<String> {
        Some(normalize_email(&self.email_id))
    }

    fn alternate_key(&self) -> Option<String> {
        Some(self.username.trim().to_string())
    }

    fn into_record(self, id: i32, owner: Ownership, audit: Audit) -> User {
        User {
            user_id: id,
            role_id: self.role_id,
            username: self.username.trim().to_string(),
            email_id: normalize_email(&self.email_id),
            password_hash: self.password_hash,
            phone_no: self.phone_no,
            reseller_id: owner.reseller_id,
            client_id: owner.client_id,
            association_id: owner.association_id,
            wallet_balance: self.wallet_balance.unwrap_or(0.0),
            autostop_time: None,
            autostop_unit: None,
            autostop_price: None,
            autostop_time_is_checked: false,
            autostop_unit_is_checked: false,
            autostop_price_is_checked: false,
            audit,
        }
    }
}

/// Mutable account fields. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub username: Option<String>,
    pub phone_no: Option<String>,
    /// Already hashed.
    pub password_hash: Option<String>,
    pub wallet_balance: Option<f64>,
}

impl UserPatch {
    pub fn apply(self, user: &mut User) {
        if let Some(username) = self.username {
            user.username = username.trim().to_string();
        }
        if let Some(phone) = self.phone_no {
            user.phone_no = Some(phone);
        }
        if let Some(hash) = self.password_hash {
            user.password_hash = hash;
        }
        if let Some(balance) = self.wallet_balance {
            user.wallet_balance = balance;
        }
    }
}

/// Emails compare case-insensitively.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}
