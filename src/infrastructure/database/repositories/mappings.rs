//! Domain record ↔ entity conversions

use sea_orm::{Set, Value};

use super::record_table::{ColumnOf, ModelOf, TableRecord};
use crate::domain::{
    Association, Audit, Charger, Client, FinanceDetail, FinanceRates, Reseller, Role, TenantLevel,
    User,
};
use crate::infrastructure::database::entities::{
    association_details, charger_details, client_details, finance_details, reseller_details,
    user_roles, users,
};

fn audit(
    created_by: String,
    created_at: chrono::DateTime<chrono::Utc>,
    modified_by: Option<String>,
    modified_at: Option<chrono::DateTime<chrono::Utc>>,
    status: bool,
) -> Audit {
    Audit {
        created_by,
        created_at,
        modified_by,
        modified_at,
        status,
    }
}

// ── Role ────────────────────────────────────────────────────────

impl TableRecord for Role {
    type Entity = user_roles::Entity;
    type ActiveModel = user_roles::ActiveModel;

    fn from_model(m: ModelOf<Self>) -> Self {
        Role {
            role_id: m.role_id,
            role_name: m.role_name,
            audit: audit(m.created_by, m.created_at, m.modified_by, m.modified_at, m.status),
        }
    }

    fn to_active_model(&self) -> user_roles::ActiveModel {
        let a = &self.audit;
        user_roles::ActiveModel {
            role_id: Set(self.role_id),
            role_name: Set(self.role_name.clone()),
            created_by: Set(a.created_by.clone()),
            created_at: Set(a.created_at),
            modified_by: Set(a.modified_by.clone()),
            modified_at: Set(a.modified_at),
            status: Set(a.status),
        }
    }

    fn id_column() -> ColumnOf<Self> {
        user_roles::Column::RoleId
    }

    fn id_value(id: &i32) -> Value {
        (*id).into()
    }

    fn natural_key_column() -> Option<ColumnOf<Self>> {
        Some(user_roles::Column::RoleName)
    }

    fn scope_column(_level: TenantLevel) -> Option<ColumnOf<Self>> {
        None
    }
}

// ── User ────────────────────────────────────────────────────────

impl TableRecord for User {
    type Entity = users::Entity;
    type ActiveModel = users::ActiveModel;

    fn from_model(m: ModelOf<Self>) -> Self {
        User {
            user_id: m.user_id,
            role_id: m.role_id,
            username: m.username,
            email_id: m.email_id,
            password_hash: m.password_hash,
            phone_no: m.phone_no,
            reseller_id: m.reseller_id,
            client_id: m.client_id,
            association_id: m.association_id,
            wallet_balance: m.wallet_balance,
            autostop_time: m.autostop_time,
            autostop_unit: m.autostop_unit,
            autostop_price: m.autostop_price,
            autostop_time_is_checked: m.autostop_time_is_checked,
            autostop_unit_is_checked: m.autostop_unit_is_checked,
            autostop_price_is_checked: m.autostop_price_is_checked,
            audit: audit(m.created_by, m.created_at, m.modified_by, m.modified_at, m.status),
        }
    }

    fn to_active_model(&self) -> users::ActiveModel {
        let a = &self.audit;
        users::ActiveModel {
            user_id: Set(self.user_id),
            role_id: Set(self.role_id),
            username: Set(self.username.clone()),
            email_id: Set(self.email_id.clone()),
            password_hash: Set(self.password_hash.clone()),
            phone_no: Set(self.phone_no.clone()),
            reseller_id: Set(self.reseller_id),
            client_id: Set(self.client_id),
            association_id: Set(self.association_id),
            wallet_balance: Set(self.wallet_balance),
            autostop_time: Set(self.autostop_time),
            autostop_unit: Set(self.autostop_unit),
            autostop_price: Set(self.autostop_price),
            autostop_time_is_checked: Set(self.autostop_time_is_checked),
            autostop_unit_is_checked: Set(self.autostop_unit_is_checked),
            autostop_price_is_checked: Set(self.autostop_price_is_checked),
            created_by: Set(a.created_by.clone()),
            created_at: Set(a.created_at),
            modified_by: Set(a.modified_by.clone()),
            modified_at: Set(a.modified_at),
            status: Set(a.status),
        }
    }

    fn id_column() -> ColumnOf<Self> {
        users::Column::UserId
    }

    fn id_value(id: &i32) -> Value {
        (*id).into()
    }

    fn natural_key_column() -> Option<ColumnOf<Self>> {
        Some(users::Column::EmailId)
    }

    fn alternate_key_column() -> Option<ColumnOf<Self>> {
        Some(users::Column::Username)
    }

    fn scope_column(level: TenantLevel) -> Option<ColumnOf<Self>> {
        Some(match level {
            TenantLevel::Reseller => users::Column::ResellerId,
            TenantLevel::Client => users::Column::ClientId,
            TenantLevel::Association => users::Column::AssociationId,
        })
    }
}

// ── Tenants ─────────────────────────────────────────────────────

impl TableRecord for Reseller {
    type Entity = reseller_details::Entity;
    type ActiveModel = reseller_details::ActiveModel;

    fn from_model(m: ModelOf<Self>) -> Self {
        Reseller {
            reseller_id: m.reseller_id,
            reseller_name: m.reseller_name,
            reseller_phone_no: m.reseller_phone_no,
            reseller_email_id: m.reseller_email_id,
            reseller_address: m.reseller_address,
            audit: audit(m.created_by, m.created_at, m.modified_by, m.modified_at, m.status),
        }
    }

    fn to_active_model(&self) -> reseller_details::ActiveModel {
        let a = &self.audit;
        reseller_details::ActiveModel {
            reseller_id: Set(self.reseller_id),
            reseller_name: Set(self.reseller_name.clone()),
            reseller_phone_no: Set(self.reseller_phone_no.clone()),
            reseller_email_id: Set(self.reseller_email_id.clone()),
            reseller_address: Set(self.reseller_address.clone()),
            created_by: Set(a.created_by.clone()),
            created_at: Set(a.created_at),
            modified_by: Set(a.modified_by.clone()),
            modified_at: Set(a.modified_at),
            status: Set(a.status),
        }
    }

    fn id_column() -> ColumnOf<Self> {
        reseller_details::Column::ResellerId
    }

    fn id_value(id: &i32) -> Value {
        (*id).into()
    }

    fn natural_key_column() -> Option<ColumnOf<Self>> {
        Some(reseller_details::Column::ResellerEmailId)
    }

    fn scope_column(level: TenantLevel) -> Option<ColumnOf<Self>> {
        match level {
            TenantLevel::Reseller => Some(reseller_details::Column::ResellerId),
            _ => None,
        }
    }
}

impl TableRecord for Client {
    type Entity = client_details::Entity;
    type ActiveModel = client_details::ActiveModel;

    fn from_model(m: ModelOf<Self>) -> Self {
        Client {
            client_id: m.client_id,
            reseller_id: m.reseller_id,
            client_name: m.client_name,
            client_phone_no: m.client_phone_no,
            client_email_id: m.client_email_id,
            client_address: m.client_address,
            audit: audit(m.created_by, m.created_at, m.modified_by, m.modified_at, m.status),
        }
    }

    fn to_active_model(&self) -> client_details::ActiveModel {
        let a = &self.audit;
        client_details::ActiveModel {
            client_id: Set(self.client_id),
            reseller_id: Set(self.reseller_id),
            client_name: Set(self.client_name.clone()),
            client_phone_no: Set(self.client_phone_no.clone()),
            client_email_id: Set(self.client_email_id.clone()),
            client_address: Set(self.client_address.clone()),
            created_by: Set(a.created_by.clone()),
            created_at: Set(a.created_at),
            modified_by: Set(a.modified_by.clone()),
            modified_at: Set(a.modified_at),
            status: Set(a.status),
        }
    }

    fn id_column() -> ColumnOf<Self> {
        client_details::Column::ClientId
    }

    fn id_value(id: &i32) -> Value {
        (*id).into()
    }

    fn natural_key_column() -> Option<ColumnOf<Self>> {
        Some(client_details::Column::ClientEmailId)
    }

    fn scope_column(level: TenantLevel) -> Option<ColumnOf<Self>> {
        match level {
            TenantLevel::Reseller => Some(client_details::Column::ResellerId),
            TenantLevel::Client => Some(client_details::Column::ClientId),
            TenantLevel::Association => None,
        }
    }
}

impl TableRecord for Association {
    type Entity = association_details::Entity;
    type ActiveModel = association_details::ActiveModel;

    fn from_model(m: ModelOf<Self>) -> Self {
        Association {
            association_id: m.association_id,
            client_id: m.client_id,
            reseller_id: m.reseller_id,
            association_name: m.association_name,
            association_phone_no: m.association_phone_no,
            association_email_id: m.association_email_id,
            association_address: m.association_address,
            audit: audit(m.created_by, m.created_at, m.modified_by, m.modified_at, m.status),
        }
    }

    fn to_active_model(&self) -> association_details::ActiveModel {
        let a = &self.audit;
        association_details::ActiveModel {
            association_id: Set(self.association_id),
            client_id: Set(self.client_id),
            reseller_id: Set(self.reseller_id),
            association_name: Set(self.association_name.clone()),
            association_phone_no: Set(self.association_phone_no.clone()),
            association_email_id: Set(self.association_email_id.clone()),
            association_address: Set(self.association_address.clone()),
            created_by: Set(a.created_by.clone()),
            created_at: Set(a.created_at),
            modified_by: Set(a.modified_by.clone()),
            modified_at: Set(a.modified_at),
            status: Set(a.status),
        }
    }

    fn id_column() -> ColumnOf<Self> {
        association_details::Column::AssociationId
    }

    fn id_value(id: &i32) -> Value {
        (*id).into()
    }

    fn natural_key_column() -> Option<ColumnOf<Self>> {
        Some(association_details::Column::AssociationEmailId)
    }

    fn scope_column(level: TenantLevel) -> Option<ColumnOf<Self>> {
        Some(match level {
            TenantLevel::Reseller => association_details::Column::ResellerId,
            TenantLevel::Client => association_details::Column::ClientId,
            TenantLevel::Association => association_details::Column::AssociationId,
        })
    }
}

// ── Charger ─────────────────────────────────────────────────────

impl TableRecord for Charger {
    type Entity = charger_details::Entity;
    type ActiveModel = charger_details::ActiveModel;

    fn from_model(m: ModelOf<Self>) -> Self {
        Charger {
            charger_id: m.charger_id,
            model: m.model,
            vendor: m.vendor,
            charger_type: m.charger_type,
            gun_connector: m.gun_connector,
            max_current: m.max_current,
            max_power: m.max_power,
            socket_count: m.socket_count,
            lat: m.lat,
            long: m.long,
            charger_accessibility: m.charger_accessibility,
            wifi_username: m.wifi_username,
            wifi_password: m.wifi_password,
            assigned_reseller_id: m.assigned_reseller_id,
            assigned_client_id: m.assigned_client_id,
            assigned_association_id: m.assigned_association_id,
            reseller_commission: m.reseller_commission,
            client_commission: m.client_commission,
            assigned_reseller_date: m.assigned_reseller_date,
            assigned_client_date: m.assigned_client_date,
            assigned_association_date: m.assigned_association_date,
            finance_id: m.finance_id,
            audit: audit(m.created_by, m.created_at, m.modified_by, m.modified_at, m.status),
        }
    }

    fn to_active_model(&self) -> charger_details::ActiveModel {
        let a = &self.audit;
        charger_details::ActiveModel {
            charger_id: Set(self.charger_id.clone()),
            model: Set(self.model.clone()),
            vendor: Set(self.vendor.clone()),
            charger_type: Set(self.charger_type.clone()),
            gun_connector: Set(self.gun_connector),
            max_current: Set(self.max_current),
            max_power: Set(self.max_power),
            socket_count: Set(self.socket_count),
            lat: Set(self.lat),
            long: Set(self.long),
            charger_accessibility: Set(self.charger_accessibility),
            wifi_username: Set(self.wifi_username.clone()),
            wifi_password: Set(self.wifi_password.clone()),
            assigned_reseller_id: Set(self.assigned_reseller_id),
            assigned_client_id: Set(self.assigned_client_id),
            assigned_association_id: Set(self.assigned_association_id),
            reseller_commission: Set(self.reseller_commission),
            client_commission: Set(self.client_commission),
            assigned_reseller_date: Set(self.assigned_reseller_date),
            assigned_client_date: Set(self.assigned_client_date),
            assigned_association_date: Set(self.assigned_association_date),
            finance_id: Set(self.finance_id),
            created_by: Set(a.created_by.clone()),
            created_at: Set(a.created_at),
            modified_by: Set(a.modified_by.clone()),
            modified_at: Set(a.modified_at),
            status: Set(a.status),
        }
    }

    fn id_column() -> ColumnOf<Self> {
        charger_details::Column::ChargerId
    }

    fn id_value(id: &String) -> Value {
        id.clone().into()
    }

    // Charger ids are external.
    fn sequential() -> bool {
        false
    }

    fn scope_column(level: TenantLevel) -> Option<ColumnOf<Self>> {
        Some(match level {
            TenantLevel::Reseller => charger_details::Column::AssignedResellerId,
            TenantLevel::Client => charger_details::Column::AssignedClientId,
            TenantLevel::Association => charger_details::Column::AssignedAssociationId,
        })
    }
}

// ── Finance ─────────────────────────────────────────────────────

impl TableRecord for FinanceDetail {
    type Entity = finance_details::Entity;
    type ActiveModel = finance_details::ActiveModel;

    fn from_model(m: ModelOf<Self>) -> Self {
        FinanceDetail {
            finance_id: m.finance_id,
            reseller_id: m.reseller_id,
            client_id: m.client_id,
            association_id: m.association_id,
            rates: FinanceRates {
                eb_charge: m.eb_charge,
                app_charge: m.app_charge,
                parking_charge: m.parking_charge,
                rent_charge: m.rent_charge,
                open_a_eb_charge: m.open_a_eb_charge,
                open_other_charge: m.open_other_charge,
                gst: m.gst,
            },
            audit: audit(m.created_by, m.created_at, m.modified_by, m.modified_at, m.status),
        }
    }

    fn to_active_model(&self) -> finance_details::ActiveModel {
        let a = &self.audit;
        let r = &self.rates;
        finance_details::ActiveModel {
            finance_id: Set(self.finance_id),
            reseller_id: Set(self.reseller_id),
            client_id: Set(self.client_id),
            association_id: Set(self.association_id),
            eb_charge: Set(r.eb_charge),
            app_charge: Set(r.app_charge),
            parking_charge: Set(r.parking_charge),
            rent_charge: Set(r.rent_charge),
            open_a_eb_charge: Set(r.open_a_eb_charge),
            open_other_charge: Set(r.open_other_charge),
            gst: Set(r.gst),
            created_by: Set(a.created_by.clone()),
            created_at: Set(a.created_at),
            modified_by: Set(a.modified_by.clone()),
            modified_at: Set(a.modified_at),
            status: Set(a.status),
        }
    }

    fn id_column() -> ColumnOf<Self> {
        finance_details::Column::FinanceId
    }

    fn id_value(id: &i32) -> Value {
        (*id).into()
    }

    fn scope_column(level: TenantLevel) -> Option<ColumnOf<Self>> {
        Some(match level {
            TenantLevel::Reseller => finance_details::Column::ResellerId,
            TenantLevel::Client => finance_details::Column::ClientId,
            TenantLevel::Association => finance_details::Column::AssociationId,
        })
    }
}
