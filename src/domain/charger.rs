//! Charger records and the assignment chain

use chrono::{DateTime, Utc};

use super::record::{Audit, Draft, Ownership, Record};
use super::repositories::{RecordRepository, RepositoryProvider};
use super::scope::TenantLevel;
use crate::shared::errors::RequiredFields;

#[derive(Debug, Clone, PartialEq)]
pub struct Charger {
    /// Externally assigned, unique.
    pub charger_id: String,
    pub model: String,
    pub vendor: String,
    pub charger_type: String,
    pub gun_connector: Option<i32>,
    pub max_current: Option<f64>,
    pub max_power: Option<f64>,
    pub socket_count: Option<i32>,
    pub lat: Option<f64>,
    pub long: Option<f64>,
    pub charger_accessibility: Option<i32>,
    pub wifi_username: Option<String>,
    pub wifi_password: Option<String>,
    pub assigned_reseller_id: Option<i32>,
    pub assigned_client_id: Option<i32>,
    pub assigned_association_id: Option<i32>,
    pub reseller_commission: Option<f64>,
    pub client_commission: Option<f64>,
    pub assigned_reseller_date: Option<DateTime<Utc>>,
    pub assigned_client_date: Option<DateTime<Utc>>,
    pub assigned_association_date: Option<DateTime<Utc>>,
    pub finance_id: Option<i32>,
    pub audit: Audit,
}

/// Where a charger is being handed down to. Carries the full chain so the
/// record never references two branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentTarget {
    Reseller(i32),
    Client {
        reseller_id: i32,
        client_id: i32,
    },
    Association {
        reseller_id: i32,
        client_id: i32,
        association_id: i32,
    },
}

impl AssignmentTarget {
    /// Builds the target for a tenant node from its ownership chain.
    pub fn from_chain(level: TenantLevel, chain: &Ownership) -> Option<Self> {
        match level {
            TenantLevel::Reseller => chain.reseller_id.map(Self::Reseller),
            TenantLevel::Client => Some(Self::Client {
                reseller_id: chain.reseller_id?,
                client_id: chain.client_id?,
            }),
            TenantLevel::Association => Some(Self::Association {
                reseller_id: chain.reseller_id?,
                client_id: chain.client_id?,
                association_id: chain.association_id?,
            }),
        }
    }

    pub fn level(&self) -> TenantLevel {
        match self {
            Self::Reseller(_) => TenantLevel::Reseller,
            Self::Client { .. } => TenantLevel::Client,
            Self::Association { .. } => TenantLevel::Association,
        }
    }

    pub fn chain(&self) -> Ownership {
        match *self {
            Self::Reseller(r) => Ownership {
                reseller_id: Some(r),
                ..Ownership::default()
            },
            Self::Client {
                reseller_id,
                client_id,
            } => Ownership {
                reseller_id: Some(reseller_id),
                client_id: Some(client_id),
                association_id: None,
            },
            Self::Association {
                reseller_id,
                client_id,
                association_id,
            } => Ownership {
                reseller_id: Some(reseller_id),
                client_id: Some(client_id),
                association_id: Some(association_id),
            },
        }
    }
}

impl Charger {
    pub fn chain(&self) -> Ownership {
        Ownership {
            reseller_id: self.assigned_reseller_id,
            client_id: self.assigned_client_id,
            association_id: self.assigned_association_id,
        }
    }

    /// Hands the charger down to `target`.
    ///
    /// Levels below the target are cleared when the charger moves to a
    /// different node at that level. Re-assigning to the same target only
    /// refreshes the commission and date. The commission belongs to the
    /// level doing the handing down, so it is ignored for reseller targets.
    pub fn assign(&mut self, target: AssignmentTarget, commission: Option<f64>, at: DateTime<Utc>) {
        let chain = target.chain();
        let moved = self.chain().id_at(target.level()) != chain.id_at(target.level());

        self.assigned_reseller_id = chain.reseller_id;
        self.assigned_client_id = chain.client_id.or(self.assigned_client_id);
        self.assigned_association_id = chain.association_id.or(self.assigned_association_id);

        match target {
            AssignmentTarget::Reseller(_) => {
                self.assigned_reseller_date = Some(at);
                if moved {
                    self.clear_below(TenantLevel::Reseller);
                }
            }
            AssignmentTarget::Client { .. } => {
                self.assigned_client_date = Some(at);
                if commission.is_some() {
                    self.reseller_commission = commission;
                }
                if moved {
                    self.clear_below(TenantLevel::Client);
                }
            }
            AssignmentTarget::Association { .. } => {
                self.assigned_association_date = Some(at);
                if commission.is_some() {
                    self.client_commission = commission;
                }
                if moved {
                    self.clear_below(TenantLevel::Association);
                }
            }
        }
    }

    fn clear_below(&mut self, level: TenantLevel) {
        if level < TenantLevel::Client {
            self.assigned_client_id = None;
            self.assigned_client_date = None;
            self.reseller_commission = None;
        }
        if level < TenantLevel::Association {
            self.assigned_association_id = None;
            self.assigned_association_date = None;
            self.client_commission = None;
        }
        // Tariffs belong to the association that configured them.
        self.finance_id = None;
    }
}

impl Record for Charger {
    type Id = String;
    const ENTITY: &'static str = "charger";
    const ID_FIELD: &'static str = "charger_id";

    fn id(&self) -> &String {
        &self.charger_id
    }

    fn ownership(&self) -> Ownership {
        self.chain()
    }

    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }

    fn repository(repos: &dyn RepositoryProvider) -> &dyn RecordRepository<Self> {
        repos.chargers()
    }
}

#[derive(Debug, Clone)]
pub struct NewCharger {
    pub charger_id: String,
    pub model: String,
    pub vendor: String,
    pub charger_type: String,
    pub gun_connector: Option<i32>,
    pub max_current: Option<f64>,
    pub max_power: Option<f64>,
    pub socket_count: Option<i32>,
}

impl Draft<Charger> for NewCharger {
    fn missing_fields(&self) -> Vec<&'static str> {
        RequiredFields::new()
            .text("charger_id", &self.charger_id)
            .text("model", &self.model)
            .text("vendor", &self.vendor)
            .text("charger_type", &self.charger_type)
            .missing()
    }

    fn natural_key(&self) -> Option<String> {
        None
    }

    fn into_record(self, id: String, _owner: Ownership, audit: Audit) -> Charger {
        Charger {
            charger_id: id,
            model: self.model.trim().to_string(),
            vendor: self.vendor.trim().to_string(),
            charger_type: self.charger_type.trim().to_string(),
            gun_connector: self.gun_connector,
            max_current: self.max_current,
            max_power: self.max_power,
            socket_count: self.socket_count,
            lat: None,
            long: None,
            charger_accessibility: None,
            wifi_username: None,
            wifi_password: None,
            assigned_reseller_id: None,
            assigned_client_id: None,
            assigned_association_id: None,
            reseller_commission: None,
            client_commission: None,
            assigned_reseller_date: None,
            assigned_client_date: None,
            assigned_association_date: None,
            finance_id: None,
            audit,
        }
    }
}

/// Hardware attributes editable by the platform operator.
#[derive(Debug, Clone, Default)]
pub struct ChargerPatch {
    pub model: Option<String>,
    pub vendor: Option<String>,
    pub charger_type: Option<String>,
    pub gun_connector: Option<i32>,
    pub max_current: Option<f64>,
    pub max_power: Option<f64>,
    pub socket_count: Option<i32>,
}

impl ChargerPatch {
    pub fn apply(self, charger: &mut Charger) {
        if let Some(v) = self.model {
            charger.model = v.trim().to_string();
        }
        if let Some(v) = self.vendor {
            charger.vendor = v.trim().to_string();
        }
        if let Some(v) = self.charger_type {
            charger.charger_type = v.trim().to_string();
        }
        charger.gun_connector = self.gun_connector.or(charger.gun_connector);
        charger.max_current = self.max_current.or(charger.max_current);
        charger.max_power = self.max_power.or(charger.max_power);
        charger.socket_count = self.socket_count.or(charger.socket_count);
    }
}

/// Site settings editable by the association operating the charger.
#[derive(Debug, Clone, Default)]
pub struct DevicePatch {
    pub charger_accessibility: Option<i32>,
    pub wifi_username: Option<String>,
    pub wifi_password: Option<String>,
    pub lat: Option<f64>,
    pub long: Option<f64>,
    pub finance_id: Option<i32>,
}

impl DevicePatch {
    pub fn apply(self, charger: &mut Charger) {
        charger.charger_accessibility = self.charger_accessibility.or(charger.charger_accessibility);
        if self.wifi_username.is_some() {
            charger.wifi_username = self.wifi_username;
        }
        if self.wifi_password.is_some() {
            charger.wifi_password = self.wifi_password;
        }
        charger.lat = self.lat.or(charger.lat);
        charger.long = self.long.or(charger.long);
        charger.finance_id = self.finance_id.or(charger.finance_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn charger() -> Charger {
        NewCharger {
            charger_id: "CP-1".into(),
            model: "AC22".into(),
            vendor: "Volt".into(),
            charger_type: "AC".into(),
            gun_connector: Some(1),
            max_current: Some(32.0),
            max_power: Some(22.0),
            socket_count: Some(1),
        }
        .into_record("CP-1".into(), Ownership::default(), Audit::created("root"))
    }

    fn to_client(reseller_id: i32, client_id: i32) -> AssignmentTarget {
        AssignmentTarget::Client {
            reseller_id,
            client_id,
        }
    }

    #[test]
    fn moving_to_another_client_clears_association() {
        let mut cp = charger();
        let now = Utc::now();
        cp.assign(AssignmentTarget::Reseller(7), None, now);
        cp.assign(to_client(7, 3), Some(2.5), now);
        cp.assign(
            AssignmentTarget::Association {
                reseller_id: 7,
                client_id: 3,
                association_id: 11,
            },
            Some(1.0),
            now,
        );
        cp.finance_id = Some(4);

        cp.assign(to_client(7, 4), Some(3.0), now);
        assert_eq!(cp.assigned_client_id, Some(4));
        assert_eq!(cp.assigned_association_id, None);
        assert_eq!(cp.assigned_association_date, None);
        assert_eq!(cp.client_commission, None);
        assert_eq!(cp.finance_id, None);
        assert_eq!(cp.reseller_commission, Some(3.0));
    }

    #[test]
    fn moving_between_sibling_associations_drops_tariff() {
        let mut cp = charger();
        let now = Utc::now();
        let site = |association_id| AssignmentTarget::Association {
            reseller_id: 7,
            client_id: 3,
            association_id,
        };
        cp.assign(to_client(7, 3), Some(2.5), now);
        cp.assign(site(11), Some(1.0), now);
        cp.finance_id = Some(4);

        cp.assign(site(11), Some(1.5), now);
        assert_eq!(cp.finance_id, Some(4));

        cp.assign(site(12), Some(2.0), now);
        assert_eq!(cp.assigned_association_id, Some(12));
        assert_eq!(cp.client_commission, Some(2.0));
        assert_eq!(cp.finance_id, None);
    }

    #[test]
    fn same_target_keeps_lower_levels() {
        let mut cp = charger();
        let first = Utc::now();
        cp.assign(to_client(7, 3), Some(2.5), first);
        cp.assign(
            AssignmentTarget::Association {
                reseller_id: 7,
                client_id: 3,
                association_id: 11,
            },
            None,
            first,
        );

        let later = first + chrono::Duration::seconds(5);
        cp.assign(to_client(7, 3), Some(4.0), later);
        assert_eq!(cp.assigned_association_id, Some(11));
        assert_eq!(cp.assigned_client_date, Some(later));
        assert_eq!(cp.reseller_commission, Some(4.0));
    }

    #[test]
    fn new_reseller_resets_whole_chain() {
        let mut cp = charger();
        let now = Utc::now();
        cp.assign(to_client(7, 3), Some(2.5), now);
        cp.assign(AssignmentTarget::Reseller(8), None, now);
        assert_eq!(cp.chain(), AssignmentTarget::Reseller(8).chain());
        assert_eq!(cp.reseller_commission, None);
    }

    #[test]
    fn target_from_partial_chain_is_none() {
        let chain = Ownership {
            reseller_id: None,
            client_id: Some(3),
            association_id: None,
        };
        assert_eq!(AssignmentTarget::from_chain(TenantLevel::Client, &chain), None);
    }
}
