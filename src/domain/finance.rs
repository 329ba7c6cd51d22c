//! Per-association tariff rows referenced by chargers through `finance_id`

use super::record::{Audit, Draft, Ownership, Record};
use super::repositories::{RecordRepository, RepositoryProvider};
use crate::shared::errors::RequiredFields;

#[derive(Debug, Clone, PartialEq)]
pub struct FinanceDetail {
    pub finance_id: i32,
    /// Copied from the owning client at creation.
    pub reseller_id: i32,
    pub client_id: i32,
    pub association_id: i32,
    pub rates: FinanceRates,
    pub audit: Audit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FinanceRates {
    pub eb_charge: f64,
    pub app_charge: f64,
    pub parking_charge: f64,
    pub rent_charge: f64,
    pub open_a_eb_charge: f64,
    pub open_other_charge: f64,
    pub gst: f64,
}

impl FinanceRates {
    fn all_finite(&self) -> bool {
        [
            self.eb_charge,
            self.app_charge,
            self.parking_charge,
            self.rent_charge,
            self.open_a_eb_charge,
            self.open_other_charge,
            self.gst,
        ]
        .iter()
        .all(|v| v.is_finite() && *v >= 0.0)
    }
}

impl Record for FinanceDetail {
    type Id = i32;
    const ENTITY: &'static str = "finance";
    const ID_FIELD: &'static str = "finance_id";

    fn id(&self) -> &i32 {
        &self.finance_id
    }

    fn ownership(&self) -> Ownership {
        Ownership {
            reseller_id: Some(self.reseller_id),
            client_id: Some(self.client_id),
            association_id: Some(self.association_id),
        }
    }

    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }

    fn repository(repos: &dyn RepositoryProvider) -> &dyn RecordRepository<Self> {
        repos.finance()
    }
}

/// `owner` must be the full chain of the target association.
#[derive(Debug, Clone)]
pub struct NewFinance {
    pub association_id: i32,
    pub rates: FinanceRates,
}

impl Draft<FinanceDetail> for NewFinance {
    fn missing_fields(&self) -> Vec<&'static str> {
        RequiredFields::new()
            .check("association_id", self.association_id > 0)
            .check("rates", self.rates.all_finite())
            .missing()
    }

    // Several tariffs may exist per association.
    fn natural_key(&self) -> Option<String> {
        None
    }

    fn into_record(self, id: i32, owner: Ownership, audit: Audit) -> FinanceDetail {
        FinanceDetail {
            finance_id: id,
            reseller_id: owner.reseller_id.unwrap_or_default(),
            client_id: owner.client_id.unwrap_or_default(),
            association_id: owner.association_id.unwrap_or(self.association_id),
            rates: self.rates,
            audit,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FinancePatch {
    pub eb_charge: Option<f64>,
    pub app_charge: Option<f64>,
    pub parking_charge: Option<f64>,
    pub rent_charge: Option<f64>,
    pub open_a_eb_charge: Option<f64>,
    pub open_other_charge: Option<f64>,
    pub gst: Option<f64>,
}

impl FinancePatch {
    pub fn apply(self, row: &mut FinanceDetail) {
        let r = &mut row.rates;
        r.eb_charge = self.eb_charge.unwrap_or(r.eb_charge);
        r.app_charge = self.app_charge.unwrap_or(r.app_charge);
        r.parking_charge = self.parking_charge.unwrap_or(r.parking_charge);
        r.rent_charge = self.rent_charge.unwrap_or(r.rent_charge);
        r.open_a_eb_charge = self.open_a_eb_charge.unwrap_or(r.open_a_eb_charge);
        r.open_other_charge = self.open_other_charge.unwrap_or(r.open_other_charge);
        r.gst = self.gst.unwrap_or(r.gst);
    }

    pub fn is_valid(&self) -> bool {
        [
            self.eb_charge,
            self.app_charge,
            self.parking_charge,
            self.rent_charge,
            self.open_a_eb_charge,
            self.open_other_charge,
            self.gst,
        ]
        .into_iter()
        .flatten()
        .all(|v| v.is_finite() && v >= 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_rate_is_reported() {
        let draft = NewFinance {
            association_id: 11,
            rates: FinanceRates {
                gst: -1.0,
                ..FinanceRates::default()
            },
        };
        assert_eq!(draft.missing_fields(), vec!["rates"]);
    }

    #[test]
    fn patch_only_touches_given_rates() {
        let owner = Ownership {
            reseller_id: Some(7),
            client_id: Some(3),
            association_id: Some(11),
        };
        let mut row = NewFinance {
            association_id: 11,
            rates: FinanceRates {
                eb_charge: 8.5,
                gst: 18.0,
                ..FinanceRates::default()
            },
        }
        .into_record(1, owner, Audit::created("acme-ops"));

        FinancePatch {
            gst: Some(12.0),
            ..FinancePatch::default()
        }
        .apply(&mut row);
        assert_eq!(row.rates.gst, 12.0);
        assert_eq!(row.rates.eb_charge, 8.5);
        assert_eq!(row.reseller_id, 7);
    }
}
