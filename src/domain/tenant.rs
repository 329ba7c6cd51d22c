//! Tenant nodes: resellers own clients, clients own associations.
//!
//! Parent ids are fixed at creation. An association's `reseller_id` is copied
//! from its client when the row is created and no update path touches it.

use super::record::{Audit, Draft, Ownership, Record};
use super::repositories::{RecordRepository, RepositoryProvider};
use super::scope::TenantLevel;
use super::user::normalize_email;
use crate::shared::errors::RequiredFields;

/// A node of the tenant hierarchy.
pub trait Tenant: Record<Id = i32> {
    const LEVEL: TenantLevel;

    fn display_name(&self) -> &str;

    /// Applies contact changes; name, phone and address are the only
    /// mutable columns of a tenant row.
    fn apply_contact(&mut self, patch: &ContactPatch);
}

#[derive(Debug, Clone, Default)]
pub struct ContactPatch {
    pub name: Option<String>,
    pub phone_no: Option<String>,
    pub address: Option<String>,
}

fn set_if(target: &mut String, value: &Option<String>) {
    if let Some(v) = value {
        *target = v.trim().to_string();
    }
}

/// Contact details supplied when creating any tenant node.
#[derive(Debug, Clone)]
pub struct NewTenant {
    pub name: String,
    pub phone_no: String,
    pub email_id: String,
    pub address: String,
}

impl NewTenant {
    fn missing(&self, prefix: TenantLevel) -> Vec<&'static str> {
        let (name, phone, email, address) = match prefix {
            TenantLevel::Reseller => (
                "reseller_name",
                "reseller_phone_no",
                "reseller_email_id",
                "reseller_address",
            ),
            TenantLevel::Client => (
                "client_name",
                "client_phone_no",
                "client_email_id",
                "client_address",
            ),
            TenantLevel::Association => (
                "association_name",
                "association_phone_no",
                "association_email_id",
                "association_address",
            ),
        };
        RequiredFields::new()
            .text(name, &self.name)
            .text(phone, &self.phone_no)
            .text(email, &self.email_id)
            .text(address, &self.address)
            .missing()
    }
}

// ── Reseller ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Reseller {
    pub reseller_id: i32,
    pub reseller_name: String,
    pub reseller_phone_no: String,
    pub reseller_email_id: String,
    pub reseller_address: String,
    pub audit: Audit,
}

impl Record for Reseller {
    type Id = i32;
    const ENTITY: &'static str = "reseller";
    const ID_FIELD: &'static str = "reseller_id";

    fn id(&self) -> &i32 {
        &self.reseller_id
    }

    fn ownership(&self) -> Ownership {
        Ownership {
            reseller_id: Some(self.reseller_id),
            ..Ownership::default()
        }
    }

    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }

    fn natural_key(&self) -> Option<String> {
        Some(self.reseller_email_id.clone())
    }

    fn repository(repos: &dyn RepositoryProvider) -> &dyn RecordRepository<Self> {
        repos.resellers()
    }
}

impl Tenant for Reseller {
    const LEVEL: TenantLevel = TenantLevel::Reseller;

    fn display_name(&self) -> &str {
        &self.reseller_name
    }

    fn apply_contact(&mut self, patch: &ContactPatch) {
        set_if(&mut self.reseller_name, &patch.name);
        set_if(&mut self.reseller_phone_no, &patch.phone_no);
        set_if(&mut self.reseller_address, &patch.address);
    }
}

impl Draft<Reseller> for NewTenant {
    fn missing_fields(&self) -> Vec<&'static str> {
        self.missing(TenantLevel::Reseller)
    }

    fn natural_key(&self) -> Option<String> {
        Some(normalize_email(&self.email_id))
    }

    fn into_record(self, id: i32, _owner: Ownership, audit: Audit) -> Reseller {
        Reseller {
            reseller_id: id,
            reseller_name: self.name.trim().to_string(),
            reseller_phone_no: self.phone_no.trim().to_string(),
            reseller_email_id: normalize_email(&self.email_id),
            reseller_address: self.address.trim().to_string(),
            audit,
        }
    }
}

// ── Client ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    pub client_id: i32,
    pub reseller_id: i32,
    pub client_name: String,
    pub client_phone_no: String,
    pub client_email_id: String,
    pub client_address: String,
    pub audit: Audit,
}

impl Record for Client {
    type Id = i32;
    const ENTITY: &'static str = "client";
    const ID_FIELD: &'static str = "client_id";

    fn id(&self) -> &i32 {
        &self.client_id
    }

    fn ownership(&self) -> Ownership {
        Ownership {
            reseller_id: Some(self.reseller_id),
            client_id: Some(self.client_id),
            association_id: None,
        }
    }

    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }

    fn natural_key(&self) -> Option<String> {
        Some(self.client_email_id.clone())
    }

    fn repository(repos: &dyn RepositoryProvider) -> &dyn RecordRepository<Self> {
        repos.clients()
    }
}

impl Tenant for Client {
    const LEVEL: TenantLevel = TenantLevel::Client;

    fn display_name(&self) -> &str {
        &self.client_name
    }

    fn apply_contact(&mut self, patch: &ContactPatch) {
        set_if(&mut self.client_name, &patch.name);
        set_if(&mut self.client_phone_no, &patch.phone_no);
        set_if(&mut self.client_address, &patch.address);
    }
}

/// `owner.reseller_id` must be set by the caller's scope.
impl Draft<Client> for NewTenant {
    fn missing_fields(&self) -> Vec<&'static str> {
        self.missing(TenantLevel::Client)
    }

    fn natural_key(&self) -> Option<String> {
        Some(normalize_email(&self.email_id))
    }

    fn into_record(self, id: i32, owner: Ownership, audit: Audit) -> Client {
        Client {
            client_id: id,
            reseller_id: owner.reseller_id.unwrap_or_default(),
            client_name: self.name.trim().to_string(),
            client_phone_no: self.phone_no.trim().to_string(),
            client_email_id: normalize_email(&self.email_id),
            client_address: self.address.trim().to_string(),
            audit,
        }
    }
}

// ── Association ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Association {
    pub association_id: i32,
    pub client_id: i32,
    /// Copied from the owning client at creation.
    pub reseller_id: i32,
    pub association_name: String,
    pub association_phone_no: String,
    pub association_email_id: String,
    pub association_address: String,
    pub audit: Audit,
}

impl Record for Association {
    type Id = i32;
    const ENTITY: &'static str = "association";
    const ID_FIELD: &'static str = "association_id";

    fn id(&self) -> &i32 {
        &self.association_id
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

    fn natural_key(&self) -> Option<String> {
        Some(self.association_email_id.clone())
    }

    fn repository(repos: &dyn RepositoryProvider) -> &dyn RecordRepository<Self> {
        repos.associations()
    }
}

impl Tenant for Association {
    const LEVEL: TenantLevel = TenantLevel::Association;

    fn display_name(&self) -> &str {
        &self.association_name
    }

    fn apply_contact(&mut self, patch: &ContactPatch) {
        set_if(&mut self.association_name, &patch.name);
        set_if(&mut self.association_phone_no, &patch.phone_no);
        set_if(&mut self.association_address, &patch.address);
    }
}

/// `owner` must carry the parent client's chain.
impl Draft<Association> for NewTenant {
    fn missing_fields(&self) -> Vec<&'static str> {
        self.missing(TenantLevel::Association)
    }

    fn natural_key(&self) -> Option<String> {
        Some(normalize_email(&self.email_id))
    }

    fn into_record(self, id: i32, owner: Ownership, audit: Audit) -> Association {
        Association {
            association_id: id,
            client_id: owner.client_id.unwrap_or_default(),
            reseller_id: owner.reseller_id.unwrap_or_default(),
            association_name: self.name.trim().to_string(),
            association_phone_no: self.phone_no.trim().to_string(),
            association_email_id: normalize_email(&self.email_id),
            association_address: self.address.trim().to_string(),
            audit,
        }
    }
}
