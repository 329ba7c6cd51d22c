//! Role records

use serde::{Deserialize, Serialize};

use super::record::{Audit, Draft, Ownership, Record};
use super::repositories::{RecordRepository, RepositoryProvider};
use super::scope::AdminRole;
use crate::shared::errors::RequiredFields;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub role_id: i32,
    pub role_name: String,
    #[serde(flatten)]
    pub audit: Audit,
}

impl Role {
    /// The reserved role this record stands for, if any.
    pub fn admin_role(&self) -> Option<AdminRole> {
        AdminRole::from_role_id(self.role_id).filter(|r| r.name() == self.role_name)
    }
}

impl Record for Role {
    type Id = i32;
    const ENTITY: &'static str = "role";
    const ID_FIELD: &'static str = "role_id";

    fn id(&self) -> &i32 {
        &self.role_id
    }

    // Roles are reference data outside the tenant hierarchy.
    fn ownership(&self) -> Ownership {
        Ownership::default()
    }

    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }

    fn natural_key(&self) -> Option<String> {
        Some(self.role_name.clone())
    }

    fn repository(repos: &dyn RepositoryProvider) -> &dyn RecordRepository<Self> {
        repos.roles()
    }
}

#[derive(Debug, Clone)]
pub struct NewRole {
    pub role_name: String,
}

impl Draft<Role> for NewRole {
    fn missing_fields(&self) -> Vec<&'static str> {
        RequiredFields::new().text("role_name", &self.role_name).missing()
    }

    fn natural_key(&self) -> Option<String> {
        Some(self.role_name.trim().to_string())
    }

    fn into_record(self, id: i32, _owner: Ownership, audit: Audit) -> Role {
        Role {
            role_id: id,
            role_name: self.role_name.trim().to_string(),
            audit,
        }
    }
}
