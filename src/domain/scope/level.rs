//! Admin roles and tenant levels

use serde::{Deserialize, Serialize};

/// A node type in the tenant hierarchy, ordered from the top down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenantLevel {
    Reseller,
    Client,
    Association,
}

impl TenantLevel {
    pub const ALL: [TenantLevel; 3] = [Self::Reseller, Self::Client, Self::Association];

    /// The level one step further down the hierarchy.
    pub fn child(self) -> Option<TenantLevel> {
        match self {
            Self::Reseller => Some(Self::Client),
            Self::Client => Some(Self::Association),
            Self::Association => None,
        }
    }

    /// The level one step further up.
    pub fn parent(self) -> Option<TenantLevel> {
        match self {
            Self::Reseller => None,
            Self::Client => Some(Self::Reseller),
            Self::Association => Some(Self::Client),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reseller => "reseller",
            Self::Client => "client",
            Self::Association => "association",
        }
    }

    pub fn id_field(self) -> &'static str {
        match self {
            Self::Reseller => "reseller_id",
            Self::Client => "client_id",
            Self::Association => "association_id",
        }
    }
}

impl std::fmt::Display for TenantLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The reserved roles. Their ids are seeded by migration and never reallocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminRole {
    SuperAdmin,
    ResellerAdmin,
    ClientAdmin,
    AssociationAdmin,
    EndUser,
}

impl AdminRole {
    pub const ALL: [AdminRole; 5] = [
        Self::SuperAdmin,
        Self::ResellerAdmin,
        Self::ClientAdmin,
        Self::AssociationAdmin,
        Self::EndUser,
    ];

    pub fn role_id(self) -> i32 {
        match self {
            Self::SuperAdmin => 1,
            Self::ResellerAdmin => 2,
            Self::ClientAdmin => 3,
            Self::AssociationAdmin => 4,
            Self::EndUser => 5,
        }
    }

    pub fn from_role_id(id: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.role_id() == id)
    }

    /// Stored `role_name`, also the login namespace.
    pub fn name(self) -> &'static str {
        match self {
            Self::SuperAdmin => "superadmin",
            Self::ResellerAdmin => "reselleradmin",
            Self::ClientAdmin => "clientadmin",
            Self::AssociationAdmin => "associationadmin",
            Self::EndUser => "user",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.name() == name)
    }

    /// Tenant level a user of this role is scoped to. `None` means global.
    pub fn level(self) -> Option<TenantLevel> {
        match self {
            Self::SuperAdmin => None,
            Self::ResellerAdmin => Some(TenantLevel::Reseller),
            Self::ClientAdmin => Some(TenantLevel::Client),
            Self::AssociationAdmin | Self::EndUser => Some(TenantLevel::Association),
        }
    }

    /// Roles a caller of this role may create and manage.
    pub fn manageable_roles(self) -> &'static [AdminRole] {
        match self {
            Self::SuperAdmin => &[Self::SuperAdmin, Self::ResellerAdmin],
            Self::ResellerAdmin => &[Self::ResellerAdmin, Self::ClientAdmin],
            Self::ClientAdmin => &[Self::ClientAdmin, Self::AssociationAdmin],
            Self::AssociationAdmin => &[Self::AssociationAdmin, Self::EndUser],
            Self::EndUser => &[],
        }
    }

    pub fn can_manage(self, role_id: i32) -> bool {
        self.manageable_roles().iter().any(|r| r.role_id() == role_id)
    }
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_ids_round_trip() {
        for role in AdminRole::ALL {
            assert_eq!(AdminRole::from_role_id(role.role_id()), Some(role));
            assert_eq!(AdminRole::from_name(role.name()), Some(role));
        }
        assert_eq!(AdminRole::from_role_id(42), None);
    }

    #[test]
    fn each_admin_manages_own_and_next_level() {
        assert!(AdminRole::ResellerAdmin.can_manage(3));
        assert!(!AdminRole::ResellerAdmin.can_manage(4));
        assert!(AdminRole::AssociationAdmin.can_manage(5));
        assert!(!AdminRole::ClientAdmin.can_manage(1));
        assert!(AdminRole::EndUser.manageable_roles().is_empty());
    }

    #[test]
    fn levels_are_ordered_top_down() {
        assert!(TenantLevel::Reseller < TenantLevel::Client);
        assert_eq!(TenantLevel::Client.child(), Some(TenantLevel::Association));
        assert_eq!(TenantLevel::Association.child(), None);
        assert_eq!(TenantLevel::Association.parent(), Some(TenantLevel::Client));
    }
}
