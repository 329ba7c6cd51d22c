//! Per-namespace admin services
//!
//! Each service is a thin policy layer over [`ScopedGateway`]: it decides
//! which operations a role may run and which parent chain a new row hangs
//! off, and leaves visibility to the caller's scope filter.

mod chargers;
mod finance;
mod profile;
mod roles;
mod tenants;
mod users;

pub use chargers::{AllocatedCharger, ChargerAdminService, ChargerSessions};
pub use finance::FinanceAdminService;
pub use profile::{OwnProfilePatch, Profile, ProfileService, TenantProfile};
pub use roles::RoleAdminService;
pub use tenants::TenantAdminService;
pub use users::{CreateUserInput, UpdateUserInput, UserAdminService};

use super::gateway::ScopedGateway;

/// Every admin service over one shared gateway.
#[derive(Clone)]
pub struct AdminServices {
    pub users: UserAdminService,
    pub tenants: TenantAdminService,
    pub chargers: ChargerAdminService,
    pub finance: FinanceAdminService,
    pub profile: ProfileService,
    pub roles: RoleAdminService,
}

impl AdminServices {
    pub fn new(gateway: ScopedGateway, bcrypt_cost: u32) -> Self {
        Self {
            users: UserAdminService::new(gateway.clone(), bcrypt_cost),
            tenants: TenantAdminService::new(gateway.clone()),
            chargers: ChargerAdminService::new(gateway.clone()),
            finance: FinanceAdminService::new(gateway.clone()),
            profile: ProfileService::new(gateway.clone(), bcrypt_cost),
            roles: RoleAdminService::new(gateway),
        }
    }
}

/// A small seeded tenant tree on the in-memory store.
///
/// Reseller "Volt" owns client "Acme", which owns associations "Depot" and
/// "Yard". A second reseller owns one more client. Each admin level has a
/// real user row.
#[cfg(test)]
pub(crate) mod testkit {
    use std::sync::Arc;

    use super::*;
    use crate::application::identity::hash_secret;
    use crate::application::sequence::SequenceAllocator;
    use crate::domain::{
        AdminRole, Association, Caller, Charger, Client, FinanceDetail, FinanceRates, NewCharger,
        NewFinance, NewTenant, NewUser, Ownership, Record, Reseller, ScopeFilter, User,
    };
    use crate::infrastructure::storage::InMemoryRepositoryProvider;

    pub const TEST_COST: u32 = 4;

    pub fn contact(name: &str) -> NewTenant {
        NewTenant {
            name: name.to_string(),
            phone_no: "+1 555 0100".into(),
            email_id: format!("{}@tenant.test", name.to_lowercase().replace(' ', "-")),
            address: "1 Main St".into(),
        }
    }

    pub fn rates() -> FinanceRates {
        FinanceRates {
            eb_charge: 8.5,
            app_charge: 1.0,
            parking_charge: 0.5,
            rent_charge: 2.0,
            open_a_eb_charge: 9.0,
            open_other_charge: 1.5,
            gst: 18.0,
        }
    }

    pub struct Kit {
        pub store: Arc<InMemoryRepositoryProvider>,
        pub gateway: ScopedGateway,
        pub reseller: Reseller,
        pub other_reseller: Reseller,
        pub client: Client,
        pub other_client: Client,
        pub association: Association,
        pub other_association: Association,
        root: User,
        reseller_user: User,
        client_user: User,
        association_user: User,
    }

    impl Kit {
        pub async fn new() -> Self {
            let store = Arc::new(InMemoryRepositoryProvider::new());
            let gateway = ScopedGateway::new(store.clone(), Arc::new(SequenceAllocator::new()));
            let global = ScopeFilter::Global;

            let reseller: Reseller = gateway
                .create(contact("Volt"), Ownership::default(), &global, "root")
                .await
                .unwrap();
            let other_reseller: Reseller = gateway
                .create(contact("Spark"), Ownership::default(), &global, "root")
                .await
                .unwrap();
            let client: Client = gateway
                .create(contact("Acme"), reseller.ownership(), &global, "root")
                .await
                .unwrap();
            let other_client: Client = gateway
                .create(contact("Globex"), other_reseller.ownership(), &global, "root")
                .await
                .unwrap();
            let association: Association = gateway
                .create(contact("Depot"), client.ownership(), &global, "root")
                .await
                .unwrap();
            let other_association: Association = gateway
                .create(contact("Yard"), client.ownership(), &global, "root")
                .await
                .unwrap();

            let hash = hash_secret("admin-secret".into(), TEST_COST).await.unwrap();
            let mut users = Vec::new();
            for (role, name, email, owner) in [
                (AdminRole::SuperAdmin, "root", "root@cms.test", Ownership::default()),
                (AdminRole::ResellerAdmin, "volt-admin", "admin@volt.test", reseller.ownership()),
                (AdminRole::ClientAdmin, "acme-admin", "admin@acme.test", client.ownership()),
                (
                    AdminRole::AssociationAdmin,
                    "depot-admin",
                    "admin@depot.test",
                    association.ownership(),
                ),
            ] {
                let draft = NewUser {
                    role_id: role.role_id(),
                    username: name.into(),
                    email_id: email.into(),
                    password_hash: hash.clone(),
                    phone_no: None,
                    wallet_balance: Some(25.0),
                };
                let user: User = gateway.create(draft, owner, &global, "root").await.unwrap();
                users.push(user);
            }
            let [root, reseller_user, client_user, association_user]: [User; 4] =
                users.try_into().unwrap();

            Self {
                store,
                gateway,
                reseller,
                other_reseller,
                client,
                other_client,
                association,
                other_association,
                root,
                reseller_user,
                client_user,
                association_user,
            }
        }

        fn caller_from(user: &User) -> Caller {
            let role = user.admin_role().unwrap();
            Caller::new(user.user_id, user.username.clone(), role, user.ownership()).unwrap()
        }

        pub fn super_admin(&self) -> Caller {
            Self::caller_from(&self.root)
        }

        pub fn reseller_admin(&self) -> Caller {
            Self::caller_from(&self.reseller_user)
        }

        pub fn client_admin(&self) -> Caller {
            Self::caller_from(&self.client_user)
        }

        pub fn association_admin(&self) -> Caller {
            Self::caller_from(&self.association_user)
        }

        // Callers without a user row, for nodes created during a test.

        pub fn caller_for_reseller(&self, reseller: &Reseller) -> Caller {
            Caller::new(0, "reseller-ops", AdminRole::ResellerAdmin, reseller.ownership()).unwrap()
        }

        pub fn caller_for_client(&self, client: &Client) -> Caller {
            Caller::new(0, "client-ops", AdminRole::ClientAdmin, client.ownership()).unwrap()
        }

        pub fn caller_for_association(&self, association: &Association) -> Caller {
            Caller::new(
                0,
                "association-ops",
                AdminRole::AssociationAdmin,
                association.ownership(),
            )
            .unwrap()
        }

        pub fn users(&self) -> UserAdminService {
            UserAdminService::new(self.gateway.clone(), TEST_COST)
        }

        pub fn tenants(&self) -> TenantAdminService {
            TenantAdminService::new(self.gateway.clone())
        }

        pub fn chargers(&self) -> ChargerAdminService {
            ChargerAdminService::new(self.gateway.clone())
        }

        pub fn finance(&self) -> FinanceAdminService {
            FinanceAdminService::new(self.gateway.clone())
        }

        pub fn profile(&self) -> ProfileService {
            ProfileService::new(self.gateway.clone(), TEST_COST)
        }

        pub fn roles(&self) -> RoleAdminService {
            RoleAdminService::new(self.gateway.clone())
        }

        /// An unassigned charger.
        pub async fn add_charger(&self, charger_id: &str) -> Charger {
            let draft = NewCharger {
                charger_id: charger_id.to_string(),
                model: "AC22".into(),
                vendor: "Volt".into(),
                charger_type: "AC".into(),
                gun_connector: Some(2),
                max_current: Some(32.0),
                max_power: Some(22.0),
                socket_count: Some(2),
            };
            self.gateway
                .create_keyed(
                    draft,
                    charger_id.to_string(),
                    Ownership::default(),
                    &ScopeFilter::Global,
                    "root",
                )
                .await
                .unwrap()
        }

        pub async fn add_finance(&self, association_id: i32) -> FinanceDetail {
            let owner = self
                .gateway
                .get::<Association>(&association_id, &ScopeFilter::Global)
                .await
                .unwrap()
                .ownership();
            let draft = NewFinance {
                association_id,
                rates: rates(),
            };
            self.gateway
                .create(draft, owner, &ScopeFilter::Global, "acme-admin")
                .await
                .unwrap()
        }
    }
}
