//! Database entities module

pub mod association_details;
pub mod charger_details;
pub mod client_details;
pub mod device_session_details;
pub mod finance_details;
pub mod reseller_details;
pub mod user_roles;
pub mod users;

pub use association_details::Entity as AssociationDetails;
pub use charger_details::Entity as ChargerDetails;
pub use client_details::Entity as ClientDetails;
pub use device_session_details::Entity as DeviceSessionDetails;
pub use finance_details::Entity as FinanceDetails;
pub use reseller_details::Entity as ResellerDetails;
pub use user_roles::Entity as UserRoles;
pub use users::Entity as Users;
