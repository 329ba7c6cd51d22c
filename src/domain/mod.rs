pub mod charger;
pub mod finance;
pub mod record;
pub mod repositories;
pub mod role;
pub mod scope;
pub mod session;
pub mod tenant;
pub mod user;

// Re-export commonly used types
pub use charger::{AssignmentTarget, Charger, ChargerPatch, DevicePatch, NewCharger};
pub use finance::{FinanceDetail, FinancePatch, FinanceRates, NewFinance};
pub use record::{Audit, Draft, Ownership, Record, RecordId, UpdateOutcome};
pub use repositories::{DomainResult, RecordRepository, RepositoryProvider, SessionRepository};
pub use role::{NewRole, Role};
pub use scope::{resolve_scope, AdminRole, Caller, ChargerView, ScopeFilter, TenantLevel};
pub use session::DeviceSession;
pub use tenant::{Association, Client, ContactPatch, NewTenant, Reseller, Tenant};
pub use user::{normalize_email, NewUser, User, UserPatch};

pub use crate::shared::errors::DomainError;
