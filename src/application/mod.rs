//! Application layer: identity, the scoped gateway and the admin services

pub mod admin;
pub mod gateway;
pub mod identity;
pub mod sequence;

// Re-export key types for convenience
pub use admin::{
    AdminServices, ChargerAdminService, FinanceAdminService, ProfileService, RoleAdminService,
    TenantAdminService, UserAdminService,
};
pub use gateway::{AssignmentResult, ScopedGateway};
pub use identity::{hash_secret, AuthResult, IdentityService, LoginSession, TenantRef};
pub use sequence::SequenceAllocator;
