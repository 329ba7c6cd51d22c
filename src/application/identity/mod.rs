//! Identity module: credential check and token issue
//!
//! Contains the `IdentityService`, which verifies an (email, secret,
//! namespace) triple and produces the caller's scope.

pub mod service;

pub use service::{hash_secret, AuthResult, IdentityService, LoginSession, TenantRef};
