//! # CMS Admin
//!
//! Administration backend for a multi-tenant charging-station network.
//! Tenants form a three-level hierarchy (reseller, client, association) and
//! every admin sees and changes only the records inside its own subtree.
//!
//! ## Architecture
//!
//! - **domain**: records, ownership, scope resolution and repository traits
//! - **application**: identity check, scoped gateway, id allocation and the per-namespace services
//! - **infrastructure**: SeaORM and in-memory stores, JWT and bcrypt
//! - **interfaces**: REST API with Swagger documentation
//! - **shared**: errors, retry and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::http::create_api_router;
