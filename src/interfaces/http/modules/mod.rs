pub mod auth;
pub mod chargers;
pub mod finance;
pub mod health;
pub mod metrics;
pub mod profile;
pub mod request_id;
pub mod roles;
pub mod tenants;
pub mod users;
