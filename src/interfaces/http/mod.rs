//! HTTP REST API
//!
//! - `common`: response envelope, error mapping and the validating JSON extractor
//! - `middleware`: bearer-token authentication per namespace
//! - `modules`: handlers and DTOs per resource
//! - `router`: namespace routers with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiDoc, AppState};
