//! Authentication module: one login per admin namespace

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
