pub mod jwt;
pub mod password;

pub use jwt::{create_token, verify_token, JwtConfig, TokenClaims};
pub use password::{dummy_hash, hash_password, verify_dummy, verify_password};
