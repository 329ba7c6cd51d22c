//! JWT Token handling

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::{AdminRole, Ownership};

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token expiration time in hours
    pub expiration_hours: i64,
    /// Issuer claim
    pub issuer: String,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, expiration_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            expiration_hours,
            issuer: "cms-admin".to_string(),
        }
    }
}

/// JWT TokenClaims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: i32,
    pub username: String,
    /// Role name, also the namespace the token is valid for
    pub role: String,
    pub role_id: i32,
    pub reseller_id: Option<i32>,
    pub client_id: Option<i32>,
    pub association_id: Option<i32>,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
}

impl TokenClaims {
    pub fn new(
        user_id: i32,
        username: &str,
        role: AdminRole,
        scope_ids: Ownership,
        config: &JwtConfig,
    ) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(config.expiration_hours);

        Self {
            sub: user_id,
            username: username.to_string(),
            role: role.name().to_string(),
            role_id: role.role_id(),
            reseller_id: scope_ids.reseller_id,
            client_id: scope_ids.client_id,
            association_id: scope_ids.association_id,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: config.issuer.clone(),
        }
    }

    /// The role named by the token, if the name and id agree.
    pub fn admin_role(&self) -> Option<AdminRole> {
        AdminRole::from_role_id(self.role_id).filter(|r| r.name() == self.role)
    }

    pub fn scope_ids(&self) -> Ownership {
        Ownership {
            reseller_id: self.reseller_id,
            client_id: self.client_id,
            association_id: self.association_id,
        }
    }
}

/// Create a JWT token from prepared claims
pub fn create_token(
    claims: &TokenClaims,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify and decode a JWT token
pub fn verify_token(
    token: &str,
    config: &JwtConfig,
) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.issuer]);

    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}
