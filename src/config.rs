//! Application configuration
//!
//! Loaded from a TOML file (`$CMS_ADMIN_CONFIG`, or
//! `~/.config/cms-admin/config.toml`), then overridden by `DATABASE_URL`,
//! `JWT_SECRET` and `HTTP_PORT`. Every section falls back to defaults, so a
//! missing file is not an error.

use std::path::{Path, PathBuf};

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Deserialize;
use thiserror::Error;

use crate::infrastructure::crypto::JwtConfig;
use crate::infrastructure::DatabaseConfig;

pub const CONFIG_ENV: &str = "CMS_ADMIN_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid value for {key}: {value}")]
    Env { key: &'static str, value: String },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub security: SecurityConfig,
    pub logging: LoggingConfig,
    pub bootstrap: BootstrapConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 30,
            shutdown_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: DatabaseConfig::default().url,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Empty means "generate one at startup".
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub bcrypt_cost: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_expiration_hours: 24,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `text` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

/// Super-admin created when the user table is empty.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    pub super_admin_email: String,
    pub super_admin_username: String,
    pub super_admin_password: String,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            super_admin_email: "admin@cms.local".to_string(),
            super_admin_username: "superadmin".to_string(),
            super_admin_password: "change-me-now".to_string(),
        }
    }
}

impl AppConfig {
    /// Reads `path` (defaults if it does not exist) and applies env overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut cfg = if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            Self::from_toml(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            Self::default()
        };
        cfg.apply_env(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(url) = var("DATABASE_URL").filter(|v| !v.is_empty()) {
            self.database.url = url;
        }
        if let Some(secret) = var("JWT_SECRET").filter(|v| !v.is_empty()) {
            self.security.jwt_secret = secret;
        }
        if let Some(port) = var("HTTP_PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::Env {
                key: "HTTP_PORT",
                value: port,
            })?;
        }
        Ok(())
    }

    /// Fills an empty JWT secret with a random one. Returns true if it did.
    pub fn ensure_jwt_secret(&mut self) -> bool {
        if !self.security.jwt_secret.is_empty() {
            return false;
        }
        self.security.jwt_secret = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(48)
            .map(char::from)
            .collect();
        true
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database.url.clone(),
            ..DatabaseConfig::default()
        }
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig::new(
            self.security.jwt_secret.clone(),
            self.security.jwt_expiration_hours,
        )
    }
}

/// `$CMS_ADMIN_CONFIG`, else `<config dir>/cms-admin/config.toml`.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cms-admin")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let cfg = AppConfig::from_toml(
            r#"
            [server]
            port = 9100

            [logging]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.request_timeout_secs, 30);
        assert!(cfg.logging.is_json());
        assert_eq!(cfg.security.jwt_expiration_hours, 24);
        assert_eq!(cfg.bootstrap.super_admin_username, "superadmin");
    }

    #[test]
    fn unparsable_file_is_an_error() {
        assert!(AppConfig::from_toml("[server\nport = ").is_err());
        assert!(AppConfig::from_toml("[server]\nport = \"eighty\"").is_err());
    }

    #[test]
    fn missing_file_uses_defaults() {
        let cfg = AppConfig::load(Path::new("/nonexistent/cms-admin/config.toml")).unwrap();
        assert_eq!(cfg.database.url, DatabaseConfig::default().url);
    }

    #[test]
    fn env_overrides_win() {
        let env: HashMap<&str, &str> = [
            ("DATABASE_URL", "sqlite::memory:"),
            ("JWT_SECRET", "from-env"),
            ("HTTP_PORT", "7000"),
        ]
        .into();
        let mut cfg = AppConfig::default();
        cfg.apply_env(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(cfg.database.url, "sqlite::memory:");
        assert_eq!(cfg.security.jwt_secret, "from-env");
        assert_eq!(cfg.server.address(), "0.0.0.0:7000");
    }

    #[test]
    fn bad_port_override_is_rejected() {
        let mut cfg = AppConfig::default();
        let err = cfg
            .apply_env(|k| (k == "HTTP_PORT").then(|| "http".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Env { key: "HTTP_PORT", .. }));
    }

    #[test]
    fn empty_secret_is_generated_once() {
        let mut cfg = AppConfig::default();
        assert!(cfg.ensure_jwt_secret());
        assert_eq!(cfg.security.jwt_secret.len(), 48);
        let first = cfg.security.jwt_secret.clone();
        assert!(!cfg.ensure_jwt_secret());
        assert_eq!(cfg.security.jwt_secret, first);
    }
}
