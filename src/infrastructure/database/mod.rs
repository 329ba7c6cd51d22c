pub mod entities;
pub mod migrator;
pub mod repositories;

pub use repositories::SeaOrmRepositoryProvider;

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::info;

use crate::shared::retry::{retry_with_backoff, RetryConfig};

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database URL (e.g., "sqlite://./cms-admin.db?mode=rwc")
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://./cms-admin.db?mode=rwc".to_string(),
            max_connections: 10,
            connect_timeout_secs: 10,
        }
    }
}

impl DatabaseConfig {
    /// Create config for SQLite
    pub fn sqlite(path: &str) -> Self {
        Self {
            url: format!("sqlite://{}?mode=rwc", path),
            ..Self::default()
        }
    }

    fn connect_options(&self) -> ConnectOptions {
        let mut opts = ConnectOptions::new(self.url.clone());
        opts.max_connections(self.max_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .sqlx_logging(false);
        opts
    }
}

fn is_connect_error(e: &DbErr) -> bool {
    matches!(e, DbErr::Conn(_) | DbErr::ConnectionAcquire(_))
}

/// Initialize database connection, retrying while the server is unreachable.
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    info!(url = %config.url, "Connecting to database");
    let db = retry_with_backoff(
        RetryConfig::default(),
        || Database::connect(config.connect_options()),
        is_connect_error,
        "database connect",
    )
    .await?;
    info!("Database connected successfully");
    Ok(db)
}
