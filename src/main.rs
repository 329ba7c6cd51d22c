//! CMS admin server
//!
//! Multi-tenant charging-station administration API. Reads configuration
//! from TOML (~/.config/cms-admin/config.toml by default).

use std::sync::Arc;
use std::time::{Duration, Instant};

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use cms_admin::application::{hash_secret, AdminServices, IdentityService, ScopedGateway, SequenceAllocator};
use cms_admin::config::{default_config_path, AppConfig};
use cms_admin::domain::{AdminRole, DomainResult, NewUser, Ownership, RepositoryProvider, ScopeFilter, User};
use cms_admin::infrastructure::database::migrator::Migrator;
use cms_admin::infrastructure::{init_database, SeaOrmRepositoryProvider};
use cms_admin::interfaces::http::router::{create_api_router, AppState};
use cms_admin::shared::ShutdownCoordinator;

fn init_logging(cfg: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.logging.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if cfg.logging.is_json() {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = default_config_path();
    let (mut app_cfg, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    init_logging(&app_cfg);
    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => error!("Failed to load config: {}. Using defaults.", e),
    }

    if app_cfg.ensure_jwt_secret() {
        warn!("security.jwt_secret is empty; generated a random one, tokens will not survive a restart");
    }

    info!("Starting CMS admin server...");

    // Must be installed before any metrics call.
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder()?;
    info!("Prometheus metrics recorder installed");

    // ── Database ───────────────────────────────────────────────
    let db = match init_database(&app_cfg.database_config()).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
    let gateway = ScopedGateway::new(repos.clone(), Arc::new(SequenceAllocator::new()));

    if let Err(e) = bootstrap_super_admin(&repos, &gateway, &app_cfg).await {
        error!("Failed to create bootstrap super-admin: {}", e);
        return Err(e.into());
    }

    // ── Services and router ────────────────────────────────────
    let jwt_config = app_cfg.jwt_config();
    info!("JWT configured with {}h token expiration", jwt_config.expiration_hours);

    let state = AppState {
        services: AdminServices::new(gateway, app_cfg.security.bcrypt_cost),
        identity: Arc::new(IdentityService::new(repos.clone(), jwt_config, app_cfg.security.bcrypt_cost)?),
        repos,
        started_at: Instant::now(),
    };
    let router = create_api_router(
        state,
        Some(prometheus_handle),
        Duration::from_secs(app_cfg.server.request_timeout_secs),
    );

    // ── Serve with graceful shutdown ───────────────────────────
    let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout_secs);
    shutdown.start_signal_listener();
    let signal = shutdown.signal();

    let addr = app_cfg.server.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("HTTP server listening on http://{}", addr);
    info!("Swagger UI available at http://{}/docs/", addr);

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            signal.wait().await;
            info!("HTTP server received shutdown signal");
        })
        .await;
    if let Err(e) = &served {
        error!("HTTP server error: {}", e);
    }

    info!("Performing final cleanup...");
    let closed = shutdown
        .cleanup(async move {
            if let Err(e) = db.close().await {
                warn!("Error closing database connection: {}", e);
            } else {
                info!("Database connection closed");
            }
        })
        .await;
    if !closed {
        warn!("Database close did not finish in time");
    }

    info!("CMS admin server shutdown complete");
    served.map_err(Into::into)
}

/// Creates the configured super-admin if the user table is empty.
async fn bootstrap_super_admin(
    repos: &Arc<dyn RepositoryProvider>,
    gateway: &ScopedGateway,
    cfg: &AppConfig,
) -> DomainResult<()> {
    let existing = repos.users().find_scoped(&ScopeFilter::Global).await?;
    if !existing.is_empty() {
        return Ok(());
    }

    info!("Creating bootstrap super-admin...");
    let boot = &cfg.bootstrap;
    let draft = NewUser {
        role_id: AdminRole::SuperAdmin.role_id(),
        username: boot.super_admin_username.clone(),
        email_id: boot.super_admin_email.clone(),
        password_hash: hash_secret(boot.super_admin_password.clone(), cfg.security.bcrypt_cost).await?,
        phone_no: None,
        wallet_balance: None,
    };
    let user: User = gateway
        .create(draft, Ownership::default(), &ScopeFilter::Global, "system")
        .await?;

    info!(user_id = user.user_id, email = %user.email_id, "Bootstrap super-admin created");
    warn!("Change the bootstrap super-admin password immediately");
    Ok(())
}
