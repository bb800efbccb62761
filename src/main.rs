//! Account Service
//!
//! HTTP server for user accounts, sessions and admin promotion requests.
//! Reads configuration from a TOML file (~/.config/account-service/config.toml).

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{error, info, warn};

use account_service::config::AppConfig;
use account_service::application::{RegisterUser, UserService};
use account_service::domain::{DomainError, RepositoryProvider};
use account_service::infrastructure::JwtConfig;
use account_service::interfaces::http::LoginThrottleConfig;
use account_service::shared::shutdown::ShutdownCoordinator;
use account_service::{
    create_api_router, default_config_path, init_database, run_migrations, LoginThrottle,
    SeaOrmRepositoryProvider,
};

/// How often expired login-throttle windows are dropped
const THROTTLE_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

fn init_tracing(cfg: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level));

    if cfg.logging.is_json() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
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
    app_cfg.apply_env_overrides();

    init_tracing(&app_cfg);
    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => warn!("Failed to load config: {}. Using defaults.", e),
    }

    info!("Starting Account Service...");

    if app_cfg.security.jwt_secret.is_empty() {
        return Err("security.jwt_secret (or JWT_SECRET) must be set".into());
    }
    if app_cfg.security.jwt_secret == JwtConfig::default().secret {
        warn!("Using the built-in JWT secret; set JWT_SECRET outside development");
    }

    // ── Prometheus metrics recorder (must be installed before any metrics calls) ──
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus metrics recorder: {}", e))?;
    info!("Prometheus metrics recorder installed");

    // ── Database ───────────────────────────────────────────────
    let db_config = app_cfg.database_config();
    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = run_migrations(&db).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

    if app_cfg.admin.enabled {
        create_default_admin(repos.clone(), &app_cfg).await;
    }

    // Initialize shutdown coordinator
    let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
    let shutdown_signal = shutdown.signal();

    // Start listening for shutdown signals (SIGTERM, SIGINT)
    shutdown.start_signal_listener();

    // ── Login throttle + expiry sweep ──────────────────────────
    let throttle = LoginThrottle::shared(LoginThrottleConfig::from(&app_cfg.rate_limit));
    {
        let throttle = throttle.clone();
        let sweep_shutdown = shutdown_signal.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(THROTTLE_SWEEP_INTERVAL);
            loop {
                tokio::select! {
                    _ = ticker.tick() => throttle.purge_expired(Instant::now()),
                    _ = sweep_shutdown.wait() => break,
                }
            }
        });
    }

    // Create REST API router
    let api_router = create_api_router(
        repos,
        db.clone(),
        &app_cfg,
        prometheus_handle,
        throttle,
    );

    // Start REST API server with graceful shutdown
    let api_addr = app_cfg.server.address();
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("REST API server listening on http://{}", api_addr);
    info!("Swagger UI available at http://{}/docs/", api_addr);

    let api_shutdown = shutdown_signal.clone();
    let result = axum::serve(
        listener,
        api_router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        api_shutdown.wait().await;
        info!("REST API server received shutdown signal");
    })
    .await;

    if let Err(e) = &result {
        error!("REST API server error: {}", e);
    }

    // Perform final cleanup
    info!("Performing final cleanup...");
    shutdown
        .cleanup_within_timeout(async {
            if let Err(e) = db.close().await {
                warn!("Error closing database connection: {}", e);
            } else {
                info!("Database connection closed");
            }
        })
        .await;

    info!("Account Service shutdown complete");
    result.map_err(Into::into)
}

/// Create the configured admin account unless an active user already has its email
async fn create_default_admin(repos: Arc<dyn RepositoryProvider>, app_cfg: &AppConfig) {
    let admin = &app_cfg.admin;
    let users = UserService::new(repos, app_cfg.jwt_config());

    let input = RegisterUser {
        username: admin.username.clone(),
        email: admin.email.clone(),
        full_name: None,
        password: admin.password.clone(),
    };

    match users.ensure_admin_account(input).await {
        Ok(Some(user)) => {
            info!(user_id = %user.id, "Default admin created: {}", user.email);
            info!("Please change the admin password immediately!");
        }
        Ok(None) => {}
        Err(DomainError::Validation(msg)) => {
            warn!("Bootstrap admin enabled but its settings are invalid, skipping: {}", msg);
        }
        Err(e) => {
            error!("Failed to create admin user: {}", e);
        }
    }
}
