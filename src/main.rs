//! AdminHub server entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use adminhub_api::{AppState, build_router};
use adminhub_auth::device::LocalRegionResolver;
use adminhub_auth::jwt::TokenCodec;
use adminhub_auth::principal::AccountDirectory;
use adminhub_auth::session::{SessionManager, SessionPolicy, SessionStore, TracingAuditor};
use adminhub_cache::CacheManager;
use adminhub_core::config::AppConfig;
use adminhub_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from `config/default.toml`, the `ADMINHUB_ENV`
/// overlay, and `ADMINHUB__*` environment variables
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("ADMINHUB_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting AdminHub v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Session store ────────────────────────────────────
    tracing::info!(provider = %config.cache.provider, "Initializing session store");
    let cache = Arc::new(CacheManager::new(&config.cache).await?);
    let store = SessionStore::new(cache, config.session.store_timeout());

    // ── Step 2: Token codec and session manager ──────────────────
    let codec = Arc::new(TokenCodec::new(&config.auth));
    let policy = SessionPolicy::from_config(&config.auth);
    tracing::info!(
        access_ttl_secs = policy.access_ttl.as_secs(),
        refresh_ttl_secs = policy.refresh_ttl.as_secs(),
        single_login = policy.single_login,
        "Session policy"
    );
    let session_manager = Arc::new(SessionManager::new(
        codec,
        store,
        Arc::new(TracingAuditor),
        policy,
    ));

    // ── Step 3: Principal and region resolution ──────────────────
    let accounts = AccountDirectory::new(&config.accounts);
    if accounts.is_empty() {
        tracing::warn!("No accounts configured; every login will be rejected");
    } else {
        tracing::info!(accounts = accounts.len(), "Account directory loaded");
    }

    let config = Arc::new(config);
    let state = AppState::new(
        Arc::clone(&config),
        session_manager,
        Arc::new(accounts),
        Arc::new(LocalRegionResolver),
    );

    // ── Step 4: HTTP server ──────────────────────────────────────
    let app = build_router(state);
    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    tracing::info!(address = %addr, "Listening");

    // ── Step 5: Graceful shutdown ────────────────────────────────
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, draining connections");
        let _ = shutdown_tx.send(true);
    });

    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    tokio::select! {
        result = async { server.await } => {
            result.map_err(|e| AppError::internal(format!("Server failed: {e}")))?;
        }
        _ = async {
            let _ = shutdown_rx.wait_for(|stopping| *stopping).await;
            tokio::time::sleep(grace).await;
        } => {
            tracing::warn!(grace_secs = grace.as_secs(), "Grace period elapsed, closing remaining connections");
        }
    }

    tracing::info!("AdminHub server stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
