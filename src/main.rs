//! Citadel Server
//!
//! Main entry point that wires all crates together and starts the server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use citadel_api::AppState;
use citadel_auth::SessionCleanup;
use citadel_core::config::AppConfig;
use citadel_core::error::AppError;
use citadel_database::Stores;

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

/// Load configuration from `config/` and the environment.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("CITADEL_ENV").unwrap_or_else(|_| "development".to_string());
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

/// Open the stores named by `database.url`.
/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Citadel");

    // ── Step 1: Stores ───────────────────────────────────────────
    let stores = Stores::open(&config.database).await?;

    // ── Step 2: Services ─────────────────────────────────────────
    let state = AppState::new(config.clone(), stores)?;

    // ── Step 3: Shutdown channel ─────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Step 4: Expired-session purge ────────────────────────────
    let cleanup_handle = if config.session.cleanup_interval_minutes > 0 {
        let cleanup = SessionCleanup::new(Arc::clone(&state.session_manager));
        let interval = Duration::from_secs(config.session.cleanup_interval_minutes * 60);
        let cancel = shutdown_rx.clone();
        Some(tokio::spawn(async move {
            cleanup.run(interval, cancel).await;
        }))
    } else {
        tracing::info!("Session cleanup disabled");
        None
    };

    // ── Step 5: Build and start HTTP server ──────────────────────
    let app = citadel_api::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!(%addr, "Citadel server listening");

    // ── Step 6: Graceful shutdown ────────────────────────────────
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    })
    .await
    .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Step 7: Wait for background tasks ────────────────────────
    if let Some(handle) = cleanup_handle {
        let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
        if tokio::time::timeout(grace, handle).await.is_err() {
            tracing::warn!("Session cleanup did not stop within the grace period");
        }
    }

    tracing::info!("Citadel server shut down gracefully");
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
            Ok(mut signal) => {
                signal.recv().await;
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
