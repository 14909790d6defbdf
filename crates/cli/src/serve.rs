//! # CLI Serve Command
//!
//! Server startup for the `serve` command.

use std::{net::SocketAddr, sync::Arc};

use error::{AppError, Result};
use migration::{connect_and_migrate, connect_writer, run_all_seeds};
use server::{AppState, LogMailer, create_app_router};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::{commands::ServeArgs, config::ServeConfig};

/// Migrates the database and serves the API until a shutdown signal arrives
///
/// # Arguments
///
/// * `args` - Serve command arguments
///
/// # Errors
///
/// Invalid configuration, storage setup failures, or a bind error.
pub async fn serve(args: &ServeArgs) -> Result<()> {
    let config = ServeConfig::try_from(args)?;

    info!(target: "serve", url = %config.database.url, "Connecting to database...");
    let db = connect_and_migrate(&config.database).await?;
    info!(target: "serve", "Database migrations completed successfully");
    let writer = connect_writer(&config.database, &db).await?;

    let state = AppState::new(db, config.jwt)
        .with_writer(writer)
        .with_retry_policy(config.retry_policy)
        .with_mailer(Arc::new(LogMailer::new(&config.app_url)));
    state.login_decoy_hash().await?;

    if config.seed {
        let results = run_all_seeds(&state.db, &state.password_config).await?;
        for result in results {
            info!(
                target: "serve",
                seed = %result.seed_name,
                inserted = result.inserted_count,
                skipped = result.skipped_count,
                "Seed applied"
            );
        }
    }

    let app = create_app_router(state);
    serve_http(app, config.address).await
}

async fn serve_http(app: axum::Router, address: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(address)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", address, e)))?;

    info!(target: "serve", %address, "Starting HTTP server...");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| AppError::internal(format!("HTTP server error: {}", e)))?;

    info!(target: "serve", "Server stopped");
    Ok(())
}

/// Waits for Ctrl+C or SIGTERM. A handler that cannot be installed is
/// logged and never fires.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                warn!(error = %e, "Failed to install terminate handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!(target: "serve", "Received shutdown signal");
}
