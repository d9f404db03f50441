//! Application builder: wires router, middleware, and state into an Axum app
//! and runs it until a shutdown signal arrives.

use std::future::IntoFuture;

use axum::Router;
use tokio::sync::watch;

use wasil_core::AppError;
use wasil_core::config::AppConfig;
use wasil_database::{DatabasePool, Stores};

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Runs the Wasil server on the given stores.
///
/// `db_pool` is `None` when running on the in-memory backend.
pub async fn run_server(
    config: AppConfig,
    stores: Stores,
    db_pool: Option<DatabasePool>,
) -> Result<(), AppError> {
    tracing::info!("Starting Wasil server...");

    let grace = config.server.shutdown_grace();
    let addr = config.server.bind_address();

    let state = AppState::build(config, stores, db_pool).await?;
    let realtime = state.realtime.clone();
    let pool = state.db_pool.clone();
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Wasil server listening on {}", addr);

    let (stopping_tx, mut stopping_rx) = watch::channel(false);
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        // Open sockets keep the server alive; close them so draining can finish.
        realtime.shutdown();
        let _ = stopping_tx.send(true);
    });
    let mut server = std::pin::pin!(server.into_future());

    tokio::select! {
        result = &mut server => {
            result.map_err(|e| AppError::internal(format!("Server error: {e}")))?;
        }
        _ = async {
            let _ = stopping_rx.wait_for(|stopping| *stopping).await;
            tokio::time::sleep(grace).await;
        } => {
            tracing::warn!(grace_seconds = grace.as_secs(), "Connections still open after grace period");
        }
    }

    if let Some(pool) = pool {
        pool.close().await;
    }
    tracing::info!("Wasil server stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
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
    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
