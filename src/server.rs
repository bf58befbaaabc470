use anyhow::Context;
use std::future::IntoFuture;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing::{info, warn};

use crate::routes;
use crate::state::AppState;

/// Binds the configured address and serves until SIGINT/SIGTERM. In-flight
/// requests get the configured grace period before the server is dropped;
/// the pool is closed on the way out either way.
pub async fn serve(state: AppState) -> anyhow::Result<()> {
    let address = state.config.server.address();
    let grace = state.config.server.shutdown_grace();
    let pool = state.pool.clone();

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;
    info!(%address, environment = ?state.config.environment, "ceramics API listening");

    let stopping = Arc::new(Notify::new());
    let signal = {
        let stopping = stopping.clone();
        async move {
            shutdown_signal().await;
            info!(grace_secs = grace.as_secs(), "shutdown requested, draining connections");
            stopping.notify_one();
        }
    };

    let server = axum::serve(listener, routes::app(state))
        .with_graceful_shutdown(signal)
        .into_future();

    tokio::select! {
        result = server => result.context("server terminated with an error")?,
        _ = async {
            stopping.notified().await;
            tokio::time::sleep(grace).await;
        } => warn!("grace period elapsed, dropping remaining connections"),
    }

    pool.close().await;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("failed to listen for SIGTERM: {}", e);
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
