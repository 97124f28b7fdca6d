//! # docstore server
//!
//! Loads [`ServerConfig`], starts the [`DocumentSystem`] and serves the API until
//! Ctrl+C or SIGTERM, then stops the worker.

use anyhow::Context;
use docstore::http::setup_router;
use docstore::lifecycle::{setup_metrics, setup_tracing, DocumentSystem, ServerConfig};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load().context("failed to load configuration")?;

    // Setup tracing once for the entire application
    setup_tracing(&config.log_level, config.log_format);
    setup_metrics(config.metrics_addr()?)?;

    let system = DocumentSystem::new(&config.store_options()).context("failed to start document worker")?;
    let app = setup_router(Arc::new(system.client.clone()), &config.http_options());

    let addr = config.socket_addr()?;
    info!(
        %addr,
        request_timeout_ms = config.request_timeout_ms,
        mailbox_capacity = config.mailbox_capacity,
        "Starting docstore server"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Err(e) = system.shutdown().await {
        error!(error = %e, "worker did not stop cleanly");
        anyhow::bail!(e);
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
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

    info!("Shutdown signal received");
}
