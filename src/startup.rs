//! Application startup and server initialization.
//!
//! This module builds the upstream client and the collector, sets up the
//! routes, and runs the HTTP server until shutdown.

use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info};

use crate::config::ExporterConfig;
use crate::error::{CollectError, ConfigError};
use crate::metrics::{MetricDescriptors, PoolCollector};
use crate::routes;
use crate::state::AppState;
use crate::upstream::PoolApiSource;

/// Builds the shared state from the configuration.
///
/// Returns the state together with the receiving end of the fatal error
/// channel; [`run`] watches it.
pub fn build_state(
    config: Arc<ExporterConfig>,
) -> Result<(AppState, mpsc::Receiver<CollectError>), ConfigError> {
    let source = Arc::new(PoolApiSource::new(&config.upstream)?);
    let collector = Arc::new(PoolCollector::new(
        source,
        config.resources.clone(),
        MetricDescriptors::new(),
        config.on_error,
        config.share_time,
    )?);
    let (fatal_errors, fatal_rx) = mpsc::channel(1);

    let state = AppState {
        config,
        collector,
        fatal_errors,
    };
    Ok((state, fatal_rx))
}

/// Initializes and runs the exporter.
///
/// Binds to the configured listen address and serves until SIGINT/SIGTERM
/// (returns `Ok`) or until a scrape reports a fatal collection error under
/// the `exit` failure policy (returns that error).
///
/// # Errors
///
/// Returns an error if the upstream client cannot be built, the server fails
/// to bind to the specified address, or collection fails fatally.
pub async fn run(config: Arc<ExporterConfig>) -> Result<(), Box<dyn std::error::Error>> {
    let (state, mut fatal_rx) = build_state(config.clone())?;
    let app = routes::create_router(state);

    let listener = TcpListener::bind(config.bind_address()).await?;
    info!("Listening on {}", listener.local_addr()?);

    let (fatal_tx, mut fatal) = oneshot::channel();
    let stop = async move {
        tokio::select! {
            _ = shutdown_signal() => {}
            Some(err) = fatal_rx.recv() => {
                error!("Stopping exporter after fatal collection error");
                let _ = fatal_tx.send(err);
            }
        }
    };

    // Graceful shutdown lets the failing scrape receive its 500 first.
    axum::serve(listener, app)
        .with_graceful_shutdown(stop)
        .await?;

    match fatal.try_recv() {
        Ok(err) => Err(err.into()),
        Err(_) => {
            info!("Server stopped");
            Ok(())
        }
    }
}

/// Completes on SIGINT, or on SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to register SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("SIGINT received, shutting down"),
        _ = terminate => info!("SIGTERM received, shutting down"),
    }
}
