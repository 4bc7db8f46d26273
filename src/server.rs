//! HTTP server startup.

use crate::api;
use crate::config::{ServerConfig, StoreBackend};
use crate::store::{GameStore, MemoryStore, SqliteStore, StoreError};
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, instrument, warn};

/// Builds the store selected by `config`.
///
/// # Errors
///
/// Returns [`StoreError`] if the SQLite database cannot be opened.
#[instrument(skip(config), fields(backend = %config.backend()))]
pub fn open_store(config: &ServerConfig) -> Result<Arc<dyn GameStore>, StoreError> {
    let store: Arc<dyn GameStore> = match config.backend() {
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
        StoreBackend::Sqlite => Arc::new(SqliteStore::open(config.database_url())?),
    };
    Ok(store)
}

/// Serves the game API on `listener` until Ctrl+C.
///
/// # Errors
///
/// Returns an error if the server fails while running.
#[instrument(skip(listener, store))]
pub async fn serve_on(listener: TcpListener, store: Arc<dyn GameStore>) -> Result<()> {
    let app = api::router(store);
    let addr = listener.local_addr()?;
    info!("Server ready at http://{}/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Opens the configured store, binds, and serves.
///
/// # Errors
///
/// Returns an error if the store cannot be opened, the address cannot
/// be bound, or the server fails.
#[instrument(skip(config))]
pub async fn run(config: &ServerConfig) -> Result<()> {
    info!(
        backend = %config.backend(),
        database_url = %config.database_url(),
        "Starting tic-tac-toe server"
    );
    let store = open_store(config).context("Failed to open game store")?;

    let listener = TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address()))?;

    serve_on(listener, store).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
