//! Catalog server

use crate::catalog::http::{create_router, CatalogState};
use crate::catalog::rocks::RocksStore;
use crate::catalog::service::CatalogService;
use crate::common::{Config, Result};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

pub struct CatalogServer {
    config: Config,
}

impl CatalogServer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Open the on-disk store and serve until Ctrl-C or SIGTERM.
    pub async fn serve(self) -> Result<()> {
        self.config.validate()?;

        tracing::info!("Starting volume catalog");
        tracing::info!("  HTTP API: {}", self.config.bind_addr);
        tracing::info!("  DB path: {}", self.config.db_path.display());
        tracing::info!("  Max body: {} bytes", self.config.max_body_bytes);

        let store = Arc::new(RocksStore::open(&self.config.db_path)?);
        let service = CatalogService::new(store);

        let listener = TcpListener::bind(self.config.bind_addr).await?;
        serve_with_shutdown(
            listener,
            service,
            self.config.max_body_bytes,
            shutdown_signal(),
        )
        .await
    }
}

/// Serve the catalog API on an already bound listener until `shutdown` resolves.
pub async fn serve_with_shutdown(
    listener: TcpListener,
    service: CatalogService,
    max_body_bytes: usize,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let router = create_router(CatalogState { service }, max_body_bytes);

    tracing::info!("✓ Volume catalog ready on {}", listener.local_addr()?);

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await?;

    tracing::info!("Volume catalog stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
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
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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

    tracing::info!("Shutdown signal received");
}
