use std::sync::Arc;

use blog_store::{DocumentStore, FileDocumentStore, InMemoryDocumentStore};
use tokio::net::TcpListener;

use crate::config::{ServerConfig, StoreBackend, StoreConfig};
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::service::BlogService;

/// Blog service HTTP server.
pub struct BlogServer {
    config: ServerConfig,
    service: BlogService,
}

impl BlogServer {
    /// Create a server backed by the store the config describes.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        config.validate()?;
        let store = open_store(&config.store)?;
        Ok(Self::with_store(config, store))
    }

    /// Create a server around an existing store handle.
    pub fn with_store(config: ServerConfig, store: Arc<dyn DocumentStore>) -> Self {
        let service = BlogService::new(store, config.service);
        Self { config, service }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn service(&self) -> &BlogService {
        &self.service
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.service.clone())
    }

    /// Serve requests until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        self.serve_on(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve_on(
        self,
        listener: TcpListener,
        shutdown: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> ServerResult<()> {
        let app = self.router();
        tracing::info!("blog service listening on {}", listener.local_addr()?);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?;
        tracing::info!("blog service stopped");
        Ok(())
    }
}

/// Open the store a config section describes.
pub fn open_store(config: &StoreConfig) -> ServerResult<Arc<dyn DocumentStore>> {
    let store: Arc<dyn DocumentStore> = match config.backend {
        StoreBackend::Memory => {
            tracing::info!("using in-memory store");
            Arc::new(InMemoryDocumentStore::new())
        }
        StoreBackend::File => Arc::new(FileDocumentStore::open(&config.path, config.sync_mode)?),
    };
    Ok(store)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
