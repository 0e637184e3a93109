//! The HTTP server.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use leadpage_core::AppConfig;
use leadpage_store::{LeadRepository, create_lead_repository};
use tokio::net::TcpListener;

use crate::error::{Error, Result};
use crate::resolver::PageResolver;
use crate::routes::{AppState, create_router};

/// Leadpage HTTP server
#[derive(Debug)]
pub struct Server {
    bind_addr: String,
    state: AppState,
}

impl Server {
    /// Create a server, choosing the lead store from configuration.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let repository = create_lead_repository(config)?;
        Ok(Self::with_repository(config, repository))
    }

    /// Create a server backed by the given repository.
    pub fn with_repository(config: &AppConfig, repository: Arc<dyn LeadRepository>) -> Self {
        let resolver = PageResolver::new(repository, config.voice.clone());
        Self {
            bind_addr: config.server.bind_addr(),
            state: AppState::new(resolver, config.server.demo_path()),
        }
    }

    /// Address the server binds to.
    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }

    /// The application router.
    pub fn router(&self) -> Router {
        create_router(self.state.clone())
    }

    /// Bind the listener.
    pub async fn bind(&self) -> Result<TcpListener> {
        TcpListener::bind(&self.bind_addr)
            .await
            .map_err(|source| Error::Bind {
                addr: self.bind_addr.clone(),
                source,
            })
    }

    /// Serve until Ctrl-C.
    pub async fn serve(self) -> Result<()> {
        let listener = self.bind().await?;
        self.serve_on(listener, shutdown_signal()).await
    }

    /// Serve on a bound listener until `shutdown` completes.
    pub async fn serve_on<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local: Option<SocketAddr> = listener.local_addr().ok();
        tracing::info!(
            addr = ?local,
            backend = self.state.resolver().repository().name(),
            "leadpage listening"
        );
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(Error::Serve)?;
        tracing::info!("leadpage stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
