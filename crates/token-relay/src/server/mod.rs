//! HTTP server wrapping the token service.

pub mod routes;

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::service::TokenService;

/// HTTP front-end for the token relay.
pub struct RelayServer {
    service: TokenService,
    static_dir: PathBuf,
}

impl RelayServer {
    #[must_use]
    pub fn new(service: TokenService, static_dir: PathBuf) -> Self {
        Self { service, static_dir }
    }

    /// Serve until ctrl-c.
    ///
    /// # Errors
    ///
    /// Returns error when the port cannot be bound or the server fails.
    pub async fn run(self, port: u16) -> anyhow::Result<()> {
        let storage = self.service.storage();
        let router = routes::create_router(self.service, &self.static_dir);
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        tracing::info!(%storage, "HTTP server listening on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

        tracing::info!("HTTP server shut down");
        Ok(())
    }
}

impl std::fmt::Debug for RelayServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayServer").field("static_dir", &self.static_dir).finish()
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.expect("Failed to install CTRL+C handler");
    tracing::info!("Received shutdown signal");
}
