//! HTTP server lifecycle
//!
//! Binds the axum router to a TCP listener and stops it gracefully on request.

use anyhow::{Context, Result};
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    /// Host to bind to (typically "0.0.0.0" for all interfaces)
    pub host: String,
    /// Port to bind to; 0 lets the OS choose
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Serves the match API, health and metrics endpoints
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
    shutdown_tx: watch::Sender<bool>,
}

impl HttpServer {
    pub fn new(config: HttpServerConfig, router: Router) -> Self {
        let (shutdown_tx, _) = watch::channel(false);

        Self {
            config,
            router,
            shutdown_tx,
        }
    }

    /// Bind the configured address
    pub async fn bind(&self) -> Result<TcpListener> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .context("Invalid HTTP server address")?;

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        info!("HTTP server listening on http://{}", listener.local_addr()?);
        Ok(listener)
    }

    /// Serve requests on `listener` until [`HttpServer::stop`] is called.
    /// A stop requested before serving starts is honoured immediately.
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        axum::serve(listener, self.router.clone())
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.wait_for(|stopped| *stopped).await;
                info!("HTTP server shutdown signal received");
            })
            .await?;

        info!("HTTP server stopped");
        Ok(())
    }

    /// Stop the HTTP server
    pub async fn stop(&self) -> Result<()> {
        info!("Stopping HTTP server...");
        self.shutdown_tx.send_replace(true);
        Ok(())
    }
}
