//! Simulator server.

use crate::config::SimulatorConfig;
use crate::router::route_request;
use anyhow::Context;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

/// HTTP server serving the simulated routes
pub struct SimulatorServer {
    config: Arc<SimulatorConfig>,
}

impl SimulatorServer {
    pub fn new(config: SimulatorConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Bind the configured address and serve until Ctrl-C
    pub async fn run(self) -> Result<(), anyhow::Error> {
        let addr = self.config.listen.socket_addr();
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;

        self.serve(listener, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Serve connections from `listener` until `shutdown` resolves.
    ///
    /// Each connection runs on its own task; a failing connection never
    /// affects the others.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), anyhow::Error>
    where
        F: Future<Output = ()>,
    {
        let local_addr = listener.local_addr()?;
        info!("Local Host Server running on http://{}", display_addr(local_addr));
        info!("Ready for API client testing...");

        tokio::pin!(shutdown);

        loop {
            let (stream, peer) = tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!("Failed to accept connection: {}", e);
                        continue;
                    }
                },
                _ = &mut shutdown => {
                    info!("Shutting down endpoint simulator");
                    return Ok(());
                }
            };

            let io = TokioIo::new(stream);
            let config = Arc::clone(&self.config);

            tokio::spawn(async move {
                let service = service_fn(move |req| {
                    let config = Arc::clone(&config);
                    async move { route_request(req, config).await }
                });

                if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                    debug!("Connection error from {}: {}", peer, e);
                }
            });
        }
    }
}

/// Unspecified hosts are shown as `localhost`.
fn display_addr(addr: SocketAddr) -> String {
    if addr.ip().is_unspecified() {
        format!("localhost:{}", addr.port())
    } else {
        addr.to_string()
    }
}
