//! Handshake inspection server
//!
//! Accepts TCP connections, decodes the SOCKS handshake on each one and
//! logs the request before refusing it.

mod handler;

pub use handler::handle_connection;

use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Bind the configured address and serve until shutdown
pub async fn run_server(config: Config, shutdown_rx: broadcast::Receiver<bool>) -> Result<()> {
    let addr = config
        .server
        .listen_socket_addr()
        .map_err(|e| anyhow!(e))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    serve(listener, config, shutdown_rx).await
}

/// Serve connections from an already bound listener until shutdown
pub async fn serve(
    listener: TcpListener,
    config: Config,
    mut shutdown_rx: broadcast::Receiver<bool>,
) -> Result<()> {
    info!("Listening on {}", listener.local_addr()?);
    let config = Arc::new(config);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        error!("Failed to accept connection: {}", e);
                        continue;
                    }
                };

                debug!("Accepted connection from {}", peer);
                let config = config.clone();
                tokio::spawn(async move {
                    match handle_connection(stream, &config).await {
                        Ok(Some(_)) => debug!("Refused request from {}", peer),
                        Ok(None) => debug!("Connection from {} closed without a request", peer),
                        Err(e) => warn!("Handshake from {} failed: {:#}", peer, e),
                    }
                });
            }
            _ = shutdown_rx.recv() => {
                info!("Shutdown signal received, stopping server");
                break;
            }
        }
    }

    info!("Server stopped");
    Ok(())
}
