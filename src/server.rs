//! TCP listener and accept loop
//!
//! One task per accepted connection; each connection is its own failure
//! domain. Accept failures are logged and the loop continues; the loop ends
//! only on shutdown.

use crate::config::Config;
use crate::socks::{handle_connection, StaticCredentials, Verifier};
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// A bound SOCKS5 server, ready to serve.
pub struct Server {
    listener: TcpListener,
    config: Arc<Config>,
    verifier: Arc<dyn Verifier>,
}

impl Server {
    /// Bind the listener for the configured address.
    ///
    /// The default credential verifier is the configured static pair; use
    /// [`Server::with_verifier`] to plug in another predicate.
    pub async fn bind(config: Config) -> Result<Self> {
        config.validate().map_err(|e| anyhow::anyhow!(e))?;

        let listener = TcpListener::bind(&config.server.listen)
            .await
            .with_context(|| format!("Failed to bind {}", config.server.listen))?;

        let verifier = Arc::new(StaticCredentials::new(
            config.auth.username.as_bytes().to_vec(),
            config.auth.password.as_bytes().to_vec(),
        ));

        Ok(Server {
            listener,
            config: Arc::new(config),
            verifier,
        })
    }

    /// Replace the credential predicate.
    pub fn with_verifier(mut self, verifier: Arc<dyn Verifier>) -> Self {
        self.verifier = verifier;
        self
    }

    /// The address the listener actually bound (useful with port 0).
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections until the shutdown signal fires.
    ///
    /// Every accepted stream gets its own task; a connection failing or
    /// hanging never affects the others or the loop itself.
    pub async fn serve(self, mut shutdown_rx: broadcast::Receiver<bool>) -> Result<()> {
        info!("listening on {}", self.local_addr()?);

        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((stream, peer_addr)) => {
                            debug!("accepted connection from {}", peer_addr);
                            let verifier = Arc::clone(&self.verifier);
                            let config = Arc::clone(&self.config);
                            tokio::spawn(async move {
                                if let Err(e) = handle_connection(
                                    stream,
                                    verifier.as_ref(),
                                    &config.server,
                                )
                                .await
                                {
                                    warn!("connection from {} failed: {}", peer_addr, e);
                                }
                            });
                        }
                        Err(e) => {
                            error!("accept failed: {}", e);
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("shutdown signal received, stopping accept loop");
                    break;
                }
            }
        }

        Ok(())
    }
}
