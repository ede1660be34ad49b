use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use tokio::net::{TcpListener, TcpSocket};
use tracing::{error, info, Instrument};

use crate::config::Config;
use crate::http::connection::{Connection, ConnectionSettings};
use crate::site::DocumentRoot;

/// Pause after a failed accept so a persistent error (e.g. out of file
/// descriptors) does not spin the loop.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Owns the listening socket and serves one connection at a time.
pub struct Server {
    listener: TcpListener,
    root: DocumentRoot,
    settings: ConnectionSettings,
}

impl Server {
    /// Canonicalizes the document root and binds the listening socket.
    pub async fn bind(cfg: &Config) -> anyhow::Result<Self> {
        let root = DocumentRoot::new(&cfg.document_root)?;
        let addr = cfg.server.socket_addr()?;

        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()?
        } else {
            TcpSocket::new_v6()?
        };
        socket.set_reuseaddr(true)?;
        socket
            .bind(addr)
            .with_context(|| format!("failed to bind {addr}"))?;
        let listener = socket
            .listen(cfg.server.backlog)
            .with_context(|| format!("failed to listen on {addr}"))?;

        info!("Listening on {}", listener.local_addr()?);
        info!(root = %root.path().display(), "Serving document root");

        Ok(Self {
            listener,
            root,
            settings: ConnectionSettings::from(&cfg.server),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves connections until `shutdown` completes, then closes the
    /// listening socket.
    ///
    /// Only waiting for the next client is raced against `shutdown`. A
    /// connection that has been accepted runs to completion first.
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            let accepted = tokio::select! {
                accepted = self.listener.accept() => accepted,

                _ = &mut shutdown => {
                    info!("Shutdown signal received");
                    break;
                }
            };

            let (socket, peer) = match accepted {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!("Failed to accept connection: {}", e);
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                    continue;
                }
            };
            info!("Accepted connection from {}", peer);

            // Awaited inline: the next accept waits until this stream is closed
            let conn = Connection::new(socket, self.root.clone(), self.settings);
            if let Err(e) = conn
                .run()
                .instrument(tracing::info_span!("connection", %peer))
                .await
            {
                error!("Connection error from {}: {}", peer, e);
            }
        }

        drop(self);
        info!("Listener closed");
    }
}

/// Binds according to `cfg` and serves until `shutdown` completes.
pub async fn run<F>(cfg: &Config, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()>,
{
    let server = Server::bind(cfg).await?;
    server.run_until(shutdown).await;
    Ok(())
}
