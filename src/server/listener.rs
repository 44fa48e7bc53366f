use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tokio::net::{TcpListener, ToSocketAddrs};
use tracing::{Instrument, error, info, warn};

use crate::config::Config;
use crate::http::connection::Connection;

/// Accepts connections and hands each one to its own task.
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    root: Arc<Path>,
}

impl Server {
    pub async fn bind<A>(addr: A, root: impl Into<PathBuf>) -> anyhow::Result<Self>
    where
        A: ToSocketAddrs,
    {
        let listener = TcpListener::bind(addr)
            .await
            .context("Failed to create listening socket")?;

        let root: PathBuf = root.into();
        match tokio::fs::metadata(&root).await {
            Ok(metadata) if metadata.is_dir() => {}
            _ => warn!(root = %root.display(), "Root directory does not exist or is not a directory"),
        }

        Ok(Self {
            listener,
            root: Arc::from(root),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept loop. Only returns if the task is dropped.
    pub async fn run(self) -> anyhow::Result<()> {
        loop {
            let (socket, peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!("Failed to accept connection: {}", e);
                    continue;
                }
            };
            info!("Accepted connection from {}", peer);

            let root = Arc::clone(&self.root);
            let span = tracing::info_span!("connection", %peer);
            tokio::spawn(
                async move {
                    if let Err(e) = Connection::new(socket, root).serve().await {
                        error!("Error while communicating with client: {}", e);
                    }
                }
                .instrument(span),
            );
        }
    }
}

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let server = match Server::bind(cfg.listen_addr(), cfg.server.root_directory.clone()).await {
        Ok(server) => server,
        Err(e) => {
            error!("{:#}", e);
            return Err(e);
        }
    };
    info!(
        root = %cfg.server.root_directory.display(),
        "Listening on {}",
        server.local_addr()?
    );

    server.run().await
}
