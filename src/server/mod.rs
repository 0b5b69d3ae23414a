//! Server module
//!
//! Owns the listening socket and the accept loop. Each accepted connection
//! is served on its own task.

pub mod connection;
pub mod listener;

// Re-export commonly used items
pub use listener::create_reusable_listener;

use crate::config::{AppState, Config};
use crate::logger;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// A bound server ready to accept connections.
pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
}

impl Server {
    /// Bind the listening socket described by the configuration.
    pub fn bind(config: Config) -> io::Result<Self> {
        let addr = config
            .get_socket_addr()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let listener = create_reusable_listener(addr)?;
        Ok(Self {
            listener,
            state: Arc::new(AppState::new(config)),
        })
    }

    /// Address the server is bound to (relevant when port 0 was requested).
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections until the process is terminated.
    ///
    /// Accept errors are logged and the loop continues; a single bad
    /// connection never takes the server down.
    pub async fn run(self) -> io::Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, peer_addr)) => {
                    if self
                        .state
                        .cached_access_log
                        .load(std::sync::atomic::Ordering::Relaxed)
                    {
                        logger::log_connection_accepted(&peer_addr);
                    }
                    connection::spawn(stream, peer_addr, Arc::clone(&self.state));
                }
                Err(e) => {
                    logger::log_error(&format!("Failed to accept connection: {e}"));
                }
            }
        }
    }
}
