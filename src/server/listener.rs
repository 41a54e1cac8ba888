//! TCP accept loop
//!
//! Binds the daemon's listen address and serves connections one at a
//! time, each against a fresh interpreter.

use std::net::{SocketAddr, TcpListener};
use std::time::Duration;

use crate::config::DaemonConfig;
use crate::error::{LinkError, Result};
use super::Interpreter;

/// The reference daemon: listener plus interpreter configuration
pub struct Daemon {
    config: DaemonConfig,
    listener: TcpListener,
}

impl Daemon {
    /// Bind the configured listen address
    pub fn bind(config: DaemonConfig) -> Result<Self> {
        let listener = TcpListener::bind(&config.listen_addr)
            .map_err(|e| LinkError::Connection(format!("{}: {}", config.listen_addr, e)))?;
        Ok(Self { config, listener })
    }

    /// The bound address (useful when listening on an ephemeral port)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept and serve connections forever
    ///
    /// A failure while serving a connection closes that connection and
    /// the loop continues; only a failing accept is fatal.
    pub fn run(&self) -> Result<()> {
        tracing::info!(
            "daemon \"{}\" (protocol v{}) listening on {}",
            self.config.name,
            self.config.api_version,
            self.config.listen_addr
        );

        loop {
            self.serve_one()?;
        }
    }

    /// Accept one connection and serve it to completion
    ///
    /// Pin state lives for exactly this connection. Errors while serving
    /// are logged and absorbed here; only accept/setup failures surface.
    pub fn serve_one(&self) -> Result<()> {
        let (mut stream, peer) = self.listener.accept()?;

        stream.set_nodelay(true)?;
        if self.config.read_timeout_ms > 0 {
            stream.set_read_timeout(Some(Duration::from_millis(self.config.read_timeout_ms)))?;
        }
        if self.config.write_timeout_ms > 0 {
            stream.set_write_timeout(Some(Duration::from_millis(self.config.write_timeout_ms)))?;
        }

        tracing::debug!("connection established from {}", peer);

        let mut interpreter = Interpreter::new(self.config.name.clone(), self.config.api_version);
        match interpreter.serve(&mut stream) {
            Ok(()) => tracing::debug!("client {} disconnected", peer),
            Err(e) => tracing::warn!("error serving {}: {}", peer, e),
        }
        Ok(())
    }
}
