//! Configuration for pinlink
//!
//! Centralized configuration with sensible defaults for both the command
//! client and the reference daemon.

use std::time::Duration;

/// Default per-operation transport timeout (milliseconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Configuration for a command client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    // -------------------------------------------------------------------------
    // Endpoint Configuration
    // -------------------------------------------------------------------------
    /// Daemon hostname or IP address
    pub host: String,

    /// Daemon TCP port
    pub port: u16,

    // -------------------------------------------------------------------------
    // Transaction Configuration
    // -------------------------------------------------------------------------
    /// If true, every write-type operation triggers an implicit flush.
    /// If false, the caller flushes explicitly (read-type operations still
    /// flush pending writes before issuing their own request).
    pub auto_flush: bool,

    /// Timeout applied to each blocking transport operation
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7650,
            auto_flush: false,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl ClientConfig {
    /// Create a new client config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for ClientConfig
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the daemon hostname or IP address
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the daemon TCP port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Enable or disable implicit flush on every write-type operation
    pub fn auto_flush(mut self, auto_flush: bool) -> Self {
        self.config.auto_flush = auto_flush;
        self
    }

    /// Set the per-operation timeout (in milliseconds)
    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.config.timeout = Duration::from_millis(ms);
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}

/// Configuration for the reference daemon
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// TCP listen address
    pub listen_addr: String,

    /// Identifier returned by the GetName command
    pub name: String,

    /// Protocol version this daemon speaks. Commands introduced in a later
    /// version are answered with the unknown-command default reply.
    pub api_version: u8,

    /// Connection read timeout (milliseconds, 0 = no timeout)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 = no timeout)
    pub write_timeout_ms: u64,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:7650".to_string(),
            name: "pinlink-daemon".to_string(),
            api_version: crate::protocol::API_VERSION,
            read_timeout_ms: 0,
            write_timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl DaemonConfig {
    /// Create a new daemon config builder
    pub fn builder() -> DaemonConfigBuilder {
        DaemonConfigBuilder::default()
    }
}

/// Builder for DaemonConfig
#[derive(Default)]
pub struct DaemonConfigBuilder {
    config: DaemonConfig,
}

impl DaemonConfigBuilder {
    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the identifier returned by GetName
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Set the protocol version the daemon speaks
    pub fn api_version(mut self, version: u8) -> Self {
        self.config.api_version = version;
        self
    }

    /// Set the connection read timeout (in milliseconds, 0 = none)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the connection write timeout (in milliseconds, 0 = none)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> DaemonConfig {
        self.config
    }
}
