//! # pinlink
//!
//! Client and reference daemon for a small command/response binary
//! protocol controlling GPIO-like hardware (pin I/O, SPI writes, timed
//! delays) on a remote embedded daemon.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────┐      ┌──────────────────────────────┐
//! │        Command Client        │      │     Protocol Interpreter     │
//! │  (typed ops + pending queue) │      │      (reference daemon)      │
//! └──────────────┬───────────────┘      └──────────────┬───────────────┘
//!                │                                     │
//! ┌──────────────▼───────────────┐      ┌──────────────▼───────────────┐
//! │         Packet Codec         │      │       Virtual Pin Table      │
//! │   (opcode + payload bytes)   │      │   (pin id -> last value)     │
//! └──────────────┬───────────────┘      └──────────────┬───────────────┘
//!                │                                     │
//! ┌──────────────▼───────────────┐      ┌──────────────▼───────────────┐
//! │       Framed Transport       │ TCP  │         Accept Loop          │
//! │ (buffered writes, exact read)│◄────►│  (one connection at a time)  │
//! └──────────────────────────────┘      └──────────────────────────────┘
//! ```
//!
//! Write-type commands queue client-side; a flush transmits the whole
//! queue, flushes the transport once, and reads back one status byte per
//! packet in submission order. Read-type commands flush first and then
//! perform their own request/response exchange.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod transport;
pub mod client;
pub mod server;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{LinkError, Result};
pub use config::{ClientConfig, DaemonConfig};
pub use client::Client;
pub use server::{Daemon, Interpreter};
pub use protocol::API_VERSION;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the pinlink crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
