//! Error types for pinlink
//!
//! Provides a unified error type for all operations.

use std::time::Duration;

use thiserror::Error;

/// Result type alias using LinkError
pub type Result<T> = std::result::Result<T, LinkError>;

/// Unified error type for pinlink operations
#[derive(Debug, Error)]
pub enum LinkError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    /// The stream was closed before the operation could complete. A read
    /// that ends short of the requested length always surfaces as this
    /// variant, never as a truncated buffer.
    #[error("transport closed")]
    Closed,

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
