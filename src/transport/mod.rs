//! Transport Module
//!
//! Framed byte-stream transport under the protocol engine.
//!
//! ## Architecture
//! - `Transport` trait: the five-operation boundary the client consumes
//! - `TcpTransport`: the production implementation over a TCP socket
//!
//! Any reliable ordered byte stream satisfying the trait is substitutable
//! (tests use an in-process scripted implementation).

mod tcp;

use std::time::Duration;

use bytes::Bytes;

use crate::error::Result;

pub use tcp::TcpTransport;

/// A reliable ordered byte stream with explicit flushing and exact reads
pub trait Transport {
    /// Append `bytes` to the outbound stream; if `flush_now`, force
    /// delivery before returning.
    fn write(&mut self, bytes: &[u8], flush_now: bool, timeout: Duration) -> Result<()>;

    /// Force delivery of all previously written, unflushed bytes
    fn flush(&mut self, timeout: Duration) -> Result<()>;

    /// Read exactly `len` bytes, accumulating across deliveries
    ///
    /// A short read (stream closed before `len` bytes arrived) is always
    /// an error; this never returns fewer bytes than requested.
    fn read_exact(&mut self, len: usize, timeout: Duration) -> Result<Bytes>;

    /// Release the stream. Idempotent; never raises.
    fn close(&mut self);
}
