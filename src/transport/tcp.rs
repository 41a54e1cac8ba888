//! TCP transport
//!
//! Wraps a `TcpStream` with an outbound buffer (deferred writes), a FIFO
//! receive buffer (partial-read accumulation), and deadline-based exact
//! reads.

use std::io::{Read, Write};
use std::net::{Shutdown, TcpStream};
use std::time::{Duration, Instant};

use bytes::{Bytes, BytesMut};

use crate::error::{LinkError, Result};
use super::Transport;

/// Chunk size for reads off the socket
const READ_CHUNK: usize = 4096;

/// Transport over a TCP socket
#[derive(Debug)]
pub struct TcpTransport {
    stream: TcpStream,

    /// Bytes written but not yet flushed to the socket
    outbound: BytesMut,

    /// Bytes received faster than consumers requested them (FIFO)
    receive: BytesMut,

    closed: bool,
}

impl TcpTransport {
    /// Connect to a daemon endpoint
    pub fn connect(host: &str, port: u16) -> Result<Self> {
        let stream = TcpStream::connect((host, port))
            .map_err(|e| LinkError::Connection(format!("{}:{}: {}", host, port, e)))?;

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        Ok(Self {
            stream,
            outbound: BytesMut::new(),
            receive: BytesMut::new(),
            closed: false,
        })
    }

    /// Remaining time before `deadline`, or a timeout error if it passed
    fn remaining(deadline: Instant, total: Duration) -> Result<Duration> {
        let now = Instant::now();
        if now >= deadline {
            return Err(LinkError::Timeout(total));
        }
        Ok(deadline - now)
    }

    /// Map an I/O failure from a blocking socket operation
    fn map_io(err: std::io::Error, timeout: Duration) -> LinkError {
        use std::io::ErrorKind;
        match err.kind() {
            // WouldBlock on Unix, TimedOut on Windows
            ErrorKind::WouldBlock | ErrorKind::TimedOut => LinkError::Timeout(timeout),
            ErrorKind::UnexpectedEof
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe
            | ErrorKind::NotConnected => LinkError::Closed,
            _ => LinkError::Io(err),
        }
    }
}

impl Transport for TcpTransport {
    fn write(&mut self, bytes: &[u8], flush_now: bool, timeout: Duration) -> Result<()> {
        if self.closed {
            return Err(LinkError::Closed);
        }

        self.outbound.extend_from_slice(bytes);

        if flush_now {
            self.flush(timeout)?;
        }
        Ok(())
    }

    fn flush(&mut self, timeout: Duration) -> Result<()> {
        if self.closed {
            return Err(LinkError::Closed);
        }
        if self.outbound.is_empty() {
            return Ok(());
        }

        self.stream.set_write_timeout(Some(timeout))?;

        let pending = self.outbound.split();
        self.stream
            .write_all(&pending)
            .and_then(|_| self.stream.flush())
            .map_err(|e| Self::map_io(e, timeout))?;

        tracing::trace!("flushed {} bytes", pending.len());
        Ok(())
    }

    fn read_exact(&mut self, len: usize, timeout: Duration) -> Result<Bytes> {
        if len == 0 {
            return Ok(Bytes::new());
        }

        let deadline = Instant::now() + timeout;
        let mut chunk = [0u8; READ_CHUNK];

        // Accumulate until the front of the receive buffer holds `len` bytes
        while self.receive.len() < len {
            if self.closed {
                return Err(LinkError::Closed);
            }

            let remaining = Self::remaining(deadline, timeout)?;
            self.stream.set_read_timeout(Some(remaining))?;

            match self.stream.read(&mut chunk) {
                // Stream ended before enough bytes arrived: a short read
                // is always escalated, never returned truncated.
                Ok(0) => return Err(LinkError::Closed),
                Ok(n) => self.receive.extend_from_slice(&chunk[..n]),
                Err(e) => return Err(Self::map_io(e, timeout)),
            }
        }

        Ok(self.receive.split_to(len).freeze())
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        // Shutdown unblocks any concurrent reader with a closed-stream
        // failure; a never-connected or already-dead socket is fine here.
        let _ = self.stream.shutdown(Shutdown::Both);
    }
}

impl Drop for TcpTransport {
    fn drop(&mut self) {
        self.close();
    }
}
