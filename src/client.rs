//! Command Client
//!
//! One operation per protocol command, over a pending-write queue and a
//! flush transaction.
//!
//! ## Transaction Model
//! - Write-type operations queue one packet each; `flush` transmits every
//!   queued packet, flushes the transport once, then reads exactly one
//!   status byte per packet, correlated by submission order.
//! - Read-type operations bypass the queue: they flush pending writes
//!   first (so no response is read out of turn), transmit their own packet
//!   immediately, and read their own reply.
//!
//! A client instance is single-caller: the queue and the flush that
//! drains it form one non-reentrant critical section.

use std::time::Duration;

use bytes::Bytes;

use crate::config::ClientConfig;
use crate::error::{LinkError, Result};
use crate::protocol::{Command, Packet, PacketBuilder};
use crate::transport::{TcpTransport, Transport};

/// Client for the pin-control protocol
#[derive(Debug)]
pub struct Client<T: Transport = TcpTransport> {
    transport: T,

    /// Packets queued for the next flush, in submission order
    pending: Vec<Packet>,

    /// If set, every write-type operation triggers an implicit flush
    auto_flush: bool,

    /// Timeout applied to each blocking transport operation
    timeout: Duration,
}

impl Client<TcpTransport> {
    /// Connect to a daemon over TCP
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        let transport = TcpTransport::connect(&config.host, config.port)?;
        Ok(Self::over(transport, config))
    }
}

impl<T: Transport> Client<T> {
    /// Build a client over an already-established transport
    pub fn over(transport: T, config: &ClientConfig) -> Self {
        Self {
            transport,
            pending: Vec::new(),
            auto_flush: config.auto_flush,
            timeout: config.timeout,
        }
    }

    /// Number of packets awaiting the next flush
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Close the underlying transport. Idempotent.
    pub fn close(&mut self) {
        self.transport.close();
    }

    // =========================================================================
    // Queue / Flush Primitives
    // =========================================================================

    /// Queue a packet for the next flush
    ///
    /// In auto-flush mode the flush runs synchronously before returning;
    /// its status bytes are consumed and discarded (use explicit `flush`
    /// to observe them).
    fn enqueue(&mut self, packet: Packet) -> Result<()> {
        self.pending.push(packet);
        if self.auto_flush {
            self.flush()?;
        }
        Ok(())
    }

    /// Transmit all queued packets and collect one status per packet
    ///
    /// Empty queue: returns an empty list without touching the transport.
    /// The queue is cleared before any I/O, so a failed flush never leaves
    /// a packet silently re-queued for a naive retry.
    pub fn flush(&mut self) -> Result<Vec<bool>> {
        let queued = std::mem::take(&mut self.pending);
        if queued.is_empty() {
            return Ok(Vec::new());
        }

        for packet in &queued {
            self.transport.write(packet.as_ref(), false, self.timeout)?;
        }
        self.transport.flush(self.timeout)?;

        // One status byte per queued packet, in submission order
        let statuses = self.transport.read_exact(queued.len(), self.timeout)?;

        tracing::trace!("flushed {} queued packets", queued.len());
        Ok(statuses.iter().map(|&b| b == 1).collect())
    }

    /// Transmit a request packet and read its `len`-byte reply
    ///
    /// Pending writes are flushed first so responses are never read out
    /// of turn relative to earlier queued packets.
    fn request(&mut self, packet: Packet, len: usize) -> Result<Bytes> {
        self.flush()?;
        self.transport.write(packet.as_ref(), true, self.timeout)?;
        self.transport.read_exact(len, self.timeout)
    }

    // =========================================================================
    // Write-Type Operations (queued; status via flush)
    // =========================================================================

    /// Set one pin to a value
    pub fn set_pin(&mut self, pin: u8, value: u8) -> Result<()> {
        let packet = PacketBuilder::new(Command::SetPinSingle)
            .push_u8(pin)
            .push_u8(value)
            .build();
        self.enqueue(packet)
    }

    /// Set several pins in one command
    pub fn set_pins(&mut self, pairs: &[(u8, u8)]) -> Result<()> {
        let count = checked_count(pairs.len())?;
        let mut builder = PacketBuilder::new(Command::SetPinMulti).push_u8(count);
        for &(pin, value) in pairs {
            builder = builder.push_u8(pin).push_u8(value);
        }
        self.enqueue(builder.build())
    }

    /// Write a raw byte block to the SPI bus
    pub fn spi_write(&mut self, data: &[u8]) -> Result<()> {
        let len = u32::try_from(data.len()).map_err(|_| {
            LinkError::Protocol(format!("SPI payload too large: {} bytes", data.len()))
        })?;
        let packet = PacketBuilder::new(Command::WriteBytes)
            .push_u32_be(len)
            .push_slice(data)
            .build();
        self.enqueue(packet)
    }

    /// Ask the daemon to pause command processing for `ms` milliseconds
    pub fn delay(&mut self, ms: u16) -> Result<()> {
        let packet = PacketBuilder::new(Command::Delay).push_u16_be(ms).build();
        self.enqueue(packet)
    }

    /// Ask the daemon to wait until `pin` reads `value`, up to `timeout_ms`
    pub fn wait_for_pin(&mut self, pin: u8, value: u8, timeout_ms: u16) -> Result<()> {
        let packet = PacketBuilder::new(Command::WaitForPin)
            .push_u8(pin)
            .push_u8(value)
            .push_u16_be(timeout_ms)
            .build();
        self.enqueue(packet)
    }

    // =========================================================================
    // Read-Type Operations (request/response)
    // =========================================================================

    /// Read one pin's value
    pub fn get_pin(&mut self, pin: u8) -> Result<u8> {
        let packet = PacketBuilder::new(Command::GetPinSingle).push_u8(pin).build();
        let reply = self.request(packet, 1)?;
        Ok(reply[0])
    }

    /// Read several pins; values come back in request order
    pub fn get_pins(&mut self, pins: &[u8]) -> Result<Vec<u8>> {
        let count = checked_count(pins.len())?;
        let packet = PacketBuilder::new(Command::GetPinMulti)
            .push_u8(count)
            .push_slice(pins)
            .build();
        let reply = self.request(packet, pins.len())?;
        Ok(reply.to_vec())
    }

    /// Query the daemon's identifier string
    pub fn get_name(&mut self) -> Result<String> {
        let packet = PacketBuilder::new(Command::GetName).build();
        let len = self.request(packet, 1)?[0] as usize;
        let name = self.transport.read_exact(len, self.timeout)?;
        String::from_utf8(name.to_vec())
            .map_err(|e| LinkError::Protocol(format!("daemon name is not UTF-8: {}", e)))
    }

    /// Query the daemon's protocol version
    ///
    /// A daemon that predates this command answers with its
    /// unknown-command default reply, which reads as version 1.
    pub fn get_api_version(&mut self) -> Result<u8> {
        let packet = PacketBuilder::new(Command::GetApiVersion).build();
        let reply = self.request(packet, 1)?;
        Ok(reply[0])
    }
}

/// Narrow a list length to the protocol's 1-byte count field
fn checked_count(len: usize) -> Result<u8> {
    u8::try_from(len)
        .map_err(|_| LinkError::Protocol(format!("too many pins in one command: {}", len)))
}
