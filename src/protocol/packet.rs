//! Packet construction
//!
//! A packet is the opcode byte followed by its payload fragments in the
//! order they were appended. Building is pure; payload shape correctness
//! is the caller's responsibility.

use bytes::{BufMut, Bytes, BytesMut};

use super::Command;

/// An immutable wire packet: `[opcode] ++ payload`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    bytes: Bytes,
}

impl Packet {
    /// The opcode byte (always present; a builder seeds it)
    pub fn opcode(&self) -> u8 {
        self.bytes[0]
    }

    /// Total wire length including the opcode byte (never zero)
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl AsRef<[u8]> for Packet {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Ordered-fragment accumulator for one packet
///
/// `build` consumes the builder; each logical command gets a fresh one.
#[derive(Debug)]
pub struct PacketBuilder {
    buf: BytesMut,
}

impl PacketBuilder {
    /// Start a packet for `command`, seeding the opcode byte
    pub fn new(command: Command) -> Self {
        let mut buf = BytesMut::with_capacity(8);
        buf.put_u8(command.opcode());
        Self { buf }
    }

    /// Append a single payload byte
    pub fn push_u8(mut self, byte: u8) -> Self {
        self.buf.put_u8(byte);
        self
    }

    /// Append a big-endian u16
    pub fn push_u16_be(mut self, value: u16) -> Self {
        self.buf.put_u16(value);
        self
    }

    /// Append a big-endian u32
    pub fn push_u32_be(mut self, value: u32) -> Self {
        self.buf.put_u32(value);
        self
    }

    /// Append a byte sequence verbatim
    pub fn push_slice(mut self, bytes: &[u8]) -> Self {
        self.buf.put_slice(bytes);
        self
    }

    /// Finalize into an immutable packet, consuming the builder
    pub fn build(self) -> Packet {
        Packet {
            bytes: self.buf.freeze(),
        }
    }
}
