//! Protocol Interpreter
//!
//! Decodes one command at a time from a byte stream, mutates virtual pin
//! state, and answers each command as it is decoded (replies are never
//! batched server-side; batch correlation is purely a client concern).

use std::collections::HashMap;
use std::io::{Read, Write};
use std::time::Duration;

use crate::error::{LinkError, Result};
use crate::protocol::{decode_be, Command};

/// Upper bound on a WriteBytes block, so a corrupt length field cannot
/// drive an unbounded allocation (16 MB)
pub const MAX_SPI_PAYLOAD: u32 = 16 * 1024 * 1024;

/// Reply byte for write-type and unrecognized commands
const REPLY_OK: u8 = 1;

/// Reference interpreter for one connection
///
/// The pin table lives as long as the interpreter; a new connection gets
/// a new interpreter and therefore a clean table.
pub struct Interpreter {
    /// Identifier returned by GetName (clamped to 255 UTF-8 bytes)
    name: String,

    /// Protocol version this interpreter speaks; commands introduced
    /// later fall through to the unrecognized branch
    api_version: u8,

    /// Virtual pin table: pin id -> last written value, default 0
    pins: HashMap<u8, u8>,
}

impl Interpreter {
    /// Create an interpreter with the given identity
    pub fn new(name: impl Into<String>, api_version: u8) -> Self {
        Self {
            name: clamp_name(name.into()),
            api_version,
            pins: HashMap::new(),
        }
    }

    /// Current value of a pin (0 if never written)
    pub fn pin(&self, pin: u8) -> u8 {
        self.pins.get(&pin).copied().unwrap_or(0)
    }

    /// Serve a connection until it closes
    ///
    /// Loops reading one opcode byte, dispatching, and replying. A stream
    /// that ends between commands is a clean close; ending mid-command is
    /// an error surfaced to the caller.
    pub fn serve<S: Read + Write>(&mut self, stream: &mut S) -> Result<()> {
        loop {
            let mut opcode = [0u8; 1];
            match stream.read_exact(&mut opcode) {
                Ok(()) => {}
                Err(ref e) if is_disconnect(e.kind()) => return Ok(()),
                // An idle client hitting the socket read timeout is a
                // graceful close, but only between commands; a timeout
                // mid-payload stays an error.
                Err(ref e) if is_idle_timeout(e.kind()) => {
                    tracing::debug!("read timeout waiting for next command, closing");
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            }

            self.dispatch(opcode[0], stream)?;
        }
    }

    /// Decode one command's payload, apply it, and write its reply
    fn dispatch<S: Read + Write>(&mut self, opcode: u8, stream: &mut S) -> Result<()> {
        // A catalog miss and a command newer than this interpreter's
        // version take the same branch: the fallback reply is part of
        // the protocol contract.
        let command =
            Command::from_opcode(opcode).filter(|c| c.min_version() <= self.api_version);

        tracing::trace!("dispatching opcode 0x{:02x} -> {:?}", opcode, command);

        match command {
            Some(Command::SetPinSingle) => {
                let args = read_n(stream, 2)?;
                self.pins.insert(args[0], args[1]);
                reply(stream, &[REPLY_OK])
            }
            Some(Command::SetPinMulti) => {
                let count = read_n(stream, 1)?[0] as usize;
                let pairs = read_n(stream, count * 2)?;
                for pair in pairs.chunks_exact(2) {
                    self.pins.insert(pair[0], pair[1]);
                }
                reply(stream, &[REPLY_OK])
            }
            Some(Command::WriteBytes) => {
                let len = decode_be(&read_n(stream, 4)?)?;
                if len > MAX_SPI_PAYLOAD {
                    return Err(LinkError::Protocol(format!(
                        "SPI block too large: {} bytes (max {})",
                        len, MAX_SPI_PAYLOAD
                    )));
                }
                // No SPI bus behind the reference daemon; the block is
                // consumed and discarded.
                let _ = read_n(stream, len as usize)?;
                reply(stream, &[REPLY_OK])
            }
            Some(Command::GetPinSingle) => {
                let pin = read_n(stream, 1)?[0];
                let value = *self.pins.entry(pin).or_insert(0);
                reply(stream, &[value])
            }
            Some(Command::GetPinMulti) => {
                let count = read_n(stream, 1)?[0] as usize;
                let ids = read_n(stream, count)?;
                let values: Vec<u8> = ids
                    .iter()
                    .map(|&pin| *self.pins.entry(pin).or_insert(0))
                    .collect();
                reply(stream, &values)
            }
            Some(Command::Delay) => {
                let ms = decode_be(&read_n(stream, 2)?)?;
                std::thread::sleep(Duration::from_millis(ms as u64));
                reply(stream, &[REPLY_OK])
            }
            Some(Command::WaitForPin) => {
                let args = read_n(stream, 4)?;
                let ms = decode_be(&args[2..4])?;
                // The poll loop is not implemented in the reference
                // daemon; the payload is decoded and acknowledged only.
                tracing::warn!(
                    "wait-for-pin (pin {}, value {}, {} ms): poll not implemented, replying success",
                    args[0],
                    args[1],
                    ms
                );
                reply(stream, &[REPLY_OK])
            }
            Some(Command::GetName) => {
                let bytes = self.name.as_bytes();
                let mut out = Vec::with_capacity(1 + bytes.len());
                out.push(bytes.len() as u8);
                out.extend_from_slice(bytes);
                reply(stream, &out)
            }
            Some(Command::GetApiVersion) => reply(stream, &[self.api_version]),
            None => {
                tracing::debug!("unrecognized opcode 0x{:02x}, replying default", opcode);
                reply(stream, &[REPLY_OK])
            }
        }
    }
}

/// Read exactly `n` bytes of command payload
fn read_n<R: Read>(stream: &mut R, n: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; n];
    if n > 0 {
        stream.read_exact(&mut buf).map_err(|e| {
            if is_disconnect(e.kind()) {
                LinkError::Closed
            } else {
                LinkError::Io(e)
            }
        })?;
    }
    Ok(buf)
}

/// Write one command's reply back to the caller
fn reply<W: Write>(stream: &mut W, bytes: &[u8]) -> Result<()> {
    stream.write_all(bytes)?;
    stream.flush()?;
    Ok(())
}

fn is_disconnect(kind: std::io::ErrorKind) -> bool {
    use std::io::ErrorKind;
    matches!(
        kind,
        ErrorKind::UnexpectedEof | ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted
    )
}

// WouldBlock on Unix, TimedOut on Windows
fn is_idle_timeout(kind: std::io::ErrorKind) -> bool {
    use std::io::ErrorKind;
    matches!(kind, ErrorKind::WouldBlock | ErrorKind::TimedOut)
}

/// Clamp a daemon name to the 255 bytes the 1-byte length prefix allows,
/// on a character boundary
fn clamp_name(name: String) -> String {
    if name.len() <= u8::MAX as usize {
        return name;
    }
    let mut end = u8::MAX as usize;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    tracing::warn!("daemon name truncated to {} bytes", end);
    name[..end].to_string()
}
