//! Protocol Module
//!
//! Defines the wire protocol for client-daemon communication.
//!
//! ## Protocol Format (V2 - Simple Binary)
//!
//! ### Request Format
//! ```text
//! ┌──────────┬─────────────────────────────────────────┐
//! │ Cmd (1)  │       Command-specific payload          │
//! └──────────┴─────────────────────────────────────────┘
//! ```
//!
//! ### Commands
//! - 0x01: SET_PIN      - Payload: pin (1) + value (1)
//! - 0x02: SET_PINS     - Payload: count (1) + count × (pin (1) + value (1))
//! - 0x03: WRITE_BYTES  - Payload: len (4, BE) + len raw bytes
//! - 0x04: GET_PIN      - Payload: pin (1)
//! - 0x05: GET_PINS     - Payload: count (1) + count pin ids
//! - 0x06: DELAY        - Payload: milliseconds (2, BE)
//! - 0x07: WAIT_FOR_PIN - Payload: pin (1) + value (1) + milliseconds (2, BE)
//! - 0x08: GET_NAME     - Payload: empty               (since v2)
//! - 0x09: GET_VERSION  - Payload: empty               (since v2)
//!
//! ### Response Format
//! Responses carry no header; every command has a statically known or
//! previously-declared reply length:
//! - Write-type commands and GET_VERSION: exactly 1 byte (1 = success)
//! - GET_PIN: 1 value byte; GET_PINS: count value bytes in request order
//! - GET_NAME: name_len (1) + name_len UTF-8 bytes
//! - Unrecognized opcode: 1 byte, value 1
//!
//! All multi-byte integers are big-endian, unsigned.

mod command;
mod packet;
mod wire;

pub use command::{Command, API_VERSION};
pub use packet::{Packet, PacketBuilder};
pub use wire::{decode_be, encode_be};
