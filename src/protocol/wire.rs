//! Wire-level numeric encoding
//!
//! Big-endian unsigned integers in the widths the protocol uses: 1, 2,
//! or 4 bytes. Any other width is a protocol-version bug, not a runtime
//! condition, and is reported as a protocol error.

use crate::error::{LinkError, Result};

/// Encode `value` as a big-endian unsigned integer of `width` bytes
///
/// Widths outside {1, 2, 4} fail; values that do not fit the width fail.
pub fn encode_be(value: u32, width: usize) -> Result<Vec<u8>> {
    match width {
        1 => {
            if value > u8::MAX as u32 {
                return Err(LinkError::Protocol(format!(
                    "value {} does not fit in 1 byte",
                    value
                )));
            }
            Ok(vec![value as u8])
        }
        2 => {
            if value > u16::MAX as u32 {
                return Err(LinkError::Protocol(format!(
                    "value {} does not fit in 2 bytes",
                    value
                )));
            }
            Ok((value as u16).to_be_bytes().to_vec())
        }
        4 => Ok(value.to_be_bytes().to_vec()),
        _ => Err(LinkError::Protocol(format!(
            "unsupported integer width: {} bytes",
            width
        ))),
    }
}

/// Decode a big-endian unsigned integer from `bytes`
///
/// Accepts exactly 1, 2, or 4 bytes.
pub fn decode_be(bytes: &[u8]) -> Result<u32> {
    match bytes {
        [b0] => Ok(*b0 as u32),
        [b0, b1] => Ok(u16::from_be_bytes([*b0, *b1]) as u32),
        [b0, b1, b2, b3] => Ok(u32::from_be_bytes([*b0, *b1, *b2, *b3])),
        _ => Err(LinkError::Protocol(format!(
            "unsupported integer width: {} bytes",
            bytes.len()
        ))),
    }
}
