//! Command catalog
//!
//! The closed set of protocol commands. Opcodes are stable and never
//! reused; each command records the minimum protocol version that
//! understands it.

/// Protocol version spoken by this crate
pub const API_VERSION: u8 = 2;

/// Protocol commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    /// Set one pin to a value
    SetPinSingle = 0x01,

    /// Set several pins in one command
    SetPinMulti = 0x02,

    /// Write a raw byte block to the SPI bus
    WriteBytes = 0x03,

    /// Read one pin's value
    GetPinSingle = 0x04,

    /// Read several pins in one command
    GetPinMulti = 0x05,

    /// Pause command processing for a duration
    Delay = 0x06,

    /// Wait until a pin reaches a value, bounded by a timeout
    WaitForPin = 0x07,

    /// Query the daemon's identifier string
    GetName = 0x08,

    /// Query the daemon's protocol version
    GetApiVersion = 0x09,
}

impl Command {
    /// Get the wire opcode
    pub fn opcode(&self) -> u8 {
        *self as u8
    }

    /// Minimum protocol version that understands this command
    pub fn min_version(&self) -> u8 {
        match self {
            Command::SetPinSingle
            | Command::SetPinMulti
            | Command::WriteBytes
            | Command::GetPinSingle
            | Command::GetPinMulti
            | Command::Delay
            | Command::WaitForPin => 1,
            Command::GetName | Command::GetApiVersion => 2,
        }
    }

    /// Look up a command by opcode
    ///
    /// Returns `None` for opcodes outside the catalog; the interpreter
    /// maps that miss to the unknown-command default reply.
    pub fn from_opcode(opcode: u8) -> Option<Command> {
        match opcode {
            0x01 => Some(Command::SetPinSingle),
            0x02 => Some(Command::SetPinMulti),
            0x03 => Some(Command::WriteBytes),
            0x04 => Some(Command::GetPinSingle),
            0x05 => Some(Command::GetPinMulti),
            0x06 => Some(Command::Delay),
            0x07 => Some(Command::WaitForPin),
            0x08 => Some(Command::GetName),
            0x09 => Some(Command::GetApiVersion),
            _ => None,
        }
    }
}
