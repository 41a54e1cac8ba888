//! Server Module
//!
//! The reference protocol interpreter and its TCP accept loop. This is
//! the mock embedded daemon: it speaks the wire protocol against a
//! virtual pin table so the client can be validated without hardware.
//!
//! ## Architecture
//! - One accepted connection served at a time
//! - Fresh interpreter state (pin table) per connection
//! - Per-connection failures close that connection, not the process

mod interpreter;
mod listener;

pub use interpreter::{Interpreter, MAX_SPI_PAYLOAD};
pub use listener::Daemon;
