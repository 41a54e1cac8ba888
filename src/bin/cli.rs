//! pinlink CLI Client
//!
//! Command-line interface for poking a running daemon.

use clap::{Parser, Subcommand};
use pinlink::{Client, ClientConfig};

/// pinlink CLI
#[derive(Parser, Debug)]
#[command(name = "pinlink-cli")]
#[command(about = "CLI client for the pin-control protocol")]
#[command(version)]
struct Args {
    /// Daemon host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Daemon port
    #[arg(short, long, default_value = "7650")]
    port: u16,

    /// Per-operation timeout in milliseconds
    #[arg(short, long, default_value = "5000")]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Set one pin to a value
    Set {
        /// Pin id (0-255)
        pin: u8,

        /// Value (0-255)
        value: u8,
    },

    /// Set several pins: pairs as pin=value
    SetMany {
        /// Pin assignments, e.g. 3=1 4=0
        #[arg(required = true, value_parser = parse_pair)]
        pairs: Vec<(u8, u8)>,
    },

    /// Read one pin's value
    Get {
        /// Pin id (0-255)
        pin: u8,
    },

    /// Read several pins
    GetMany {
        /// Pin ids
        #[arg(required = true)]
        pins: Vec<u8>,
    },

    /// Write hex-encoded bytes to the SPI bus
    Spi {
        /// Hex byte string, e.g. deadbeef
        hex: String,
    },

    /// Ask the daemon to pause for a duration
    Delay {
        /// Milliseconds (0-65535)
        ms: u16,
    },

    /// Query the daemon's identifier
    Name,

    /// Query the daemon's protocol version
    Version,
}

fn main() {
    let args = Args::parse();

    let config = ClientConfig::builder()
        .host(&args.host)
        .port(args.port)
        .timeout_ms(args.timeout_ms)
        .build();

    if let Err(e) = run(&args.command, &config) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: &Commands, config: &ClientConfig) -> pinlink::Result<()> {
    let mut client = Client::connect(config)?;

    match command {
        Commands::Set { pin, value } => {
            client.set_pin(*pin, *value)?;
            let statuses = client.flush()?;
            println!("{}", if statuses == [true] { "ok" } else { "failed" });
        }
        Commands::SetMany { pairs } => {
            client.set_pins(pairs)?;
            let statuses = client.flush()?;
            println!("{}", if statuses == [true] { "ok" } else { "failed" });
        }
        Commands::Get { pin } => {
            println!("{}", client.get_pin(*pin)?);
        }
        Commands::GetMany { pins } => {
            let values = client.get_pins(pins)?;
            for (pin, value) in pins.iter().zip(values) {
                println!("{} = {}", pin, value);
            }
        }
        Commands::Spi { hex } => {
            let data = parse_hex(hex)
                .map_err(|e| pinlink::LinkError::Protocol(format!("bad hex string: {}", e)))?;
            client.spi_write(&data)?;
            let statuses = client.flush()?;
            println!("{}", if statuses == [true] { "ok" } else { "failed" });
        }
        Commands::Delay { ms } => {
            client.delay(*ms)?;
            let statuses = client.flush()?;
            println!("{}", if statuses == [true] { "ok" } else { "failed" });
        }
        Commands::Name => {
            println!("{}", client.get_name()?);
        }
        Commands::Version => {
            println!("{}", client.get_api_version()?);
        }
    }

    client.close();
    Ok(())
}

/// Parse a pin=value argument
fn parse_pair(s: &str) -> Result<(u8, u8), String> {
    let (pin, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected pin=value, got \"{}\"", s))?;
    let pin = pin.parse::<u8>().map_err(|e| format!("bad pin: {}", e))?;
    let value = value.parse::<u8>().map_err(|e| format!("bad value: {}", e))?;
    Ok((pin, value))
}

/// Parse an even-length hex string into bytes
fn parse_hex(s: &str) -> Result<Vec<u8>, String> {
    if !s.is_ascii() {
        return Err("non-ASCII character in hex string".to_string());
    }
    if s.len() % 2 != 0 {
        return Err("odd number of hex digits".to_string());
    }
    s.as_bytes()
        .chunks(2)
        .map(|pair| {
            let digits = std::str::from_utf8(pair).map_err(|e| e.to_string())?;
            u8::from_str_radix(digits, 16).map_err(|e| e.to_string())
        })
        .collect()
}
