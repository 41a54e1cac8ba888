//! pinlink Daemon Binary
//!
//! Runs the reference protocol interpreter over TCP, standing in for the
//! real embedded daemon.

use clap::Parser;
use pinlink::{Daemon, DaemonConfig};
use tracing_subscriber::{fmt, EnvFilter};

/// pinlink reference daemon
#[derive(Parser, Debug)]
#[command(name = "pinlink-daemon")]
#[command(about = "Reference daemon for the pin-control protocol")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:7650")]
    listen: String,

    /// Identifier returned by the get-name command
    #[arg(short, long, default_value = "pinlink-daemon")]
    name: String,

    /// Protocol version to speak (commands from later versions get the
    /// unknown-command reply)
    #[arg(short = 'a', long, default_value_t = pinlink::API_VERSION)]
    api_version: u8,

    /// Connection read timeout in milliseconds (0 = none)
    #[arg(long, default_value = "0")]
    read_timeout_ms: u64,

    /// Connection write timeout in milliseconds (0 = none)
    #[arg(long, default_value = "5000")]
    write_timeout_ms: u64,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pinlink=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let args = Args::parse();

    tracing::info!("pinlink daemon v{}", pinlink::VERSION);

    let config = DaemonConfig::builder()
        .listen_addr(&args.listen)
        .name(&args.name)
        .api_version(args.api_version)
        .read_timeout_ms(args.read_timeout_ms)
        .write_timeout_ms(args.write_timeout_ms)
        .build();

    let daemon = match Daemon::bind(config) {
        Ok(d) => d,
        Err(e) => {
            tracing::error!("failed to bind: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = daemon.run() {
        tracing::error!("daemon error: {}", e);
        std::process::exit(1);
    }
}
