//! Integration tests for pinlink
//!
//! Full client ↔ daemon exchanges over a TCP loopback: the daemon
//! serves one connection on an ephemeral port in a background thread.

use std::net::SocketAddr;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use pinlink::{Client, ClientConfig, Daemon, DaemonConfig, LinkError, API_VERSION};

// =============================================================================
// Test Harness
// =============================================================================

fn start_daemon(name: &str, api_version: u8) -> (SocketAddr, JoinHandle<()>) {
    let config = DaemonConfig::builder()
        .listen_addr("127.0.0.1:0")
        .name(name)
        .api_version(api_version)
        .build();

    let daemon = Daemon::bind(config).unwrap();
    let addr = daemon.local_addr().unwrap();
    let handle = std::thread::spawn(move || {
        let _ = daemon.serve_one();
    });
    (addr, handle)
}

fn connect(addr: SocketAddr) -> Client {
    let config = ClientConfig::builder()
        .host("127.0.0.1")
        .port(addr.port())
        .timeout_ms(2000)
        .build();
    Client::connect(&config).unwrap()
}

// =============================================================================
// Round-Trip Tests
// =============================================================================

#[test]
fn test_set_flush_get_round_trip() {
    let (addr, handle) = start_daemon("Test server", API_VERSION);
    let mut client = connect(addr);

    for (pin, value) in [(0u8, 0u8), (7, 42), (255, 255), (128, 1)] {
        client.set_pin(pin, value).unwrap();
        assert_eq!(client.flush().unwrap(), vec![true]);
        assert_eq!(client.get_pin(pin).unwrap(), value);
    }

    client.close();
    handle.join().unwrap();
}

#[test]
fn test_get_pin_is_idempotent() {
    let (addr, handle) = start_daemon("Test server", API_VERSION);
    let mut client = connect(addr);

    client.set_pin(12, 34).unwrap();
    client.flush().unwrap();

    let first = client.get_pin(12).unwrap();
    let second = client.get_pin(12).unwrap();
    assert_eq!(first, 34);
    assert_eq!(first, second);

    client.close();
    handle.join().unwrap();
}

#[test]
fn test_set_pins_get_pins_preserves_order() {
    let (addr, handle) = start_daemon("Test server", API_VERSION);
    let mut client = connect(addr);

    let pairs = [(9u8, 90u8), (3, 30), (250, 25), (1, 10)];
    client.set_pins(&pairs).unwrap();
    assert_eq!(client.flush().unwrap(), vec![true]);

    let pins: Vec<u8> = pairs.iter().map(|&(p, _)| p).collect();
    let expected: Vec<u8> = pairs.iter().map(|&(_, v)| v).collect();
    assert_eq!(client.get_pins(&pins).unwrap(), expected);

    client.close();
    handle.join().unwrap();
}

#[test]
fn test_multi_pin_ones_then_zeros() {
    let (addr, handle) = start_daemon("Test server", API_VERSION);
    let mut client = connect(addr);

    let pins = [0u8, 1, 2, 3, 4];

    client.set_pins(&pins.map(|p| (p, 1))).unwrap();
    assert_eq!(client.flush().unwrap(), vec![true]);
    assert_eq!(client.get_pins(&pins).unwrap(), vec![1, 1, 1, 1, 1]);

    client.set_pins(&pins.map(|p| (p, 0))).unwrap();
    assert_eq!(client.flush().unwrap(), vec![true]);
    assert_eq!(client.get_pins(&pins).unwrap(), vec![0, 0, 0, 0, 0]);

    client.close();
    handle.join().unwrap();
}

// =============================================================================
// Batch Correlation Tests
// =============================================================================

#[test]
fn test_three_queued_commands_yield_three_statuses() {
    let (addr, handle) = start_daemon("Test server", API_VERSION);
    let mut client = connect(addr);

    client.set_pin(1, 1).unwrap();
    client.spi_write(&[0xAB, 0xCD]).unwrap();
    client.delay(5).unwrap();
    assert_eq!(client.pending_len(), 3);

    let statuses = client.flush().unwrap();
    assert_eq!(statuses, vec![true, true, true]);

    client.close();
    handle.join().unwrap();
}

#[test]
fn test_read_op_sees_effects_of_unflushed_writes() {
    let (addr, handle) = start_daemon("Test server", API_VERSION);
    let mut client = connect(addr);

    // No explicit flush: get_pin must flush the queued write first
    client.set_pin(77, 99).unwrap();
    assert_eq!(client.get_pin(77).unwrap(), 99);
    assert_eq!(client.pending_len(), 0);

    client.close();
    handle.join().unwrap();
}

#[test]
fn test_wait_for_pin_acknowledged() {
    let (addr, handle) = start_daemon("Test server", API_VERSION);
    let mut client = connect(addr);

    client.wait_for_pin(3, 1, 100).unwrap();
    assert_eq!(client.flush().unwrap(), vec![true]);

    client.close();
    handle.join().unwrap();
}

// =============================================================================
// Identity Tests
// =============================================================================

#[test]
fn test_get_name_returns_configured_identifier() {
    let (addr, handle) = start_daemon("Test server", API_VERSION);
    let mut client = connect(addr);

    assert_eq!(client.get_name().unwrap(), "Test server");

    client.close();
    handle.join().unwrap();
}

#[test]
fn test_api_version_is_positive() {
    let (addr, handle) = start_daemon("Test server", API_VERSION);
    let mut client = connect(addr);

    let version = client.get_api_version().unwrap();
    assert!(version > 0);
    assert_eq!(version, API_VERSION);

    client.close();
    handle.join().unwrap();
}

#[test]
fn test_api_version_against_v1_daemon_falls_back_to_one() {
    let (addr, handle) = start_daemon("old daemon", 1);
    let mut client = connect(addr);

    // The v1 daemon answers the unknown command with its default reply
    assert_eq!(client.get_api_version().unwrap(), 1);

    client.close();
    handle.join().unwrap();
}

// =============================================================================
// Connection Lifecycle Tests
// =============================================================================

#[test]
fn test_pin_state_does_not_survive_reconnect() {
    let config = DaemonConfig::builder()
        .listen_addr("127.0.0.1:0")
        .name("Test server")
        .build();
    let daemon = Daemon::bind(config).unwrap();
    let addr = daemon.local_addr().unwrap();

    let handle = std::thread::spawn(move || {
        // Serve two connections back to back
        let _ = daemon.serve_one();
        let _ = daemon.serve_one();
    });

    let mut client = connect(addr);
    client.set_pin(5, 123).unwrap();
    client.flush().unwrap();
    assert_eq!(client.get_pin(5).unwrap(), 123);
    client.close();
    drop(client);

    // Fresh connection, fresh pin table
    let mut client = connect(addr);
    assert_eq!(client.get_pin(5).unwrap(), 0);
    client.close();

    handle.join().unwrap();
}

#[test]
fn test_read_times_out_against_silent_peer() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    // Accept and hold the connection open without ever replying
    let handle = std::thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        std::thread::sleep(Duration::from_millis(1500));
        drop(stream);
    });

    let config = ClientConfig::builder()
        .host("127.0.0.1")
        .port(addr.port())
        .timeout_ms(200)
        .build();
    let mut client = Client::connect(&config).unwrap();

    let start = Instant::now();
    let err = client.get_pin(1).unwrap_err();
    assert!(matches!(err, LinkError::Timeout(_)));

    // The deadline aborts this one read; it does not wait for the peer
    assert!(start.elapsed() >= Duration::from_millis(200));
    assert!(start.elapsed() < Duration::from_millis(1000));

    client.close();
    handle.join().unwrap();
}

#[test]
fn test_peer_close_unblocks_pending_read() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    // Shut the stream down while the client is blocked reading
    let handle = std::thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        std::thread::sleep(Duration::from_millis(150));
        let _ = stream.shutdown(std::net::Shutdown::Both);
    });

    let config = ClientConfig::builder()
        .host("127.0.0.1")
        .port(addr.port())
        .timeout_ms(5000)
        .build();
    let mut client = Client::connect(&config).unwrap();

    let start = Instant::now();
    let err = client.get_pin(1).unwrap_err();
    assert!(matches!(err, LinkError::Closed));

    // Unblocked by the close, well before the 5 s timeout
    assert!(start.elapsed() < Duration::from_secs(2));

    client.close();
    handle.join().unwrap();
}

#[test]
fn test_connect_to_unreachable_endpoint_fails() {
    // Bind then drop a listener to get a port with nothing behind it
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let config = ClientConfig::builder()
        .host("127.0.0.1")
        .port(port)
        .timeout_ms(500)
        .build();
    let err = Client::connect(&config).unwrap_err();
    assert!(matches!(err, pinlink::LinkError::Connection(_)));
}
