//! Test utilities for socksd integration tests
//!
//! Shared helpers for starting a server on an ephemeral port, running a
//! loopback echo upstream, and building SOCKS5 wire frames.

use socksd::config::{AuthConfig, Config, ServerConfig};
use socksd::server::Server;
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;

/// Test username used across scenarios
pub const TEST_USER: &[u8] = b"zhangsan";
/// Test password used across scenarios
pub const TEST_PASS: &[u8] = b"123456";

/// Start a socksd server on an ephemeral loopback port.
///
/// Returns the bound address and the shutdown sender; dropping the sender
/// also stops the accept loop.
pub async fn start_test_server() -> (SocketAddr, broadcast::Sender<bool>) {
    let config = Config {
        server: ServerConfig {
            listen: "127.0.0.1:0".to_string(),
            connect_timeout: 2,
        },
        auth: AuthConfig {
            username: String::from_utf8(TEST_USER.to_vec()).unwrap(),
            password: String::from_utf8(TEST_PASS.to_vec()).unwrap(),
        },
    };

    let server = Server::bind(config).await.unwrap();
    let addr = server.local_addr().unwrap();
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    tokio::spawn(server.serve(shutdown_rx));

    (addr, shutdown_tx)
}

/// Start an upstream on 127.0.0.1 that echoes everything back, then
/// half-closes when the inbound side reaches EOF.
pub async fn start_echo_upstream() -> SocketAddr {
    spawn_echo(TcpListener::bind("127.0.0.1:0").await.unwrap())
}

/// Echo upstream bound via the name "localhost", so a proxy dialing that
/// domain resolves to the same address the listener bound.
pub async fn start_echo_upstream_localhost() -> SocketAddr {
    spawn_echo(TcpListener::bind(("localhost", 0)).await.unwrap())
}

fn spawn_echo(listener: TcpListener) -> SocketAddr {
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let (mut stream, _) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(_) => break,
            };
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                loop {
                    match stream.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => {
                            if stream.write_all(&buf[..n]).await.is_err() {
                                break;
                            }
                        }
                    }
                }
                let _ = stream.shutdown().await;
            });
        }
    });

    addr
}

/// A loopback port with nothing listening on it.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// SOCKS5 wire frame builders
pub mod frames {
    /// Greeting offering the given methods
    pub fn greeting(methods: &[u8]) -> Vec<u8> {
        let mut frame = vec![0x05, methods.len() as u8];
        frame.extend_from_slice(methods);
        frame
    }

    /// Username/password sub-negotiation request
    pub fn sub_negotiation(username: &[u8], password: &[u8]) -> Vec<u8> {
        let mut frame = vec![0x01, username.len() as u8];
        frame.extend_from_slice(username);
        frame.push(password.len() as u8);
        frame.extend_from_slice(password);
        frame
    }

    /// CONNECT request for an IPv4 destination
    pub fn connect_ipv4(ip: [u8; 4], port: u16) -> Vec<u8> {
        let mut frame = vec![0x05, 0x01, 0x00, 0x01];
        frame.extend_from_slice(&ip);
        frame.extend_from_slice(&port.to_be_bytes());
        frame
    }

    /// CONNECT request for a domain destination
    pub fn connect_domain(domain: &str, port: u16) -> Vec<u8> {
        let mut frame = vec![0x05, 0x01, 0x00, 0x03, domain.len() as u8];
        frame.extend_from_slice(domain.as_bytes());
        frame.extend_from_slice(&port.to_be_bytes());
        frame
    }
}

/// Run the greeting and sub-negotiation phases with the test credentials,
/// asserting the expected replies, and return the authenticated stream.
pub async fn connect_and_authenticate(proxy: SocketAddr) -> TcpStream {
    let mut stream = TcpStream::connect(proxy).await.unwrap();

    stream.write_all(&frames::greeting(&[0x02])).await.unwrap();
    let mut reply = [0u8; 2];
    stream.read_exact(&mut reply).await.unwrap();
    assert_eq!(reply, [0x05, 0x02]);

    stream
        .write_all(&frames::sub_negotiation(TEST_USER, TEST_PASS))
        .await
        .unwrap();
    stream.read_exact(&mut reply).await.unwrap();
    assert_eq!(reply, [0x01, 0x00]);

    stream
}

/// Read the request reply and return `(rep, bound_addr_bytes_len)` after
/// asserting the frame is structurally valid.
pub async fn read_request_reply(stream: &mut TcpStream) -> (u8, usize) {
    let mut head = [0u8; 4];
    stream.read_exact(&mut head).await.unwrap();
    assert_eq!(head[0], 0x05);
    assert_eq!(head[2], 0x00);

    let addr_len = match head[3] {
        0x01 => 4,
        0x04 => 16,
        other => panic!("unexpected ATYP in reply: {other:#04x}"),
    };
    let mut rest = vec![0u8; addr_len + 2];
    stream.read_exact(&mut rest).await.unwrap();

    (head[1], addr_len)
}
