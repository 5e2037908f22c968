//! CONNECT dispatch and bidirectional relay
//!
//! Opens the outbound stream for a CONNECT request, reports the bound local
//! endpoint back to the client, then copies bytes in both directions until
//! each side reaches EOF. A direction that sees EOF half-closes its
//! destination so the peer can finish draining the opposite direction.

use crate::config::ServerConfig;
use crate::error::{ReplyCode, Socks5Error};
use crate::socks::command::send_reply;
use crate::socks::types::TargetAddr;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, info};

/// Handle a CONNECT command.
///
/// Resolves the destination, dials it under the configured timeout, sends the
/// success reply carrying the outbound socket's local endpoint, then relays.
/// Any connection-level failure (resolution, refusal, unreachability,
/// timeout) is reported to the client as `rep = 0x04` with a zero bind of the
/// request's address family before the connection is closed.
pub async fn handle_connect<S>(
    mut client_stream: S,
    target: TargetAddr,
    config: &ServerConfig,
) -> Result<(), Socks5Error>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    let upstream = match dial(&target, config.connect_timeout).await {
        Ok(stream) => stream,
        Err(e) => {
            send_reply(
                &mut client_stream,
                ReplyCode::HostUnreachable,
                Some(placeholder_bind(&target)),
            )
            .await?;
            return Err(Socks5Error::Dial(e));
        }
    };

    // The local end of the outbound socket is what BND.ADDR/BND.PORT report.
    let local_addr = upstream.local_addr().ok();
    send_reply(&mut client_stream, ReplyCode::Succeeded, local_addr).await?;

    info!("tunnel established to {}", target);

    let (client_to_upstream, upstream_to_client) = relay(client_stream, upstream).await;
    debug!(
        "tunnel to {} closed: {} bytes out, {} bytes in",
        target, client_to_upstream, upstream_to_client
    );

    Ok(())
}

/// Resolve and dial the destination, bounding the whole attempt by `timeout`
/// seconds (`0` disables the bound).
async fn dial(target: &TargetAddr, timeout: u64) -> std::io::Result<TcpStream> {
    let connect = async {
        let addr = target.resolve().await?;
        TcpStream::connect(addr).await
    };

    if timeout == 0 {
        return connect.await;
    }

    match tokio::time::timeout(Duration::from_secs(timeout), connect).await {
        Ok(result) => result,
        Err(_) => Err(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            "connect timed out",
        )),
    }
}

/// Zero bind endpoint in the family of the failed request.
///
/// Domain requests get the IPv4 placeholder; the domain form never appears
/// in a reply.
fn placeholder_bind(target: &TargetAddr) -> SocketAddr {
    match target {
        TargetAddr::Ip(SocketAddr::V6(_)) => {
            SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0)
        }
        _ => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
    }
}

/// Relay bytes between two streams until both directions are done.
///
/// The two directions are independent: each copies until EOF or an I/O error,
/// then shuts down the write side of its destination so the peer observes
/// EOF once the in-flight bytes are drained. Returns the byte counts moved
/// client→upstream and upstream→client; a direction that failed mid-copy
/// reports the count as 0 and the error is logged here, never sent to the
/// client (the reply phase is already over).
pub async fn relay<A, B>(client: A, upstream: B) -> (u64, u64)
where
    A: AsyncRead + AsyncWrite + Unpin,
    B: AsyncRead + AsyncWrite + Unpin,
{
    let (mut client_read, mut client_write) = tokio::io::split(client);
    let (mut upstream_read, mut upstream_write) = tokio::io::split(upstream);

    let client_to_upstream = async {
        let copied = match tokio::io::copy(&mut client_read, &mut upstream_write).await {
            Ok(n) => {
                debug!("client to upstream finished: {} bytes", n);
                n
            }
            Err(e) => {
                debug!("client to upstream error: {}", e);
                0
            }
        };
        // Half-close: the upstream sees EOF but can still send.
        let _ = upstream_write.shutdown().await;
        copied
    };

    let upstream_to_client = async {
        let copied = match tokio::io::copy(&mut upstream_read, &mut client_write).await {
            Ok(n) => {
                debug!("upstream to client finished: {} bytes", n);
                n
            }
            Err(e) => {
                debug!("upstream to client error: {}", e);
                0
            }
        };
        let _ = client_write.shutdown().await;
        copied
    };

    tokio::join!(client_to_upstream, upstream_to_client)
}
