//! SOCKS5 reply builder
//!
//! Encodes request replies as complete frames and writes each one with a
//! single `write_all`, so a success reply can never interleave with relay
//! bytes. The bound address is always an IP endpoint; the domain form does
//! not appear in replies.

use crate::error::ReplyCode;
use crate::socks::codec;
use crate::socks::consts::*;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tokio::io::AsyncWrite;

/// Encode a reply frame.
///
/// ```text
/// +----+-----+-------+------+----------+----------+
/// |VER | REP |  RSV  | ATYP | BND.ADDR | BND.PORT |
/// +----+-----+-------+------+----------+----------+
/// | 1  |  1  | X'00' |  1   | Variable |    2     |
/// +----+-----+-------+------+----------+----------+
/// ```
///
/// `bind_addr` is the local endpoint of the outbound stream on success; on
/// failure pass `None` for the zero IPv4 placeholder, or a zero address of
/// the relevant family. RSV is always `0x00` on output.
pub fn encode_reply(code: ReplyCode, bind_addr: Option<SocketAddr>) -> Vec<u8> {
    let bind_addr =
        bind_addr.unwrap_or_else(|| SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0));

    let mut reply = vec![SOCKS5_VERSION, code.into(), SOCKS5_RESERVED];

    match bind_addr {
        SocketAddr::V4(addr) => {
            reply.push(SOCKS5_ADDR_TYPE_IPV4);
            reply.extend_from_slice(&addr.ip().octets());
        }
        SocketAddr::V6(addr) => {
            reply.push(SOCKS5_ADDR_TYPE_IPV6);
            reply.extend_from_slice(&addr.ip().octets());
        }
    }
    reply.extend_from_slice(&bind_addr.port().to_be_bytes());

    reply
}

/// Encode and send a reply as one write.
pub async fn send_reply<W>(
    stream: &mut W,
    code: ReplyCode,
    bind_addr: Option<SocketAddr>,
) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    codec::write_frame(stream, &encode_reply(code, bind_addr)).await
}

/// Send the `rep = 0x07` refusal for BIND / UDP ASSOCIATE.
pub async fn send_command_not_supported<W>(stream: &mut W) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    send_reply(stream, ReplyCode::CommandNotSupported, None).await
}

/// Send the `rep = 0x08` refusal for an unrecognized address type.
///
/// The received ATYP cannot be echoed meaningfully, so the frame carries the
/// zero IPv4 placeholder bind.
pub async fn send_address_type_not_supported<W>(stream: &mut W) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    send_reply(stream, ReplyCode::AddressTypeNotSupported, None).await
}
