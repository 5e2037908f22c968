//! SOCKS5 request parser
//!
//! Reads the third-phase request frame and produces the command plus a
//! semantic destination address. Every field is consumed by its declared
//! length; nothing is buffered past the end of the frame.

use crate::error::Socks5Error;
use crate::socks::codec;
use crate::socks::consts::*;
use crate::socks::types::{SocksCommand, TargetAddr};
use std::net::{Ipv4Addr, Ipv6Addr};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::debug;

/// Parse a SOCKS5 request from the stream.
///
/// ```text
/// +----+-----+-------+------+----------+----------+
/// |VER | CMD |  RSV  | ATYP | DST.ADDR | DST.PORT |
/// +----+-----+-------+------+----------+----------+
/// | 1  |  1  | X'00' |  1   | Variable |    2     |
/// +----+-----+-------+------+----------+----------+
/// ```
///
/// Error mapping: a version byte other than `0x05` or a command byte outside
/// the RFC set is a protocol violation (close, no reply); an address type
/// outside `{0x01, 0x03, 0x04}` is reported as
/// [`Socks5Error::AddressTypeNotSupported`] so the caller can send the
/// `rep = 0x08` reply. The received RSV byte is not echoed anywhere.
pub async fn parse_request<S>(stream: &mut S) -> Result<(SocksCommand, TargetAddr), Socks5Error>
where
    S: AsyncRead + Unpin,
{
    let mut header = [0u8; 4];
    stream.read_exact(&mut header).await?;

    let version = header[0];
    let cmd_byte = header[1];
    let _reserved = header[2];
    let addr_type = header[3];

    if version != SOCKS5_VERSION {
        return Err(Socks5Error::UnsupportedVersion(version));
    }

    let command =
        SocksCommand::from_byte(cmd_byte).ok_or(Socks5Error::UnknownCommand(cmd_byte))?;

    let target = parse_address(stream, addr_type).await?;

    debug!("parsed request: {} {}", command, target);

    Ok((command, target))
}

/// Parse the `DST.ADDR` and `DST.PORT` fields for the given address type.
async fn parse_address<S>(stream: &mut S, addr_type: u8) -> Result<TargetAddr, Socks5Error>
where
    S: AsyncRead + Unpin,
{
    match addr_type {
        SOCKS5_ADDR_TYPE_IPV4 => {
            let mut octets = [0u8; 4];
            stream.read_exact(&mut octets).await?;
            let port = codec::read_u16_be(stream).await?;
            Ok(TargetAddr::ipv4(Ipv4Addr::from(octets), port))
        }

        SOCKS5_ADDR_TYPE_DOMAIN => {
            let octets = codec::read_length_prefixed(stream).await?;
            if octets.is_empty() {
                return Err(Socks5Error::InvalidDomain("empty domain name".into()));
            }
            // The octets are not NUL-terminated; interpret them as text for
            // the dial string.
            let domain = String::from_utf8(octets)
                .map_err(|e| Socks5Error::InvalidDomain(e.to_string()))?;
            let port = codec::read_u16_be(stream).await?;
            Ok(TargetAddr::domain(domain, port))
        }

        SOCKS5_ADDR_TYPE_IPV6 => {
            let mut octets = [0u8; 16];
            stream.read_exact(&mut octets).await?;
            let port = codec::read_u16_be(stream).await?;
            Ok(TargetAddr::ipv6(Ipv6Addr::from(octets), port))
        }

        other => Err(Socks5Error::AddressTypeNotSupported(other)),
    }
}
