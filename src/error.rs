//! Error types for socksd
//!
//! Defines the per-connection protocol error taxonomy and the SOCKS5
//! reply codes.

use crate::socks::SocksCommand;
use std::io;
use thiserror::Error;

/// Errors raised while driving a single SOCKS5 connection.
///
/// Every variant maps to one of two actions in the handler: close the
/// connection silently, or write the phase's failure reply and then close.
/// Errors never cross the connection boundary.
#[derive(Error, Debug)]
pub enum Socks5Error {
    /// Client spoke a protocol version other than 5
    #[error("unsupported SOCKS version: {0:#04x}")]
    UnsupportedVersion(u8),

    /// Sub-negotiation version byte was not 0x01
    #[error("unsupported auth sub-negotiation version: {0:#04x}")]
    UnsupportedSubVersion(u8),

    /// Greeting offered no method this server accepts
    #[error("no acceptable authentication method")]
    NoAcceptableMethod,

    /// Credential predicate rejected the username/password pair
    #[error("authentication failed")]
    AuthFailed,

    /// Command byte outside the set defined by RFC 1928
    #[error("unknown command: {0:#04x}")]
    UnknownCommand(u8),

    /// Well-formed command this server does not implement (BIND, UDP ASSOCIATE)
    #[error("command not supported: {0}")]
    CommandNotSupported(SocksCommand),

    /// Address type byte outside {IPv4, DOMAIN, IPv6}
    #[error("address type not supported: {0:#04x}")]
    AddressTypeNotSupported(u8),

    /// Domain field that cannot name a dialable host
    #[error("invalid domain name: {0}")]
    InvalidDomain(String),

    /// Outbound connect failed (resolution, refusal, unreachability, timeout)
    #[error("upstream dial failed: {0}")]
    Dial(#[source] io::Error),

    /// Read or write on the client stream failed mid-phase
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Reply codes for the SOCKS5 request reply, per RFC 1928 section 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ReplyCode {
    /// Command succeeded
    Succeeded = 0x00,
    /// General SOCKS server failure
    GeneralFailure = 0x01,
    /// Connection not allowed by ruleset
    ConnectionNotAllowed = 0x02,
    /// Network unreachable
    NetworkUnreachable = 0x03,
    /// Host unreachable
    HostUnreachable = 0x04,
    /// Connection refused
    ConnectionRefused = 0x05,
    /// TTL expired
    TtlExpired = 0x06,
    /// Command not supported
    CommandNotSupported = 0x07,
    /// Address type not supported
    AddressTypeNotSupported = 0x08,
}

impl From<ReplyCode> for u8 {
    fn from(code: ReplyCode) -> Self {
        code as u8
    }
}

impl TryFrom<u8> for ReplyCode {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(ReplyCode::Succeeded),
            0x01 => Ok(ReplyCode::GeneralFailure),
            0x02 => Ok(ReplyCode::ConnectionNotAllowed),
            0x03 => Ok(ReplyCode::NetworkUnreachable),
            0x04 => Ok(ReplyCode::HostUnreachable),
            0x05 => Ok(ReplyCode::ConnectionRefused),
            0x06 => Ok(ReplyCode::TtlExpired),
            0x07 => Ok(ReplyCode::CommandNotSupported),
            0x08 => Ok(ReplyCode::AddressTypeNotSupported),
            other => Err(other),
        }
    }
}
