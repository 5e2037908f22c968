//! SOCKS5 authentication negotiation
//!
//! Drives the first two protocol phases: method selection and the
//! username/password sub-negotiation. This server only ever selects the
//! username/password method (RFC 1929); a greeting that does not offer it is
//! answered with the no-acceptable-method reply.

mod password;

pub use password::{authenticate, StaticCredentials, Verifier};

use crate::error::Socks5Error;
use crate::socks::codec;
use crate::socks::consts::*;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

/// Run the method-selection and sub-negotiation phases.
///
/// Greeting:
/// ```text
/// +----+----------+----------+
/// |VER | NMETHODS | METHODS  |
/// +----+----------+----------+
/// | 1  |    1     | 1 to 255 |
/// +----+----------+----------+
/// ```
///
/// The method reply is `{0x05, 0x02}` when the client offers
/// username/password (regardless of where in its list), `{0x05, 0xFF}`
/// otherwise. A version byte other than `0x05` closes the connection with no
/// reply; the peer is not speaking SOCKS5.
pub async fn negotiate<S>(stream: &mut S, verifier: &dyn Verifier) -> Result<(), Socks5Error>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let version = codec::read_u8(stream).await?;
    if version != SOCKS5_VERSION {
        return Err(Socks5Error::UnsupportedVersion(version));
    }

    let nmethods = codec::read_u8(stream).await? as usize;
    let methods = codec::read_bytes(stream, nmethods).await?;

    if !methods.contains(&SOCKS5_AUTH_METHOD_PASSWORD) {
        codec::write_frame(
            stream,
            &[SOCKS5_VERSION, SOCKS5_AUTH_METHOD_NOT_ACCEPTABLE],
        )
        .await?;
        return Err(Socks5Error::NoAcceptableMethod);
    }

    codec::write_frame(stream, &[SOCKS5_VERSION, SOCKS5_AUTH_METHOD_PASSWORD]).await?;
    debug!("selected username/password method");

    authenticate(stream, verifier).await
}
