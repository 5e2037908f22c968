//! Username/password sub-negotiation (RFC 1929)
//!
//! The credential check itself is behind the [`Verifier`] trait so that the
//! server does not prescribe any credential store.

use crate::error::Socks5Error;
use crate::socks::codec;
use crate::socks::consts::{SOCKS5_AUTH_FAILURE, SOCKS5_AUTH_SUCCESS, SOCKS5_AUTH_VERSION};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

/// Credential predicate for the username/password method.
///
/// Both fields are the exact octets from the wire; no character encoding is
/// assumed. The check is expected to be synchronous and non-blocking.
pub trait Verifier: Send + Sync {
    /// Return `true` if the credential pair is accepted.
    fn verify(&self, username: &[u8], password: &[u8]) -> bool;
}

impl<F> Verifier for F
where
    F: Fn(&[u8], &[u8]) -> bool + Send + Sync,
{
    fn verify(&self, username: &[u8], password: &[u8]) -> bool {
        self(username, password)
    }
}

/// A single configured username/password pair.
///
/// The default [`Verifier`] used by the server, built from its configuration.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    username: Vec<u8>,
    password: Vec<u8>,
}

impl StaticCredentials {
    /// Build from a credential pair; each side is kept as opaque octets.
    pub fn new(username: impl Into<Vec<u8>>, password: impl Into<Vec<u8>>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Verifier for StaticCredentials {
    fn verify(&self, username: &[u8], password: &[u8]) -> bool {
        username == self.username.as_slice() && password == self.password.as_slice()
    }
}

/// Run the sub-negotiation phase.
///
/// Client sends:
/// ```text
/// +----+------+----------+------+----------+
/// |VER | ULEN |  UNAME   | PLEN |  PASSWD  |
/// +----+------+----------+------+----------+
/// | 1  |  1   | 1 to 255 |  1   | 1 to 255 |
/// +----+------+----------+------+----------+
/// ```
///
/// Server responds `{0x01, STATUS}` where STATUS is `0x00` on success and
/// `0x01` on failure. A version byte other than `0x01` closes the connection
/// with no reply; RFC 1929 leaves that exchange undefined.
pub async fn authenticate<S>(stream: &mut S, verifier: &dyn Verifier) -> Result<(), Socks5Error>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let sub_version = codec::read_u8(stream).await?;
    if sub_version != SOCKS5_AUTH_VERSION {
        return Err(Socks5Error::UnsupportedSubVersion(sub_version));
    }

    let username = codec::read_length_prefixed(stream).await?;
    let password = codec::read_length_prefixed(stream).await?;

    if verifier.verify(&username, &password) {
        codec::write_frame(stream, &[SOCKS5_AUTH_VERSION, SOCKS5_AUTH_SUCCESS]).await?;
        debug!("authentication succeeded");
        Ok(())
    } else {
        codec::write_frame(stream, &[SOCKS5_AUTH_VERSION, SOCKS5_AUTH_FAILURE]).await?;
        Err(Socks5Error::AuthFailed)
    }
}
