//! Per-connection protocol driver
//!
//! Runs the three negotiation phases in order on one accepted stream, then
//! dispatches the command. The connection is the failure domain: every error
//! path ends here with both streams dropped, and the client learns nothing
//! beyond the per-phase reply codes.

use crate::config::ServerConfig;
use crate::error::Socks5Error;
use crate::socks::auth::{negotiate, Verifier};
use crate::socks::command::{
    parse_request, send_address_type_not_supported, send_command_not_supported,
};
use crate::socks::tcp_relay::handle_connect;
use crate::socks::types::SocksCommand;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::info;

/// Drive one SOCKS5 connection from greeting to teardown.
///
/// Phase order as observed by the client: method reply, sub-negotiation
/// reply, request reply, then relay bytes. Exactly one reply is written per
/// phase; error paths that the RFC leaves undefined close without replying.
pub async fn handle_connection<S>(
    mut stream: S,
    verifier: &dyn Verifier,
    config: &ServerConfig,
) -> Result<(), Socks5Error>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    negotiate(&mut stream, verifier).await?;

    let (command, target) = match parse_request(&mut stream).await {
        Ok(parsed) => parsed,
        Err(Socks5Error::AddressTypeNotSupported(atyp)) => {
            send_address_type_not_supported(&mut stream).await?;
            return Err(Socks5Error::AddressTypeNotSupported(atyp));
        }
        Err(e) => return Err(e),
    };

    info!("{} request for {}", command, target);

    match command {
        SocksCommand::Connect => handle_connect(stream, target, config).await,
        unsupported => {
            // No dial is attempted for BIND / UDP ASSOCIATE.
            send_command_not_supported(&mut stream).await?;
            Err(Socks5Error::CommandNotSupported(unsupported))
        }
    }
}
