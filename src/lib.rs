//! # socksd - SOCKS5 proxy server
//!
//! socksd is a SOCKS version 5 proxy server (RFC 1928) with
//! username/password authentication (RFC 1929). A client connects over TCP,
//! negotiates the username/password method, authenticates, issues a CONNECT
//! request, and is bridged to the destination with transparent bidirectional
//! relaying until either side closes.
//!
//! ## Features
//!
//! - **Username/password only**: the server selects method `0x02` or refuses
//!   the connection; credentials are opaque octets checked by a pluggable
//!   [`Verifier`](socks::Verifier) predicate
//! - **Exact wire framing**: every protocol field is consumed by its declared
//!   length, and every reply is a complete frame written in one piece
//! - **Half-close aware relay**: each copy direction shuts down its
//!   destination's write side on EOF, so peers drain cleanly
//! - **One task per connection**: a stuck or failing connection never
//!   affects the others
//!
//! ## Usage
//!
//! ```rust,ignore
//! use socksd::{load_config, Server};
//! use tokio::sync::broadcast;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_config("socksd.toml")?;
//!     let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
//!
//!     Server::bind(config).await?.serve(shutdown_rx).await
//! }
//! ```
//!
//! ## Protocol flow
//!
//! ```text
//! Client -> socksd: greeting, sub-negotiation, CONNECT request
//! socksd -> Target: outbound dial
//! Client <-> Target: relayed bytes
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod server;
pub mod socks;

// Re-export commonly used items
pub use config::{load_config, parse_config, Config};
pub use error::{ReplyCode, Socks5Error};
pub use server::Server;
pub use socks::{StaticCredentials, Verifier};

/// Version of the socksd crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the application
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "socksd");
    }
}
