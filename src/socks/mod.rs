//! SOCKS5 protocol implementation
//!
//! The per-connection state machine (RFC 1928 with RFC 1929
//! username/password sub-negotiation), split the way the wire protocol
//! splits: codec primitives, request types, the two negotiation phases, the
//! request/reply phase, and the CONNECT relay.

pub mod codec;
mod consts;
mod handler;
mod tcp_relay;
mod types;

pub mod auth;
pub mod command;

pub use auth::{negotiate, StaticCredentials, Verifier};
pub use command::{encode_reply, parse_request};
pub use consts::*;
pub use handler::handle_connection;
pub use tcp_relay::relay;
pub use types::{SocksCommand, TargetAddr};
