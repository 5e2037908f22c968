//! SOCKS5 request parsing and reply framing

mod parser;
mod reply;

pub use parser::parse_request;
pub use reply::{
    encode_reply, send_address_type_not_supported, send_command_not_supported, send_reply,
};
