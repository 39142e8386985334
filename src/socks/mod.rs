//! SOCKS handshake module for Sockshake
//!
//! This module decodes the client side of the SOCKS4, SOCKS4a and SOCKS5
//! handshakes incrementally, and builds the server replies.

mod codec;
mod consts;
mod parser;
mod reply;
mod session;
mod stream;
mod types;

pub use consts::*;
pub use parser::HandshakeParser;
pub use reply::{
    method_selection_bytes, select_method, send_method_selection, send_socks4_reply,
    send_socks5_reply, socks4_reply_bytes, socks5_reply_bytes,
};
pub use session::Session;
pub use stream::PushbackStream;
pub use types::{AddressType, Command, HandshakeEvent, ProtocolVersion, Request, TargetAddr};
