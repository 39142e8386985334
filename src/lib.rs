//! # Sockshake - Incremental SOCKS Handshake Decoder
//!
//! Sockshake decodes the client side of the SOCKS4, SOCKS4a and SOCKS5
//! handshakes from a byte stream that may arrive in arbitrary fragments.
//! The decoder never reads past the end of the current unit, so bytes that
//! follow a handshake stay available to whatever runs next.
//!
//! ## Features
//!
//! - **Fragmentation Independent**: One byte at a time or everything at once gives the same result
//! - **Two Phases**: SOCKS5 method negotiation, then the connection request
//! - **SOCKS4a Domains**: Detected from the `0.0.0.x` marker address
//! - **No Over-Read**: Surplus bytes are pushed back to the source
//! - **tokio-util Codec**: Works with `FramedRead`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sockshake::socks::{HandshakeEvent, HandshakeParser};
//! use bytes::BytesMut;
//!
//! let mut parser = HandshakeParser::new();
//! let mut buf = BytesMut::from(&[0x05, 0x01, 0x00][..]);
//!
//! assert_eq!(
//!     parser.decode(&mut buf)?,
//!     Some(HandshakeEvent::Methods(vec![0x00]))
//! );
//! ```
//!
//! The binary runs an inspection server that logs every request it decodes
//! and then refuses it:
//!
//! ```text
//! SOCKS Client -> Sockshake (log, refuse)
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod server;
pub mod socks;

// Re-export commonly used items
pub use config::{load_config, Config};
pub use error::{HandshakeError, ParseError};
pub use server::run_server;
pub use socks::{HandshakeEvent, HandshakeParser, Request, Session};

/// Version of the Sockshake library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the application
pub const NAME: &str = env!("CARGO_PKG_NAME");
