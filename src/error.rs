//! Error types for Sockshake
//!
//! This module defines the decode errors reported by the handshake parser and
//! the wider errors produced while driving it over an I/O stream.

use std::fmt;
use std::io;
use thiserror::Error;

/// Wire field being decoded when a stream ended or a limit was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Protocol version byte
    Version,
    /// SOCKS5 NMETHODS byte
    MethodCount,
    /// SOCKS5 METHODS list
    Methods,
    /// CMD / CD byte
    Command,
    /// SOCKS5 RSV byte
    Reserved,
    /// SOCKS5 ATYP byte
    AddressType,
    /// SOCKS5 domain length byte
    AddressLength,
    /// Destination address bytes
    Address,
    /// Destination port
    Port,
    /// SOCKS4 USERID
    Username,
    /// SOCKS4a trailing domain name
    Domain,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Version => "version",
            Field::MethodCount => "method count",
            Field::Methods => "methods",
            Field::Command => "command",
            Field::Reserved => "reserved",
            Field::AddressType => "address type",
            Field::AddressLength => "address length",
            Field::Address => "destination address",
            Field::Port => "destination port",
            Field::Username => "user id",
            Field::Domain => "domain",
        };
        f.write_str(name)
    }
}

/// Classification of a [`ParseError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// First byte was neither 0x04 nor 0x05
    UnsupportedVersion,
    /// NMETHODS was zero
    EmptyMethodList,
    /// Unknown command, or UDP ASSOCIATE under SOCKS4
    InvalidCommand,
    /// Unknown SOCKS5 address type
    InvalidAddressType,
    /// Stream closed inside a NUL-terminated field
    UnterminatedField,
    /// Stream closed inside a fixed-length field
    Truncated,
    /// NUL-terminated field exceeded the configured limit
    FieldTooLong,
}

/// Malformed handshake input
///
/// Every variant is terminal: once returned, the parser that produced it is
/// detached and will not consume further bytes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Unsupported SOCKS version
    #[error("Unsupported SOCKS version: {0}")]
    UnsupportedVersion(u8),

    /// SOCKS5 greeting offered no methods
    #[error("Unexpected empty methods list")]
    EmptyMethodList,

    /// Request command is unknown or illegal for the protocol version
    #[error("Invalid request command {code} for SOCKS version {version}")]
    InvalidCommand {
        /// Protocol version byte of the request
        version: u8,
        /// Offending command byte
        code: u8,
    },

    /// Request address type is unknown
    #[error("Invalid request address type: {0}")]
    InvalidAddressType(u8),

    /// Stream ended before the field's NUL terminator
    #[error("Stream ended inside unterminated {0} field")]
    UnterminatedField(Field),

    /// Stream ended before a fixed-length field was complete
    #[error("Stream ended inside {0} field")]
    Truncated(Field),

    /// NUL-terminated field is longer than allowed
    #[error("The {field} field exceeds {limit} bytes")]
    FieldTooLong {
        /// Field being scanned
        field: Field,
        /// Configured limit in bytes
        limit: usize,
    },
}

impl ParseError {
    /// Classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::UnsupportedVersion(_) => ErrorKind::UnsupportedVersion,
            ParseError::EmptyMethodList => ErrorKind::EmptyMethodList,
            ParseError::InvalidCommand { .. } => ErrorKind::InvalidCommand,
            ParseError::InvalidAddressType(_) => ErrorKind::InvalidAddressType,
            ParseError::UnterminatedField(_) => ErrorKind::UnterminatedField,
            ParseError::Truncated(_) => ErrorKind::Truncated,
            ParseError::FieldTooLong { .. } => ErrorKind::FieldTooLong,
        }
    }
}

/// Errors raised while driving a handshake over a stream
#[derive(Error, Debug)]
pub enum HandshakeError {
    /// Malformed handshake bytes
    #[error("Handshake parse error: {0}")]
    Parse(#[from] ParseError),

    /// IO error from the underlying stream
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// An event was requested while the parser is detached
    #[error("Parser is detached")]
    Detached,

    /// The parser already failed and cannot be reattached
    #[error("Parser has failed and must be discarded")]
    Failed,

    /// The handshake did not complete in time
    #[error("Handshake timed out")]
    Timeout,
}

impl HandshakeError {
    /// The decode error, if this is one
    pub fn as_parse(&self) -> Option<&ParseError> {
        match self {
            HandshakeError::Parse(e) => Some(e),
            _ => None,
        }
    }
}
