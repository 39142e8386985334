//! SOCKS protocol constants
//!
//! Defines the constants used by the SOCKS4, SOCKS4a and SOCKS5 handshakes.

/// SOCKS4 protocol version
pub const SOCKS4_VERSION: u8 = 0x04;
/// SOCKS5 protocol version
pub const SOCKS5_VERSION: u8 = 0x05;

// Authentication methods
/// No authentication required
pub const SOCKS5_AUTH_METHOD_NONE: u8 = 0x00;
/// GSSAPI authentication
pub const SOCKS5_AUTH_METHOD_GSSAPI: u8 = 0x01;
/// Username/password authentication
pub const SOCKS5_AUTH_METHOD_PASSWORD: u8 = 0x02;
/// No acceptable methods
pub const SOCKS5_AUTH_METHOD_NOT_ACCEPTABLE: u8 = 0xFF;

// Commands (shared by SOCKS4 and SOCKS5)
/// TCP CONNECT command
pub const SOCKS_CMD_TCP_CONNECT: u8 = 0x01;
/// TCP BIND command
pub const SOCKS_CMD_TCP_BIND: u8 = 0x02;
/// UDP ASSOCIATE command (SOCKS5 only)
pub const SOCKS5_CMD_UDP_ASSOCIATE: u8 = 0x03;

// Address types
/// IPv4 address
pub const SOCKS5_ADDR_TYPE_IPV4: u8 = 0x01;
/// Domain name
pub const SOCKS5_ADDR_TYPE_DOMAIN: u8 = 0x03;
/// IPv6 address
pub const SOCKS5_ADDR_TYPE_IPV6: u8 = 0x04;

// SOCKS5 reply codes
/// Succeeded
pub const SOCKS5_REPLY_SUCCEEDED: u8 = 0x00;
/// General SOCKS server failure
pub const SOCKS5_REPLY_GENERAL_FAILURE: u8 = 0x01;
/// Connection not allowed by ruleset
pub const SOCKS5_REPLY_CONNECTION_NOT_ALLOWED: u8 = 0x02;
/// Command not supported
pub const SOCKS5_REPLY_COMMAND_NOT_SUPPORTED: u8 = 0x07;
/// Address type not supported
pub const SOCKS5_REPLY_ADDRESS_TYPE_NOT_SUPPORTED: u8 = 0x08;

// SOCKS4 reply codes
/// SOCKS4 reply version byte
pub const SOCKS4_REPLY_VERSION: u8 = 0x00;
/// Request granted
pub const SOCKS4_REPLY_GRANTED: u8 = 0x5A;
/// Request rejected or failed
pub const SOCKS4_REPLY_REJECTED: u8 = 0x5B;
/// Rejected, identd unreachable
pub const SOCKS4_REPLY_NO_IDENTD: u8 = 0x5C;
/// Rejected, identd reported a different user id
pub const SOCKS4_REPLY_IDENTD_MISMATCH: u8 = 0x5D;

// Reserved byte
/// Reserved byte value (always 0x00)
pub const SOCKS5_RESERVED: u8 = 0x00;

// Field sizes
/// IPv4 address length
pub const IPV4_ADDR_LEN: usize = 4;
/// IPv6 address length
pub const IPV6_ADDR_LEN: usize = 16;
/// Port length
pub const PORT_LEN: usize = 2;
/// Default limit for NUL-terminated fields (SOCKS4 user id, SOCKS4a domain)
pub const MAX_FIELD_LEN: usize = 255;
/// Read chunk size used when driving a parser over a stream
pub const DEFAULT_BUFFER_SIZE: usize = 512;
