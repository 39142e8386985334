//! SOCKS handshake type definitions
//!
//! Defines the values produced by the handshake parser.

use super::consts::*;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

/// Protocol dialect of a decoded request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolVersion {
    /// SOCKS4 with a literal IPv4 destination
    V4,
    /// SOCKS4a with a domain destination
    V4a,
    /// SOCKS5
    V5,
}

impl ProtocolVersion {
    /// Version byte as it appears on the wire
    pub fn to_byte(self) -> u8 {
        match self {
            ProtocolVersion::V4 | ProtocolVersion::V4a => SOCKS4_VERSION,
            ProtocolVersion::V5 => SOCKS5_VERSION,
        }
    }

    /// Whether this is one of the SOCKS4 dialects
    pub fn is_socks4(self) -> bool {
        matches!(self, ProtocolVersion::V4 | ProtocolVersion::V4a)
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolVersion::V4 => write!(f, "4"),
            ProtocolVersion::V4a => write!(f, "4a"),
            ProtocolVersion::V5 => write!(f, "5"),
        }
    }
}

/// Requested proxy operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// TCP CONNECT - establish a TCP connection to target
    Connect,
    /// TCP BIND - wait for incoming connection
    Bind,
    /// UDP ASSOCIATE - establish UDP relay (SOCKS5 only)
    UdpAssociate,
}

impl Command {
    /// Parse a command byte for the given version byte
    ///
    /// UDP ASSOCIATE is only recognised under SOCKS5.
    pub fn from_byte(byte: u8, version: u8) -> Option<Self> {
        match byte {
            SOCKS_CMD_TCP_CONNECT => Some(Command::Connect),
            SOCKS_CMD_TCP_BIND => Some(Command::Bind),
            SOCKS5_CMD_UDP_ASSOCIATE if version == SOCKS5_VERSION => Some(Command::UdpAssociate),
            _ => None,
        }
    }

    /// Convert Command to byte
    pub fn to_byte(self) -> u8 {
        match self {
            Command::Connect => SOCKS_CMD_TCP_CONNECT,
            Command::Bind => SOCKS_CMD_TCP_BIND,
            Command::UdpAssociate => SOCKS5_CMD_UDP_ASSOCIATE,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Connect => write!(f, "CONNECT"),
            Command::Bind => write!(f, "BIND"),
            Command::UdpAssociate => write!(f, "UDP ASSOCIATE"),
        }
    }
}

/// Destination address family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressType {
    /// 4-byte IPv4 address
    Ipv4,
    /// Domain name
    Domain,
    /// 16-byte IPv6 address
    Ipv6,
}

impl AddressType {
    /// Parse a SOCKS5 ATYP byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            SOCKS5_ADDR_TYPE_IPV4 => Some(AddressType::Ipv4),
            SOCKS5_ADDR_TYPE_DOMAIN => Some(AddressType::Domain),
            SOCKS5_ADDR_TYPE_IPV6 => Some(AddressType::Ipv6),
            _ => None,
        }
    }

    /// SOCKS5 ATYP byte
    pub fn to_byte(self) -> u8 {
        match self {
            AddressType::Ipv4 => SOCKS5_ADDR_TYPE_IPV4,
            AddressType::Domain => SOCKS5_ADDR_TYPE_DOMAIN,
            AddressType::Ipv6 => SOCKS5_ADDR_TYPE_IPV6,
        }
    }
}

/// A fully decoded SOCKS request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Protocol dialect
    pub version: ProtocolVersion,
    /// Requested command
    pub command: Command,
    /// Destination address family
    pub address_type: AddressType,
    /// Destination address in textual form
    pub dst_addr: String,
    /// Destination port
    pub dst_port: u16,
    /// SOCKS4 user id; `None` for SOCKS5
    pub username: Option<String>,
    /// Never populated during the handshake
    pub src_addr: Option<String>,
    /// Never populated during the handshake
    pub src_port: Option<u16>,
}

impl Request {
    /// Destination as a typed address
    ///
    /// Domains stay unresolved; IP literals become socket addresses.
    pub fn target(&self) -> TargetAddr {
        let ip = match self.address_type {
            AddressType::Ipv4 => self.dst_addr.parse::<Ipv4Addr>().ok().map(IpAddr::V4),
            AddressType::Ipv6 => self.dst_addr.parse::<Ipv6Addr>().ok().map(IpAddr::V6),
            AddressType::Domain => None,
        };

        match ip {
            Some(ip) => TargetAddr::Ip(SocketAddr::new(ip, self.dst_port)),
            None => TargetAddr::Domain(self.dst_addr.clone(), self.dst_port),
        }
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SOCKS{} {} {}", self.version, self.command, self.target())?;
        if let Some(username) = &self.username {
            write!(f, " (user {:?})", username)?;
        }
        Ok(())
    }
}

/// Terminal outcome of one handshake phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeEvent {
    /// SOCKS5 greeting: offered method identifiers in wire order
    Methods(Vec<u8>),
    /// Decoded request
    Request(Request),
}

/// Target address for SOCKS requests
///
/// Can be an IP address (v4 or v6) or a domain name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetAddr {
    /// IP address with port
    Ip(SocketAddr),
    /// Domain name with port
    Domain(String, u16),
}

impl TargetAddr {
    /// Get the port number
    pub fn port(&self) -> u16 {
        match self {
            TargetAddr::Ip(addr) => addr.port(),
            TargetAddr::Domain(_, port) => *port,
        }
    }

    /// Whether the destination still needs name resolution
    pub fn is_domain(&self) -> bool {
        matches!(self, TargetAddr::Domain(_, _))
    }
}

impl fmt::Display for TargetAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetAddr::Ip(addr) => write!(f, "{}", addr),
            TargetAddr::Domain(domain, port) => write!(f, "{}:{}", domain, port),
        }
    }
}

impl From<SocketAddr> for TargetAddr {
    fn from(addr: SocketAddr) -> Self {
        TargetAddr::Ip(addr)
    }
}
