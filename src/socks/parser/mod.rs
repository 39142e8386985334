//! Incremental SOCKS handshake parser
//!
//! Decodes the SOCKS4, SOCKS4a and SOCKS5 handshakes from a byte stream that
//! may be fragmented at any offset. The parser consumes whatever is delivered,
//! keeps partial fields between calls, and stops at the end of each logical
//! unit so that bytes belonging to the next phase are left untouched.
//!
//! # Wire formats
//!
//! ```text
//! SOCKS5 greeting:
//! +----+----------+----------+
//! |VER | NMETHODS | METHODS  |
//! +----+----------+----------+
//! | 1  |    1     | 1 to 255 |
//! +----+----------+----------+
//!
//! SOCKS5 request:
//! +----+-----+-------+------+----------+----------+
//! |VER | CMD |  RSV  | ATYP | DST.ADDR | DST.PORT |
//! +----+-----+-------+------+----------+----------+
//! | 1  |  1  | X'00' |  1   | Variable |    2     |
//! +----+-----+-------+------+----------+----------+
//!
//! SOCKS4 request (SOCKS4a appends DOMAIN+NULL when DSTIP is 0.0.0.x):
//! +----+----+----+----+----+----+----+----+----+----+....+----+
//! | VN | CD | DSTPORT |      DSTIP        | USERID       |NULL|
//! +----+----+----+----+----+----+----+----+----+----+....+----+
//!   1    1      2              4           variable       1
//! ```
//!
//! # Lifecycle
//!
//! A parser starts attached. After a terminal event it detaches itself; call
//! [`HandshakeParser::attach`] (usually after [`HandshakeParser::set_authed`])
//! to decode the next phase. After an error it stays failed for good.

mod field;
mod render;

use self::field::{FixedField, NulTerminated};
use self::render::{is_socks4a_marker, render_address, render_ipv4};
use super::consts::*;
use super::types::{AddressType, Command, HandshakeEvent, ProtocolVersion, Request};
use crate::config::HandshakeConfig;
use crate::error::{Field, HandshakeError, ParseError};
use bytes::{Buf, BytesMut};
use std::mem;
use tracing::{debug, trace};

#[derive(Debug)]
enum State {
    Version,
    MethodCount,
    Methods(FixedField),
    Command,
    Reserved,
    AddressType,
    AddressLength,
    Address(FixedField),
    Port(FixedField),
    V4Port(FixedField),
    V4Ip(FixedField),
    V4UserId(NulTerminated),
    V4aDomain(NulTerminated),
}

impl State {
    fn field(&self) -> Field {
        match self {
            State::Version => Field::Version,
            State::MethodCount => Field::MethodCount,
            State::Methods(_) => Field::Methods,
            State::Command => Field::Command,
            State::Reserved => Field::Reserved,
            State::AddressType => Field::AddressType,
            State::AddressLength => Field::AddressLength,
            State::Address(_) | State::V4Ip(_) => Field::Address,
            State::Port(_) | State::V4Port(_) => Field::Port,
            State::V4UserId(f) | State::V4aDomain(f) => f.field(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Attached,
    Detached,
    Failed,
}

/// Incremental decoder for one connection's SOCKS handshake
#[derive(Debug)]
pub struct HandshakeParser {
    state: State,
    status: Status,
    authed: bool,
    started: bool,
    version: u8,
    command: Command,
    address_type: AddressType,
    address: Vec<u8>,
    dst_addr: String,
    dst_port: u16,
    username: Option<String>,
    max_field_len: usize,
    allow_socks4: bool,
}

impl Default for HandshakeParser {
    fn default() -> Self {
        Self::new()
    }
}

impl HandshakeParser {
    /// Create an attached parser with default limits
    pub fn new() -> Self {
        Self::with_config(&HandshakeConfig::default())
    }

    /// Create an attached parser with the given limits
    pub fn with_config(config: &HandshakeConfig) -> Self {
        HandshakeParser {
            state: State::Version,
            status: Status::Attached,
            authed: false,
            started: false,
            version: 0,
            command: Command::Connect,
            address_type: AddressType::Ipv4,
            address: Vec::new(),
            dst_addr: String::new(),
            dst_port: 0,
            username: None,
            max_field_len: config.max_field_len,
            allow_socks4: config.allow_socks4,
        }
    }

    /// Whether the SOCKS5 method negotiation has been completed by the consumer
    pub fn is_authed(&self) -> bool {
        self.authed
    }

    /// Mark the method/auth negotiation as done, so the next SOCKS5 unit is a request
    pub fn set_authed(&mut self, authed: bool) {
        self.authed = authed;
    }

    /// Whether the parser is currently consuming bytes
    pub fn is_attached(&self) -> bool {
        self.status == Status::Attached
    }

    /// Whether the parser has reported an error
    pub fn is_failed(&self) -> bool {
        self.status == Status::Failed
    }

    /// Reactivate the parser for the next phase
    ///
    /// Every accumulator is reset; the `authed` flag is kept.
    pub fn attach(&mut self) -> Result<(), HandshakeError> {
        if self.is_failed() {
            return Err(HandshakeError::Failed);
        }
        self.reset();
        self.status = Status::Attached;
        Ok(())
    }

    /// Stop consuming bytes and drop any partial progress
    pub fn detach(&mut self) {
        if !self.is_failed() {
            self.status = Status::Detached;
        }
        self.reset();
    }

    /// Consume bytes from `src` until one unit is complete or `src` is exhausted
    ///
    /// Returns `Ok(None)` when more bytes are needed or the parser is not
    /// attached. Only bytes belonging to the current unit are removed from
    /// `src`; any surplus after a terminal event stays in place.
    pub fn decode(&mut self, src: &mut BytesMut) -> Result<Option<HandshakeEvent>, ParseError> {
        if !self.is_attached() {
            return Ok(None);
        }

        match self.advance(src) {
            Ok(Some(event)) => {
                debug!("Decoded handshake event: {:?}", event);
                self.reset();
                self.status = Status::Detached;
                Ok(Some(event))
            }
            Ok(None) => Ok(None),
            Err(e) => {
                debug!("Handshake parse error: {}", e);
                self.fail();
                Err(e)
            }
        }
    }

    /// Like [`decode`](Self::decode), for the final bytes of a closed stream
    ///
    /// A stream that closes before the current unit started yields `Ok(None)`.
    /// One that closes mid-unit is an error.
    pub fn decode_eof(
        &mut self,
        src: &mut BytesMut,
    ) -> Result<Option<HandshakeEvent>, ParseError> {
        if let Some(event) = self.decode(src)? {
            return Ok(Some(event));
        }
        if !self.is_attached() || !self.started {
            return Ok(None);
        }

        let err = match &self.state {
            State::V4UserId(f) | State::V4aDomain(f) => ParseError::UnterminatedField(f.field()),
            state => ParseError::Truncated(state.field()),
        };
        debug!("Handshake stream closed early: {}", err);
        self.fail();
        Err(err)
    }

    fn fail(&mut self) {
        self.status = Status::Failed;
        self.reset();
    }

    fn reset(&mut self) {
        self.state = State::Version;
        self.started = false;
        self.version = 0;
        self.command = Command::Connect;
        self.address_type = AddressType::Ipv4;
        self.address = Vec::new();
        self.dst_addr = String::new();
        self.dst_port = 0;
        self.username = None;
    }

    fn advance(&mut self, src: &mut BytesMut) -> Result<Option<HandshakeEvent>, ParseError> {
        while !src.is_empty() {
            self.started = true;

            let next = match mem::replace(&mut self.state, State::Version) {
                State::Version => {
                    let version = src.get_u8();
                    match version {
                        SOCKS5_VERSION => {}
                        SOCKS4_VERSION if self.allow_socks4 => {}
                        other => return Err(ParseError::UnsupportedVersion(other)),
                    }
                    trace!("SOCKS version {}", version);
                    self.version = version;
                    if version == SOCKS5_VERSION && !self.authed {
                        State::MethodCount
                    } else {
                        State::Command
                    }
                }

                State::MethodCount => {
                    let count = src.get_u8();
                    if count == 0 {
                        return Err(ParseError::EmptyMethodList);
                    }
                    State::Methods(FixedField::new(count as usize))
                }

                State::Methods(mut methods) => {
                    if methods.fill(src) {
                        return Ok(Some(HandshakeEvent::Methods(methods.into_bytes())));
                    }
                    State::Methods(methods)
                }

                State::Command => {
                    let code = src.get_u8();
                    self.command = Command::from_byte(code, self.version).ok_or(
                        ParseError::InvalidCommand {
                            version: self.version,
                            code,
                        },
                    )?;
                    trace!("Request command {}", self.command);
                    if self.version == SOCKS5_VERSION {
                        State::Reserved
                    } else {
                        State::V4Port(FixedField::new(PORT_LEN))
                    }
                }

                State::Reserved => {
                    src.advance(1);
                    State::AddressType
                }

                State::AddressType => {
                    let byte = src.get_u8();
                    self.address_type =
                        AddressType::from_byte(byte).ok_or(ParseError::InvalidAddressType(byte))?;
                    match self.address_type {
                        AddressType::Ipv4 => State::Address(FixedField::new(IPV4_ADDR_LEN)),
                        AddressType::Ipv6 => State::Address(FixedField::new(IPV6_ADDR_LEN)),
                        AddressType::Domain => State::AddressLength,
                    }
                }

                State::AddressLength => match src.get_u8() {
                    0 => State::Port(FixedField::new(PORT_LEN)),
                    len => State::Address(FixedField::new(len as usize)),
                },

                State::Address(mut address) => {
                    if address.fill(src) {
                        self.address = address.into_bytes();
                        State::Port(FixedField::new(PORT_LEN))
                    } else {
                        State::Address(address)
                    }
                }

                State::Port(mut port) => {
                    if port.fill(src) {
                        self.dst_port = port.to_port();
                        self.dst_addr = render_address(self.address_type, &self.address);
                        return Ok(Some(self.request(ProtocolVersion::V5)));
                    }
                    State::Port(port)
                }

                State::V4Port(mut port) => {
                    if port.fill(src) {
                        self.dst_port = port.to_port();
                        State::V4Ip(FixedField::new(IPV4_ADDR_LEN))
                    } else {
                        State::V4Port(port)
                    }
                }

                State::V4Ip(mut ip) => {
                    if ip.fill(src) {
                        let octets = ip.into_bytes();
                        if is_socks4a_marker(&octets) {
                            self.address_type = AddressType::Domain;
                        } else {
                            self.address_type = AddressType::Ipv4;
                            self.dst_addr = render_ipv4(&octets);
                        }
                        State::V4UserId(NulTerminated::new(Field::Username, self.max_field_len))
                    } else {
                        State::V4Ip(ip)
                    }
                }

                State::V4UserId(mut user) => {
                    if user.scan(src)? {
                        self.username = Some(user.into_string());
                        if self.address_type != AddressType::Domain {
                            return Ok(Some(self.request(ProtocolVersion::V4)));
                        }
                        State::V4aDomain(NulTerminated::new(Field::Domain, self.max_field_len))
                    } else {
                        State::V4UserId(user)
                    }
                }

                State::V4aDomain(mut domain) => {
                    if domain.scan(src)? {
                        self.dst_addr = domain.into_string();
                        return Ok(Some(self.request(ProtocolVersion::V4a)));
                    }
                    State::V4aDomain(domain)
                }
            };

            self.state = next;
        }

        Ok(None)
    }

    fn request(&mut self, version: ProtocolVersion) -> HandshakeEvent {
        HandshakeEvent::Request(Request {
            version,
            command: self.command,
            address_type: self.address_type,
            dst_addr: mem::take(&mut self.dst_addr),
            dst_port: self.dst_port,
            username: self.username.take(),
            src_addr: None,
            src_port: None,
        })
    }
}
