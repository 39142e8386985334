//! Server and handshake configuration types
//!
//! Defines the configuration structures for the inspection server and the
//! handshake parser limits.

use crate::socks::MAX_FIELD_LEN;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Default handshake timeout in seconds
fn default_handshake_timeout() -> u64 {
    10
}

/// Default limit for NUL-terminated fields
fn default_max_field_len() -> usize {
    MAX_FIELD_LEN
}

fn default_allow_socks4() -> bool {
    true
}

/// Root configuration structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Handshake parser configuration
    #[serde(default)]
    pub handshake: HandshakeConfig,
}

impl Config {
    /// Validate every section
    pub fn validate(&self) -> Result<(), String> {
        self.server.validate()?;
        self.handshake.validate()
    }
}

/// Inspection server configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "127.0.0.1:1080")
    pub listen_addr: String,

    /// Seconds a client may take to complete each handshake phase
    #[serde(default = "default_handshake_timeout")]
    pub handshake_timeout: u64,
}

impl ServerConfig {
    /// Parse the listen address
    pub fn listen_socket_addr(&self) -> Result<SocketAddr, String> {
        self.listen_addr
            .parse()
            .map_err(|e| format!("Invalid listen address {:?}: {}", self.listen_addr, e))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        self.listen_socket_addr()?;
        if self.handshake_timeout == 0 {
            return Err("handshake_timeout must be greater than zero".to_string());
        }
        Ok(())
    }
}

/// Handshake parser configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct HandshakeConfig {
    /// Longest accepted SOCKS4 user id or SOCKS4a domain, in bytes
    #[serde(default = "default_max_field_len")]
    pub max_field_len: usize,

    /// Accept SOCKS4 and SOCKS4a clients
    #[serde(default = "default_allow_socks4")]
    pub allow_socks4: bool,
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            max_field_len: default_max_field_len(),
            allow_socks4: default_allow_socks4(),
        }
    }
}

impl HandshakeConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_field_len == 0 {
            return Err("max_field_len must be greater than zero".to_string());
        }
        Ok(())
    }
}
