//! Test utilities for Sockshake
//!
//! This module provides common test utilities used across integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use tokio::io::{duplex, DuplexStream};
use tokio::net::TcpListener;

/// Create a pair of connected duplex streams for testing
pub fn create_mock_stream_pair() -> (DuplexStream, DuplexStream) {
    duplex(8192)
}

/// Create a test TCP listener on an available port
pub async fn create_test_listener() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, addr)
}

/// Test configuration builder
pub struct TestConfigBuilder {
    listen_addr: String,
    handshake_timeout: u64,
    max_field_len: usize,
    allow_socks4: bool,
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        TestConfigBuilder {
            listen_addr: "127.0.0.1:0".to_string(),
            handshake_timeout: 5,
            max_field_len: sockshake::socks::MAX_FIELD_LEN,
            allow_socks4: true,
        }
    }
}

impl TestConfigBuilder {
    /// Create a new test config builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set handshake timeout in seconds
    pub fn handshake_timeout(mut self, secs: u64) -> Self {
        self.handshake_timeout = secs;
        self
    }

    /// Set the NUL-terminated field limit
    pub fn max_field_len(mut self, len: usize) -> Self {
        self.max_field_len = len;
        self
    }

    /// Accept SOCKS4 clients
    pub fn allow_socks4(mut self, allow: bool) -> Self {
        self.allow_socks4 = allow;
        self
    }

    /// Build the configuration
    pub fn build(self) -> sockshake::config::Config {
        sockshake::config::Config {
            server: sockshake::config::ServerConfig {
                listen_addr: self.listen_addr,
                handshake_timeout: self.handshake_timeout,
            },
            handshake: sockshake::config::HandshakeConfig {
                max_field_len: self.max_field_len,
                allow_socks4: self.allow_socks4,
            },
        }
    }
}

/// Client handshake bytes
pub mod socks_mock {
    use sockshake::socks::*;

    /// Greeting offering the given methods
    pub fn greeting(methods: &[u8]) -> Vec<u8> {
        let mut data = vec![SOCKS5_VERSION, methods.len() as u8];
        data.extend_from_slice(methods);
        data
    }

    /// SOCKS5 connect to an IPv4 address
    pub fn connect_ipv4(ip: [u8; 4], port: u16) -> Vec<u8> {
        let mut cmd = vec![
            SOCKS5_VERSION,
            SOCKS_CMD_TCP_CONNECT,
            SOCKS5_RESERVED,
            SOCKS5_ADDR_TYPE_IPV4,
        ];
        cmd.extend_from_slice(&ip);
        cmd.extend_from_slice(&port.to_be_bytes());
        cmd
    }

    /// SOCKS5 connect to a domain
    pub fn connect_domain(domain: &str, port: u16) -> Vec<u8> {
        let mut cmd = vec![
            SOCKS5_VERSION,
            SOCKS_CMD_TCP_CONNECT,
            SOCKS5_RESERVED,
            SOCKS5_ADDR_TYPE_DOMAIN,
            domain.len() as u8,
        ];
        cmd.extend_from_slice(domain.as_bytes());
        cmd.extend_from_slice(&port.to_be_bytes());
        cmd
    }

    /// SOCKS4 request, or SOCKS4a when `domain` is given
    pub fn socks4(command: u8, ip: [u8; 4], port: u16, user: &str, domain: Option<&str>) -> Vec<u8> {
        let mut cmd = vec![SOCKS4_VERSION, command];
        cmd.extend_from_slice(&port.to_be_bytes());
        match domain {
            Some(_) => cmd.extend_from_slice(&[0, 0, 0, 1]),
            None => cmd.extend_from_slice(&ip),
        }
        cmd.extend_from_slice(user.as_bytes());
        cmd.push(0);
        if let Some(domain) = domain {
            cmd.extend_from_slice(domain.as_bytes());
            cmd.push(0);
        }
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_mock_stream_pair() {
        let (mut a, mut b) = create_mock_stream_pair();

        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        a.write_all(b"hello").await.unwrap();
        let mut buf = [0u8; 5];
        b.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"hello");
    }

    #[test]
    fn test_config_builder() {
        let config = TestConfigBuilder::new()
            .handshake_timeout(2)
            .max_field_len(16)
            .allow_socks4(false)
            .build();

        assert_eq!(config.server.handshake_timeout, 2);
        assert_eq!(config.handshake.max_field_len, 16);
        assert!(!config.handshake.allow_socks4);
    }

    #[test]
    fn test_socks4a_marker() {
        let bytes = socks_mock::socks4(1, [9, 9, 9, 9], 80, "", Some("x"));
        assert_eq!(&bytes[4..8], &[0, 0, 0, 1]);
        assert_eq!(&bytes[8..], b"\0x\0");
    }
}
