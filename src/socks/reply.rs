//! Handshake reply builders
//!
//! Constructs the server side of the SOCKS4 and SOCKS5 handshakes.

use super::consts::*;
use anyhow::Result;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, SocketAddrV4};
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Pick the method to answer a SOCKS5 greeting with
///
/// Only NO AUTHENTICATION is supported; anything else is not acceptable.
pub fn select_method(methods: &[u8]) -> u8 {
    if methods.contains(&SOCKS5_AUTH_METHOD_NONE) {
        SOCKS5_AUTH_METHOD_NONE
    } else {
        SOCKS5_AUTH_METHOD_NOT_ACCEPTABLE
    }
}

/// SOCKS5 method selection message
///
/// ```text
/// +----+--------+
/// |VER | METHOD |
/// +----+--------+
/// | 1  |   1    |
/// +----+--------+
/// ```
pub fn method_selection_bytes(method: u8) -> [u8; 2] {
    [SOCKS5_VERSION, method]
}

/// SOCKS5 reply message
///
/// ```text
/// +----+-----+-------+------+----------+----------+
/// |VER | REP |  RSV  | ATYP | BND.ADDR | BND.PORT |
/// +----+-----+-------+------+----------+----------+
/// | 1  |  1  | X'00' |  1   | Variable |    2     |
/// +----+-----+-------+------+----------+----------+
/// ```
///
/// The bound address defaults to 0.0.0.0:0.
pub fn socks5_reply_bytes(reply_code: u8, bind_addr: Option<SocketAddr>) -> Vec<u8> {
    let bind_addr =
        bind_addr.unwrap_or_else(|| SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0));

    let mut reply = vec![SOCKS5_VERSION, reply_code, SOCKS5_RESERVED];

    match bind_addr {
        SocketAddr::V4(addr) => {
            reply.push(SOCKS5_ADDR_TYPE_IPV4);
            reply.extend_from_slice(&addr.ip().octets());
            reply.extend_from_slice(&addr.port().to_be_bytes());
        }
        SocketAddr::V6(addr) => {
            reply.push(SOCKS5_ADDR_TYPE_IPV6);
            reply.extend_from_slice(&addr.ip().octets());
            reply.extend_from_slice(&addr.port().to_be_bytes());
        }
    }

    reply
}

/// SOCKS4 reply message
///
/// ```text
/// +----+----+----+----+----+----+----+----+
/// | VN | CD | DSTPORT |      DSTIP        |
/// +----+----+----+----+----+----+----+----+
///   1    1      2              4
/// ```
pub fn socks4_reply_bytes(result_code: u8, bind_addr: Option<SocketAddrV4>) -> [u8; 8] {
    let bind_addr = bind_addr.unwrap_or_else(|| SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0));
    let port = bind_addr.port().to_be_bytes();
    let ip = bind_addr.ip().octets();

    [
        SOCKS4_REPLY_VERSION,
        result_code,
        port[0],
        port[1],
        ip[0],
        ip[1],
        ip[2],
        ip[3],
    ]
}

/// Send the SOCKS5 method selection
pub async fn send_method_selection<S>(stream: &mut S, method: u8) -> Result<()>
where
    S: AsyncWrite + Unpin,
{
    stream.write_all(&method_selection_bytes(method)).await?;
    stream.flush().await?;
    Ok(())
}

/// Send a SOCKS5 reply
pub async fn send_socks5_reply<S>(
    stream: &mut S,
    reply_code: u8,
    bind_addr: Option<SocketAddr>,
) -> Result<()>
where
    S: AsyncWrite + Unpin,
{
    stream
        .write_all(&socks5_reply_bytes(reply_code, bind_addr))
        .await?;
    stream.flush().await?;
    Ok(())
}

/// Send a SOCKS4 reply
pub async fn send_socks4_reply<S>(stream: &mut S, result_code: u8) -> Result<()>
where
    S: AsyncWrite + Unpin,
{
    stream.write_all(&socks4_reply_bytes(result_code, None)).await?;
    stream.flush().await?;
    Ok(())
}
