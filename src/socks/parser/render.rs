//! Textual rendering of destination addresses

use crate::socks::types::AddressType;

/// Dot-joined decimal octets in wire order
pub(crate) fn render_ipv4(octets: &[u8]) -> String {
    octets
        .iter()
        .map(|b| b.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

/// Eight colon-joined hextets, lowercase hex without leading zeros
pub(crate) fn render_ipv6(octets: &[u8]) -> String {
    octets
        .chunks(2)
        .map(|pair| match pair {
            [hi, lo] => format!("{:x}", u16::from_be_bytes([*hi, *lo])),
            [hi] => format!("{:x}", hi),
            _ => String::new(),
        })
        .collect::<Vec<_>>()
        .join(":")
}

/// Render raw address bytes according to their family
pub(crate) fn render_address(address_type: AddressType, raw: &[u8]) -> String {
    match address_type {
        AddressType::Ipv4 => render_ipv4(raw),
        AddressType::Ipv6 => render_ipv6(raw),
        AddressType::Domain => String::from_utf8_lossy(raw).into_owned(),
    }
}

/// SOCKS4a marks a domain destination with DSTIP 0.0.0.x, x != 0
pub(crate) fn is_socks4a_marker(octets: &[u8]) -> bool {
    matches!(octets, [0, 0, 0, last] if *last != 0)
}
