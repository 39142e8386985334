//! Handshake decoding through the public API

mod common;

use bytes::BytesMut;
use common::socks_mock;
use futures::StreamExt;
use sockshake::error::{ErrorKind, Field, ParseError};
use sockshake::socks::{
    AddressType, Command, HandshakeEvent, HandshakeParser, ProtocolVersion, Request, Session,
    TargetAddr,
};
use sockshake::HandshakeError;
use tokio::io::AsyncReadExt;
use tokio_util::codec::FramedRead;

fn decode_in_chunks(
    parser: &mut HandshakeParser,
    bytes: &[u8],
    chunk: usize,
) -> (Option<HandshakeEvent>, BytesMut) {
    let mut buf = BytesMut::new();
    let mut offset = 0;
    while offset < bytes.len() {
        let end = (offset + chunk).min(bytes.len());
        buf.extend_from_slice(&bytes[offset..end]);
        offset = end;
        if let Some(event) = parser.decode(&mut buf).unwrap() {
            // bytes not yet delivered are surplus too
            buf.extend_from_slice(&bytes[offset..]);
            return (Some(event), buf);
        }
    }
    (None, buf)
}

fn request(event: Option<HandshakeEvent>) -> Request {
    match event {
        Some(HandshakeEvent::Request(req)) => req,
        other => panic!("Expected request, got {:?}", other),
    }
}

#[test]
fn test_full_socks5_exchange_every_chunk_size() {
    let mut bytes = socks_mock::greeting(&[0x00, 0x02]);
    let greeting_len = bytes.len();
    bytes.extend_from_slice(&socks_mock::connect_domain("example.com", 443));

    for chunk in 1..=bytes.len() {
        let mut parser = HandshakeParser::new();
        let (event, surplus) = decode_in_chunks(&mut parser, &bytes, chunk);
        assert_eq!(event, Some(HandshakeEvent::Methods(vec![0x00, 0x02])));
        assert_eq!(&surplus[..], &bytes[greeting_len..]);

        parser.set_authed(true);
        parser.attach().unwrap();
        let (event, surplus) = decode_in_chunks(&mut parser, &surplus, chunk);
        let req = request(event);
        assert_eq!(req.version, ProtocolVersion::V5);
        assert_eq!(req.command, Command::Connect);
        assert_eq!(req.address_type, AddressType::Domain);
        assert_eq!(req.target(), TargetAddr::Domain("example.com".to_string(), 443));
        assert!(surplus.is_empty());
    }
}

#[test]
fn test_socks4_and_socks4a() {
    let mut parser = HandshakeParser::new();
    let mut buf = BytesMut::from(&socks_mock::socks4(0x01, [10, 0, 0, 1], 8080, "bob", None)[..]);
    let req = request(parser.decode(&mut buf).unwrap());
    assert_eq!(req.version, ProtocolVersion::V4);
    assert_eq!(req.dst_addr, "10.0.0.1");
    assert_eq!(req.dst_port, 8080);
    assert_eq!(req.username.as_deref(), Some("bob"));
    assert_eq!(req.address_type, AddressType::Ipv4);

    let mut parser = HandshakeParser::new();
    let mut buf = BytesMut::from(
        &socks_mock::socks4(0x02, [0, 0, 0, 0], 21, "", Some("ftp.example.org"))[..],
    );
    let req = request(parser.decode(&mut buf).unwrap());
    assert_eq!(req.version, ProtocolVersion::V4a);
    assert_eq!(req.command, Command::Bind);
    assert_eq!(req.address_type, AddressType::Domain);
    assert_eq!(req.dst_addr, "ftp.example.org");
    assert_eq!(req.username.as_deref(), Some(""));
}

#[test]
fn test_error_makes_parser_inert() {
    let mut parser = HandshakeParser::new();
    let mut buf = BytesMut::from(&[0x05, 0x00, 0x05, 0x01, 0x00][..]);

    let err = parser.decode(&mut buf).unwrap_err();
    assert_eq!(err, ParseError::EmptyMethodList);
    assert_eq!(err.kind(), ErrorKind::EmptyMethodList);
    assert!(parser.is_failed());
    assert!(matches!(parser.attach(), Err(HandshakeError::Failed)));
}

#[test]
fn test_field_limit_from_config() {
    let config = common::TestConfigBuilder::new().max_field_len(4).build();
    let mut parser = HandshakeParser::with_config(&config.handshake);
    let mut buf = BytesMut::from(&socks_mock::socks4(0x01, [1, 2, 3, 4], 80, "mallory", None)[..]);

    assert_eq!(
        parser.decode(&mut buf).unwrap_err(),
        ParseError::FieldTooLong {
            field: Field::Username,
            limit: 4
        }
    );
}

#[tokio::test]
async fn test_framed_read_then_resume_on_stream() {
    let mut bytes = socks_mock::greeting(&[0x00]);
    bytes.extend_from_slice(&socks_mock::connect_ipv4([192, 168, 0, 1], 22));
    let stream = tokio_test::io::Builder::new().read(&bytes).build();

    let mut framed = FramedRead::new(stream, HandshakeParser::new());
    let event = framed.next().await.unwrap().unwrap();
    assert_eq!(event, HandshakeEvent::Methods(vec![0x00]));

    let parts = framed.into_parts();
    let mut parser = parts.codec;
    parser.set_authed(true);
    parser.attach().unwrap();

    let stream = sockshake::socks::PushbackStream::with_pending(parts.io, parts.read_buf);
    let mut session = Session::with_parser(stream, parser);
    let req = request(session.next_event().await.unwrap());
    assert_eq!(req.dst_addr, "192.168.0.1");
    assert_eq!(req.dst_port, 22);
}

#[tokio::test]
async fn test_session_leaves_payload_for_relay() {
    let mut bytes = socks_mock::socks4(0x01, [1, 1, 1, 1], 53, "", None);
    bytes.extend_from_slice(b"GET / HTTP/1.0\r\n\r\n");

    let stream = tokio_test::io::Builder::new()
        .read(&bytes[..5])
        .read(&bytes[5..])
        .build();
    let mut session = Session::new(stream);

    let req = request(session.next_event().await.unwrap());
    assert_eq!(req.dst_addr, "1.1.1.1");

    let mut payload = Vec::new();
    session
        .into_inner()
        .read_to_end(&mut payload)
        .await
        .unwrap();
    assert_eq!(payload, b"GET / HTTP/1.0\r\n\r\n");
}
