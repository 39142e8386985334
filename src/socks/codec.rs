//! `tokio_util` codec adapter
//!
//! Lets a [`HandshakeParser`] drive a [`FramedRead`](tokio_util::codec::FramedRead).
//! After a terminal event the decoder yields nothing and leaves the surplus in
//! the framed read buffer, which the caller recovers with `into_parts()`.

use super::parser::HandshakeParser;
use super::types::HandshakeEvent;
use crate::error::HandshakeError;
use bytes::BytesMut;
use tokio_util::codec::Decoder;

impl Decoder for HandshakeParser {
    type Item = HandshakeEvent;
    type Error = HandshakeError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        Ok(HandshakeParser::decode(self, src)?)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        Ok(HandshakeParser::decode_eof(self, src)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Field, ParseError};
    use futures::StreamExt;
    use tokio_util::codec::FramedRead;

    #[tokio::test]
    async fn test_framed_read_fragmented_request() {
        let stream = tokio_test::io::Builder::new()
            .read(&[0x04, 0x01])
            .read(&[0x00, 0x50, 0x00, 0x00])
            .read(&[0x00, 0x01, b'b', b'a'])
            .read(b"z\0bar.")
            .read(b"com\0")
            .build();

        let mut framed = FramedRead::new(stream, HandshakeParser::new());
        let event = framed.next().await.unwrap().unwrap();

        match event {
            HandshakeEvent::Request(req) => {
                assert_eq!(req.dst_addr, "bar.com");
                assert_eq!(req.username.as_deref(), Some("baz"));
                assert_eq!(req.dst_port, 80);
            }
            other => panic!("Expected request, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_framed_read_keeps_surplus() {
        let stream = tokio_test::io::Builder::new()
            .read(&[0x05, 0x02, 0x00, 0x02, 0x05, 0x01])
            .build();

        let mut framed = FramedRead::new(stream, HandshakeParser::new());
        let event = framed.next().await.unwrap().unwrap();
        assert_eq!(event, HandshakeEvent::Methods(vec![0x00, 0x02]));
        assert_eq!(&framed.read_buffer()[..], &[0x05, 0x01]);

        let parts = framed.into_parts();
        assert!(!parts.codec.is_attached());
        assert_eq!(&parts.read_buf[..], &[0x05, 0x01]);
    }

    #[tokio::test]
    async fn test_framed_read_unterminated_user_id() {
        let stream = tokio_test::io::Builder::new()
            .read(&[0x04, 0x01, 0x00, 0x50, 1, 2, 3, 4, b'f'])
            .build();

        let mut framed = FramedRead::new(stream, HandshakeParser::new());
        let err = framed.next().await.unwrap().unwrap_err();
        assert_eq!(
            err.as_parse(),
            Some(&ParseError::UnterminatedField(Field::Username))
        );
    }

    #[tokio::test]
    async fn test_framed_read_clean_close() {
        let stream = tokio_test::io::Builder::new().build();
        let mut framed = FramedRead::new(stream, HandshakeParser::new());
        assert!(framed.next().await.is_none());
    }
}
