//! Handshake session over an async stream
//!
//! A [`Session`] attaches a [`HandshakeParser`] to a byte source. It reads
//! chunks until the parser reports a terminal event, then returns the bytes
//! it read past the end of that unit to the source, so whatever runs next
//! (the auth sub-negotiation, the next parser phase, or a relay) sees them.
//!
//! # Flow
//!
//! ```rust,ignore
//! let mut session = Session::new(stream);
//! if let Some(HandshakeEvent::Methods(methods)) = session.next_event().await? {
//!     // write the method selection, run auth on session.stream_mut() ...
//!     session.set_authed(true);
//!     session.attach()?;
//! }
//! let request = session.next_event().await?;
//! ```

use super::consts::DEFAULT_BUFFER_SIZE;
use super::parser::HandshakeParser;
use super::stream::PushbackStream;
use super::types::HandshakeEvent;
use crate::error::HandshakeError;
use bytes::BytesMut;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::debug;

/// A handshake parser attached to one connection's byte stream
#[derive(Debug)]
pub struct Session<S> {
    stream: PushbackStream<S>,
    parser: HandshakeParser,
    buf: BytesMut,
}

impl<S> Session<S> {
    /// Attach a default parser to a stream
    pub fn new(stream: S) -> Self {
        Self::with_parser(stream, HandshakeParser::new())
    }

    /// Attach the given parser to a stream
    pub fn with_parser(stream: S, parser: HandshakeParser) -> Self {
        Session {
            stream: PushbackStream::new(stream),
            parser,
            buf: BytesMut::new(),
        }
    }

    /// Get a reference to the parser
    pub fn parser(&self) -> &HandshakeParser {
        &self.parser
    }

    /// Set the parser's `authed` flag before the next [`attach`](Self::attach)
    pub fn set_authed(&mut self, authed: bool) {
        self.parser.set_authed(authed);
    }

    /// Reattach the parser to decode the next phase
    pub fn attach(&mut self) -> Result<(), HandshakeError> {
        self.parser.attach()
    }

    /// Stop decoding, discarding partial progress
    pub fn detach(&mut self) {
        self.parser.detach();
    }

    /// The byte source, with any pushed-back bytes still readable
    pub fn stream_mut(&mut self) -> &mut PushbackStream<S> {
        &mut self.stream
    }

    /// Give up the session and keep the byte source
    pub fn into_inner(self) -> PushbackStream<S> {
        self.stream
    }
}

impl<S: AsyncRead + Unpin> Session<S> {
    /// Read until the attached parser completes one unit
    ///
    /// Returns `Ok(None)` if the stream closed before the unit started.
    pub async fn next_event(&mut self) -> Result<Option<HandshakeEvent>, HandshakeError> {
        if self.parser.is_failed() {
            return Err(HandshakeError::Failed);
        }
        if !self.parser.is_attached() {
            return Err(HandshakeError::Detached);
        }

        loop {
            self.buf.reserve(DEFAULT_BUFFER_SIZE);
            let n = match self.stream.read_buf(&mut self.buf).await {
                Ok(n) => n,
                Err(e) => {
                    self.parser.detach();
                    self.buf.clear();
                    return Err(e.into());
                }
            };

            let decoded = if n == 0 {
                self.parser.decode_eof(&mut self.buf)
            } else {
                self.parser.decode(&mut self.buf)
            };

            match decoded {
                Ok(Some(event)) => {
                    if !self.buf.is_empty() {
                        debug!("Pushing back {} surplus bytes", self.buf.len());
                    }
                    self.stream.unread(self.buf.split());
                    return Ok(Some(event));
                }
                Ok(None) if n == 0 => return Ok(None),
                Ok(None) => {}
                Err(e) => {
                    self.buf.clear();
                    return Err(e.into());
                }
            }
        }
    }

    /// [`next_event`](Self::next_event) with a deadline
    ///
    /// When the deadline passes the parser is detached and
    /// [`HandshakeError::Timeout`] is returned.
    pub async fn next_event_timeout(
        &mut self,
        timeout: Duration,
    ) -> Result<Option<HandshakeEvent>, HandshakeError> {
        match tokio::time::timeout(timeout, self.next_event()).await {
            Ok(result) => result,
            Err(_) => {
                self.parser.detach();
                self.buf.clear();
                Err(HandshakeError::Timeout)
            }
        }
    }
}
