//! Byte source with push-back
//!
//! Wraps a stream so bytes that were read but not consumed can be returned to
//! it. Subsequent reads see the returned bytes first, in their original order.

use bytes::{Buf, BytesMut};
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

/// A stream that can take back unconsumed bytes
#[derive(Debug)]
pub struct PushbackStream<S> {
    inner: S,
    pending: BytesMut,
}

impl<S> PushbackStream<S> {
    /// Wrap a stream with an empty push-back buffer
    pub fn new(inner: S) -> Self {
        Self::with_pending(inner, BytesMut::new())
    }

    /// Wrap a stream whose first bytes were already read elsewhere
    pub fn with_pending(inner: S, pending: BytesMut) -> Self {
        PushbackStream { inner, pending }
    }

    /// Return bytes to the front of the stream
    ///
    /// Bytes pushed back later are read before bytes pushed back earlier.
    pub fn unread(&mut self, bytes: BytesMut) {
        if bytes.is_empty() {
            return;
        }
        if self.pending.is_empty() {
            self.pending = bytes;
        } else {
            let mut joined = bytes;
            joined.extend_from_slice(&self.pending);
            self.pending = joined;
        }
    }

    /// Bytes waiting to be read again
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    /// Get a reference to the wrapped stream
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    /// Get a mutable reference to the wrapped stream
    ///
    /// Reading from it directly skips any pushed-back bytes.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Unwrap into the stream and any bytes still pushed back
    pub fn into_parts(self) -> (S, BytesMut) {
        (self.inner, self.pending)
    }
}

impl<S: AsyncRead + Unpin> AsyncRead for PushbackStream<S> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        if !this.pending.is_empty() {
            let n = this.pending.len().min(buf.remaining());
            buf.put_slice(&this.pending[..n]);
            this.pending.advance(n);
            return Poll::Ready(Ok(()));
        }
        Pin::new(&mut this.inner).poll_read(cx, buf)
    }
}

impl<S: AsyncWrite + Unpin> AsyncWrite for PushbackStream<S> {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.get_mut().inner).poll_write(cx, buf)
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_shutdown(cx)
    }
}
