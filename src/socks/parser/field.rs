//! Field accumulators
//!
//! Buffers that keep partial progress of a single wire field between calls,
//! so a field split across chunk boundaries resumes where it stopped.

use crate::error::{Field, ParseError};
use bytes::{Buf, BytesMut};

/// A field of known length, filled across any number of chunks
#[derive(Debug)]
pub(crate) struct FixedField {
    buf: Vec<u8>,
    len: usize,
}

impl FixedField {
    pub(crate) fn new(len: usize) -> Self {
        FixedField {
            buf: Vec::with_capacity(len),
            len,
        }
    }

    /// Move up to the missing number of bytes out of `src`.
    ///
    /// Returns true once the field is complete. Never takes more than the
    /// field needs, so trailing bytes stay in `src`.
    pub(crate) fn fill(&mut self, src: &mut BytesMut) -> bool {
        let take = (self.len - self.buf.len()).min(src.len());
        self.buf.extend_from_slice(&src[..take]);
        src.advance(take);
        self.is_complete()
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.buf.len() == self.len
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Big-endian u16 of a completed 2-byte field
    pub(crate) fn to_port(&self) -> u16 {
        match self.buf.as_slice() {
            [hi, lo] => u16::from_be_bytes([*hi, *lo]),
            _ => 0,
        }
    }
}

/// A byte string ended by a single NUL, scanned across chunks
#[derive(Debug)]
pub(crate) struct NulTerminated {
    buf: Vec<u8>,
    field: Field,
    limit: usize,
}

impl NulTerminated {
    pub(crate) fn new(field: Field, limit: usize) -> Self {
        NulTerminated {
            buf: Vec::new(),
            field,
            limit,
        }
    }

    pub(crate) fn field(&self) -> Field {
        self.field
    }

    /// Consume bytes up to and including the terminator.
    ///
    /// Returns `Ok(true)` once the terminator was seen; the terminator is
    /// consumed but not stored. Without a terminator every delivered byte is
    /// kept and scanning resumes on the next call.
    pub(crate) fn scan(&mut self, src: &mut BytesMut) -> Result<bool, ParseError> {
        let (take, terminated) = match src.iter().position(|&b| b == 0) {
            Some(pos) => (pos, true),
            None => (src.len(), false),
        };

        if self.buf.len() + take > self.limit {
            return Err(ParseError::FieldTooLong {
                field: self.field,
                limit: self.limit,
            });
        }

        self.buf.extend_from_slice(&src[..take]);
        src.advance(take);
        if terminated {
            src.advance(1);
        }
        Ok(terminated)
    }

    pub(crate) fn into_string(self) -> String {
        String::from_utf8_lossy(&self.buf).into_owned()
    }
}
