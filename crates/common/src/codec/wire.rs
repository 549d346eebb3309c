//! Primitive field encoding shared by the operation and response codecs
//!
//! All numeric fields are fixed width and big-endian. Variable-length
//! fields are a `u32` length followed by that many raw bytes; a chain is a
//! `u32` element count followed by one length-prefixed block per element.

use crate::chain::Chain;
use crate::errors::{DecodeError, DecodeResult, EncodeError};
use crate::payload::Payload;
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Width of a message discriminator
pub const DISCRIMINATOR_SIZE: usize = 1;

/// Width of every length and count field
pub const LENGTH_FIELD_SIZE: usize = 4;

/// Width of an encoded key
pub const KEY_SIZE: usize = 8;

/// Largest value a length or count field can carry
pub const MAX_FIELD_LEN: u64 = u32::MAX as u64;

/// Encoded size of a length-prefixed block holding `len` bytes
pub const fn block_len(len: usize) -> usize {
    LENGTH_FIELD_SIZE + len
}

/// Encoded size of a chain block
pub fn chain_len(chain: &Chain) -> usize {
    LENGTH_FIELD_SIZE
        + chain
            .payloads()
            .map(|payload| block_len(payload.len()))
            .sum::<usize>()
}

/// Cursor over an inbound buffer; every read is bounds-checked
pub(crate) struct WireReader {
    buf: Bytes,
}

impl WireReader {
    pub fn new(buf: Bytes) -> Self {
        Self { buf }
    }

    fn require(&self, field: &'static str, needed: usize) -> DecodeResult<()> {
        if self.buf.remaining() < needed {
            return Err(DecodeError::Truncated {
                field,
                needed,
                remaining: self.buf.remaining(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&mut self, field: &'static str) -> DecodeResult<u8> {
        self.require(field, 1)?;
        Ok(self.buf.get_u8())
    }

    pub fn read_u32(&mut self, field: &'static str) -> DecodeResult<u32> {
        self.require(field, LENGTH_FIELD_SIZE)?;
        Ok(self.buf.get_u32())
    }

    pub fn read_i64(&mut self, field: &'static str) -> DecodeResult<i64> {
        self.require(field, KEY_SIZE)?;
        Ok(self.buf.get_i64())
    }

    /// Read a length-prefixed block without copying the body
    pub fn read_block(&mut self, field: &'static str) -> DecodeResult<Bytes> {
        let declared = self.read_u32(field)? as usize;
        if declared > self.buf.remaining() {
            return Err(DecodeError::LengthOverrun {
                field,
                declared: declared as u64,
                remaining: self.buf.remaining(),
            });
        }
        Ok(self.buf.split_to(declared))
    }

    pub fn read_string(&mut self, field: &'static str) -> DecodeResult<String> {
        let raw = self.read_block(field)?;
        String::from_utf8(raw.to_vec()).map_err(|_| DecodeError::InvalidUtf8 { field })
    }

    pub fn read_payload(&mut self, field: &'static str) -> DecodeResult<Payload> {
        self.read_block(field).map(Payload::from)
    }

    pub fn read_chain(&mut self, field: &'static str) -> DecodeResult<Chain> {
        let count = self.read_u32(field)? as usize;
        // Every element needs at least its length field, so a count the
        // buffer cannot possibly satisfy is rejected before allocating.
        let minimum = count as u64 * LENGTH_FIELD_SIZE as u64;
        if minimum > self.buf.remaining() as u64 {
            return Err(DecodeError::LengthOverrun {
                field,
                declared: minimum,
                remaining: self.buf.remaining(),
            });
        }

        let mut payloads = Vec::with_capacity(count);
        for _ in 0..count {
            payloads.push(self.read_payload(field)?);
        }
        Ok(payloads.into_iter().collect())
    }

    /// Fail unless the whole buffer has been consumed
    pub fn finish(self) -> DecodeResult<()> {
        match self.buf.remaining() {
            0 => Ok(()),
            remaining => Err(DecodeError::TrailingBytes { remaining }),
        }
    }
}

/// Growable outbound buffer
pub(crate) struct WireWriter {
    buf: BytesMut,
}

impl WireWriter {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    pub fn put_u8(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    pub fn put_i64(&mut self, value: i64) {
        self.buf.put_i64(value);
    }

    fn put_length(&mut self, field: &'static str, len: usize) -> Result<(), EncodeError> {
        let prefix = u32::try_from(len).map_err(|_| EncodeError::FieldTooLarge {
            field,
            len,
            max: MAX_FIELD_LEN,
        })?;
        self.buf.put_u32(prefix);
        Ok(())
    }

    pub fn put_block(&mut self, field: &'static str, bytes: &[u8]) -> Result<(), EncodeError> {
        self.put_length(field, bytes.len())?;
        self.buf.put_slice(bytes);
        Ok(())
    }

    pub fn put_chain(&mut self, field: &'static str, chain: &Chain) -> Result<(), EncodeError> {
        self.put_length(field, chain.len())?;
        for payload in chain.payloads() {
            self.put_block(field, payload.as_bytes())?;
        }
        Ok(())
    }

    pub fn finish(self) -> Bytes {
        self.buf.freeze()
    }
}
