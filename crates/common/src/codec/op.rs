//! Wire codec for [`ServerStoreOp`] messages
//!
//! Layout, all integers big-endian:
//!
//! ```text
//! [u8  kind]                        Append=0x01 Get=0x02 GetAndAppend=0x03
//!                                   ReplaceAtHead=0x04 Clear=0x05
//! [u32 len][utf8 cache id]          every message
//! [i64 key]                         all kinds except Clear
//! [u32 len][payload]                Append, GetAndAppend
//! [u32 count]{[u32 len][payload]}   ReplaceAtHead: expect chain, then update chain
//! ```
//!
//! The cache id is repeated in every message rather than bound once per
//! connection, so a message can be decoded without any session state.

use super::wire::{self, WireReader, WireWriter, DISCRIMINATOR_SIZE, KEY_SIZE};
use crate::errors::{DecodeError, DecodeResult, EncodeError};
use crate::message::{CacheId, OperationKind, ServerStoreOp};
use bytes::Bytes;

/// Stateless encoder/decoder for store operations; safe to share across threads
#[derive(Debug, Clone, Copy, Default)]
pub struct OpCodec;

impl OpCodec {
    pub const fn new() -> Self {
        Self
    }

    /// Exact number of bytes `encode` will produce for `op`
    pub fn encoded_len(&self, op: &ServerStoreOp) -> usize {
        let header = DISCRIMINATOR_SIZE + wire::block_len(op.cache_id().as_str().len());
        match op {
            ServerStoreOp::Append { payload, .. } | ServerStoreOp::GetAndAppend { payload, .. } => {
                header + KEY_SIZE + wire::block_len(payload.len())
            }
            ServerStoreOp::Get { .. } => header + KEY_SIZE,
            ServerStoreOp::ReplaceAtHead { expect, update, .. } => {
                header + KEY_SIZE + wire::chain_len(expect) + wire::chain_len(update)
            }
            ServerStoreOp::Clear { .. } => header,
        }
    }

    pub fn encode(&self, op: &ServerStoreOp) -> Result<Bytes, EncodeError> {
        let mut writer = WireWriter::with_capacity(self.encoded_len(op));
        writer.put_u8(op.kind().discriminator());
        writer.put_block("cache id", op.cache_id().as_str().as_bytes())?;

        match op {
            ServerStoreOp::Append { key, payload, .. }
            | ServerStoreOp::GetAndAppend { key, payload, .. } => {
                writer.put_i64(*key);
                writer.put_block("payload", payload.as_bytes())?;
            }
            ServerStoreOp::Get { key, .. } => writer.put_i64(*key),
            ServerStoreOp::ReplaceAtHead {
                key, expect, update, ..
            } => {
                writer.put_i64(*key);
                writer.put_chain("expect chain", expect)?;
                writer.put_chain("update chain", update)?;
            }
            ServerStoreOp::Clear { .. } => {}
        }

        Ok(writer.finish())
    }

    /// Decode a complete message, sharing payload storage with `buf`
    pub fn decode(&self, buf: Bytes) -> DecodeResult<ServerStoreOp> {
        let mut reader = WireReader::new(buf);
        let tag = reader.read_u8("operation kind")?;
        let kind = OperationKind::from_discriminator(tag).ok_or(
            DecodeError::UnknownDiscriminator {
                context: "operation",
                tag,
            },
        )?;
        let cache_id = CacheId::from(reader.read_string("cache id")?);

        let op = match kind {
            OperationKind::Append => ServerStoreOp::Append {
                cache_id,
                key: reader.read_i64("key")?,
                payload: reader.read_payload("payload")?,
            },
            OperationKind::Get => ServerStoreOp::Get {
                cache_id,
                key: reader.read_i64("key")?,
            },
            OperationKind::GetAndAppend => ServerStoreOp::GetAndAppend {
                cache_id,
                key: reader.read_i64("key")?,
                payload: reader.read_payload("payload")?,
            },
            OperationKind::ReplaceAtHead => ServerStoreOp::ReplaceAtHead {
                cache_id,
                key: reader.read_i64("key")?,
                expect: reader.read_chain("expect chain")?,
                update: reader.read_chain("update chain")?,
            },
            OperationKind::Clear => ServerStoreOp::Clear { cache_id },
        };

        reader.finish()?;
        Ok(op)
    }

    /// Decode from a borrowed buffer; the bytes are copied once
    pub fn decode_slice(&self, buf: &[u8]) -> DecodeResult<ServerStoreOp> {
        self.decode(Bytes::copy_from_slice(buf))
    }
}
