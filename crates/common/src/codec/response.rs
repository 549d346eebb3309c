//! Wire codec for [`StoreResponse`] replies
//!
//! ```text
//! [u8 tag]                          Success=0x41 Chain=0x42 CasConflict=0x43 Failure=0x44
//! Chain:    [u32 count]{[u32 len][payload]}
//! Failure:  [u8 code][u32 len][utf8 message]
//! ```

use super::wire::{self, WireReader, WireWriter, DISCRIMINATOR_SIZE};
use crate::errors::{DecodeError, DecodeResult, EncodeError};
use crate::response::{FailureCode, StoreResponse};
use bytes::Bytes;

pub const RESPONSE_SUCCESS: u8 = 0x41;
pub const RESPONSE_CHAIN: u8 = 0x42;
pub const RESPONSE_CAS_CONFLICT: u8 = 0x43;
pub const RESPONSE_FAILURE: u8 = 0x44;

/// Stateless encoder/decoder for store replies
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseCodec;

impl ResponseCodec {
    pub const fn new() -> Self {
        Self
    }

    pub fn encoded_len(&self, response: &StoreResponse) -> usize {
        DISCRIMINATOR_SIZE
            + match response {
                StoreResponse::Success | StoreResponse::CasConflict => 0,
                StoreResponse::Chain { chain } => wire::chain_len(chain),
                StoreResponse::Failure { message, .. } => 1 + wire::block_len(message.len()),
            }
    }

    pub fn encode(&self, response: &StoreResponse) -> Result<Bytes, EncodeError> {
        let mut writer = WireWriter::with_capacity(self.encoded_len(response));
        match response {
            StoreResponse::Success => writer.put_u8(RESPONSE_SUCCESS),
            StoreResponse::Chain { chain } => {
                writer.put_u8(RESPONSE_CHAIN);
                writer.put_chain("chain", chain)?;
            }
            StoreResponse::CasConflict => writer.put_u8(RESPONSE_CAS_CONFLICT),
            StoreResponse::Failure { code, message } => {
                writer.put_u8(RESPONSE_FAILURE);
                writer.put_u8(code.code());
                writer.put_block("failure message", message.as_bytes())?;
            }
        }
        Ok(writer.finish())
    }

    pub fn decode(&self, buf: Bytes) -> DecodeResult<StoreResponse> {
        let mut reader = WireReader::new(buf);
        let response = match reader.read_u8("response kind")? {
            RESPONSE_SUCCESS => StoreResponse::Success,
            RESPONSE_CHAIN => StoreResponse::Chain {
                chain: reader.read_chain("chain")?,
            },
            RESPONSE_CAS_CONFLICT => StoreResponse::CasConflict,
            RESPONSE_FAILURE => {
                let tag = reader.read_u8("failure code")?;
                let code = FailureCode::from_code(tag).ok_or(DecodeError::UnknownDiscriminator {
                    context: "failure code",
                    tag,
                })?;
                StoreResponse::Failure {
                    code,
                    message: reader.read_string("failure message")?,
                }
            }
            tag => {
                return Err(DecodeError::UnknownDiscriminator {
                    context: "response",
                    tag,
                })
            }
        };

        reader.finish()?;
        Ok(response)
    }

    pub fn decode_slice(&self, buf: &[u8]) -> DecodeResult<StoreResponse> {
        self.decode(Bytes::copy_from_slice(buf))
    }
}
