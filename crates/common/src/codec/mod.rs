//! Binary wire codecs
//!
//! [`OpCodec`] carries client operations to the server and [`ResponseCodec`]
//! carries the replies back. Both are stateless and never panic on malformed
//! input: every failure is reported as a [`DecodeError`](crate::DecodeError).

mod op;
mod response;
pub mod wire;

pub use op::OpCodec;
pub use response::{
    ResponseCodec, RESPONSE_CAS_CONFLICT, RESPONSE_CHAIN, RESPONSE_FAILURE, RESPONSE_SUCCESS,
};
