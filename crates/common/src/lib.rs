//! Shared building blocks of the chainstore protocol.
//!
//! Every key in a clustered store maps to a [`Chain`]: an ordered, immutable
//! sequence of opaque [`Payload`] elements. Clients mutate chains by sending
//! [`ServerStoreOp`] messages, built through a [`MessageFactory`] and carried
//! over the wire by the [`OpCodec`]. The server answers with a
//! [`StoreResponse`], carried back by the [`ResponseCodec`].
//!
//! ## Key Components
//!
//! - **`payload`** / **`chain`**: the immutable value model.
//! - **`message`** / **`factory`**: the closed set of operation kinds and a
//!   builder bound to one cache.
//! - **`codec`**: the binary wire format, with errors that distinguish
//!   truncated input, unknown discriminators and length overruns.
//! - **`response`**: the reply model produced by the server.

pub mod chain;
pub mod codec;
pub mod errors;
pub mod factory;
pub mod message;
pub mod payload;
pub mod response;

pub use chain::{Chain, Element};
pub use codec::{OpCodec, ResponseCodec};
pub use errors::{DecodeError, EncodeError};
pub use factory::MessageFactory;
pub use message::{CacheId, Key, OperationKind, ServerStoreOp};
pub use payload::Payload;
pub use response::{FailureCode, StoreResponse};
