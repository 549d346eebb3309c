//! Error handling for the chain store server
//!
//! Errors carry a [`RecoveryHint`] so callers can decide whether to retry,
//! drop the message or fix their setup, and map onto the
//! [`FailureCode`](chainstore_common::FailureCode) sent back to clients.

mod conversions;
mod display;
mod recovery;
mod types;

pub use types::*;
