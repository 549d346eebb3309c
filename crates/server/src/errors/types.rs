//! Core error types for the chain store server

use chainstore_common::{CacheId, DecodeError, EncodeError};
use std::path::PathBuf;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Re-export StoreError as Error for convenience
pub use StoreError as Error;

/// Error type for store, registry and service operations.
///
/// A compare-and-swap conflict is deliberately absent: it is a normal
/// outcome reported through the response, not an error.
#[derive(Debug)]
pub enum StoreError {
    /// An operation named a cache with no registered store
    UnknownCache {
        cache_id: CacheId,
        recovery_hint: RecoveryHint,
    },

    /// A store was created twice under the same cache id
    CacheAlreadyExists {
        cache_id: CacheId,
        recovery_hint: RecoveryHint,
    },

    /// Inbound bytes were not a valid message
    Decode {
        source: DecodeError,
        recovery_hint: RecoveryHint,
    },

    /// A reply or message could not be written to the wire
    Encode {
        source: EncodeError,
        recovery_hint: RecoveryHint,
    },

    /// A message exceeded the configured size limit
    MessageTooLarge {
        size: usize,
        limit: usize,
        recovery_hint: RecoveryHint,
    },

    /// Configuration error
    Configuration {
        message: String,
        recovery_hint: RecoveryHint,
    },

    /// I/O errors while loading configuration
    Io {
        path: PathBuf,
        operation: &'static str,
        source: std::io::Error,
        recovery_hint: RecoveryHint,
    },

    /// Configuration file could not be parsed
    Serialization {
        path: PathBuf,
        source: serde_json::Error,
        recovery_hint: RecoveryHint,
    },
}

/// Recovery hints for error handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryHint {
    /// Register the cache before sending operations to it
    CreateCache { cache_id: CacheId },

    /// Use the existing store or destroy it first
    UseExisting,

    /// Drop the message; the peer sent bytes this server cannot read
    DiscardMessage,

    /// Split the payload or raise the limit
    ReduceMessageSize { limit: usize },

    /// Check file permissions
    CheckPermissions { path: PathBuf },

    /// Update configuration
    UpdateConfiguration,

    /// No automated recovery possible
    Manual { instructions: String },
}
