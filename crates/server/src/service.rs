//! Byte-level entry point for the entity runtime
//!
//! [`StoreService::handle`] takes one complete inbound message and always
//! produces one encoded reply. Malformed or oversized input becomes a
//! `Failure` reply; it never panics or tears anything down.

use crate::config::ServerConfig;
use crate::errors::{RecoveryHint, Result, StoreError};
use crate::registry::StoreRegistry;
use crate::resolver::ChainResolver;
use bytes::Bytes;
use chainstore_common::codec::RESPONSE_FAILURE;
use chainstore_common::{
    CacheId, EncodeError, OpCodec, ResponseCodec, ServerStoreOp, StoreResponse,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Counters describing the traffic a service has handled
#[derive(Debug, Default)]
struct ServiceCounters {
    messages: AtomicU64,
    decode_failures: AtomicU64,
    rejected: AtomicU64,
    cas_conflicts: AtomicU64,
}

/// Point-in-time copy of the service counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServiceStats {
    /// Inbound messages seen by `handle` or `execute`
    pub messages: u64,
    /// Messages that were not valid encodings
    pub decode_failures: u64,
    /// Messages refused by size limit or unknown cache
    pub rejected: u64,
    /// ReplaceAtHead operations that found a different chain
    pub cas_conflicts: u64,
}

/// Decodes, resolves and answers store operations
#[derive(Debug)]
pub struct StoreService {
    resolver: ChainResolver,
    op_codec: OpCodec,
    response_codec: ResponseCodec,
    max_message_bytes: usize,
    counters: ServiceCounters,
}

impl StoreService {
    /// Build a service and register the caches named in `config`
    pub fn new(config: &ServerConfig) -> Result<Self> {
        config.validate()?;

        let registry = Arc::new(StoreRegistry::new());
        for cache in &config.caches {
            registry.create_store(CacheId::new(cache))?;
        }

        Ok(Self::with_registry(registry, config))
    }

    /// Build a service over an existing registry
    pub fn with_registry(registry: Arc<StoreRegistry>, config: &ServerConfig) -> Self {
        Self {
            resolver: ChainResolver::new(registry).with_auto_create(config.auto_create),
            op_codec: OpCodec::new(),
            response_codec: ResponseCodec::new(),
            max_message_bytes: config.max_message_bytes,
            counters: ServiceCounters::default(),
        }
    }

    pub fn registry(&self) -> &Arc<StoreRegistry> {
        self.resolver.registry()
    }

    /// Handle one encoded operation and return the encoded reply
    pub fn handle(&self, message: Bytes) -> Bytes {
        let response = match self.decode(message) {
            Ok(op) => self.execute(&op),
            Err(error) => {
                self.counters.messages.fetch_add(1, Ordering::Relaxed);
                Self::failure_response(&error)
            }
        };
        self.encode_response(&response)
    }

    /// Handle one encoded operation held in a borrowed buffer
    pub fn handle_slice(&self, message: &[u8]) -> Bytes {
        self.handle(Bytes::copy_from_slice(message))
    }

    /// Check the size limit and decode an inbound message
    pub fn decode(&self, message: Bytes) -> Result<ServerStoreOp> {
        if message.len() > self.max_message_bytes {
            self.counters.rejected.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(
                size = message.len(),
                limit = self.max_message_bytes,
                "rejecting oversized message"
            );
            return Err(StoreError::MessageTooLarge {
                size: message.len(),
                limit: self.max_message_bytes,
                recovery_hint: RecoveryHint::ReduceMessageSize {
                    limit: self.max_message_bytes,
                },
            });
        }

        self.op_codec.decode(message).map_err(|error| {
            self.counters.decode_failures.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(kind = error.kind(), %error, "failed to decode message");
            StoreError::from(error)
        })
    }

    /// Apply an already decoded operation
    pub fn execute(&self, op: &ServerStoreOp) -> StoreResponse {
        self.counters.messages.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(
            op = %op.kind(),
            cache_id = %op.cache_id(),
            key = ?op.key(),
            "applying operation"
        );

        match self.resolver.resolve(op) {
            Ok(StoreResponse::CasConflict) => {
                self.counters.cas_conflicts.fetch_add(1, Ordering::Relaxed);
                StoreResponse::CasConflict
            }
            Ok(response) => response,
            Err(error) => {
                self.counters.rejected.fetch_add(1, Ordering::Relaxed);
                if error.is_client_error() {
                    tracing::debug!(%error, "operation rejected");
                } else {
                    tracing::error!(%error, hint = ?error.recovery_hint(), "operation failed");
                }
                Self::failure_response(&error)
            }
        }
    }

    fn failure_response(error: &StoreError) -> StoreResponse {
        StoreResponse::failure(error.failure_code(), error.to_string())
    }

    fn encode_response(&self, response: &StoreResponse) -> Bytes {
        self.response_codec
            .encode(response)
            .unwrap_or_else(|error| self.encode_error_reply(error))
    }

    /// Reply sent when the real reply cannot be encoded
    ///
    /// Only a chain with more than `u32::MAX` elements or bytes gets here.
    fn encode_error_reply(&self, error: EncodeError) -> Bytes {
        let error = StoreError::from(error);
        tracing::error!(%error, hint = ?error.recovery_hint(), "failed to encode response");
        self.response_codec
            .encode(&Self::failure_response(&error))
            .unwrap_or_else(|_| Bytes::from_static(&[RESPONSE_FAILURE]))
    }

    pub fn stats(&self) -> ServiceStats {
        ServiceStats {
            messages: self.counters.messages.load(Ordering::Relaxed),
            decode_failures: self.counters.decode_failures.load(Ordering::Relaxed),
            rejected: self.counters.rejected.load(Ordering::Relaxed),
            cas_conflicts: self.counters.cas_conflicts.load(Ordering::Relaxed),
        }
    }
}
