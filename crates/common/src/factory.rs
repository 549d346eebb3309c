//! Builder for operation messages bound to one cache

use crate::chain::Chain;
use crate::message::{CacheId, Key, ServerStoreOp};
use crate::payload::Payload;

/// Creates [`ServerStoreOp`] messages that all target the same cache.
///
/// The factory performs no validation; every message it returns is
/// well-formed by construction.
#[derive(Debug, Clone)]
pub struct MessageFactory {
    cache_id: CacheId,
}

impl MessageFactory {
    pub fn new(cache_id: impl Into<CacheId>) -> Self {
        Self {
            cache_id: cache_id.into(),
        }
    }

    pub fn cache_id(&self) -> &CacheId {
        &self.cache_id
    }

    pub fn append_operation(&self, key: Key, payload: Payload) -> ServerStoreOp {
        ServerStoreOp::Append {
            cache_id: self.cache_id.clone(),
            key,
            payload,
        }
    }

    pub fn get_operation(&self, key: Key) -> ServerStoreOp {
        ServerStoreOp::Get {
            cache_id: self.cache_id.clone(),
            key,
        }
    }

    pub fn get_and_append_operation(&self, key: Key, payload: Payload) -> ServerStoreOp {
        ServerStoreOp::GetAndAppend {
            cache_id: self.cache_id.clone(),
            key,
            payload,
        }
    }

    pub fn replace_at_head_operation(&self, key: Key, expect: Chain, update: Chain) -> ServerStoreOp {
        ServerStoreOp::ReplaceAtHead {
            cache_id: self.cache_id.clone(),
            key,
            expect,
            update,
        }
    }

    pub fn clear_operation(&self) -> ServerStoreOp {
        ServerStoreOp::Clear {
            cache_id: self.cache_id.clone(),
        }
    }
}
