//! Server-side application of store operations
//!
//! The resolver routes each decoded [`ServerStoreOp`] to the store of the
//! cache it names and turns the outcome into a [`StoreResponse`]. An
//! operation either takes full effect or none at all.

use crate::errors::Result;
use crate::registry::StoreRegistry;
use crate::store::{ReplaceOutcome, ServerStore};
use chainstore_common::{CacheId, ServerStoreOp, StoreResponse};
use std::sync::Arc;

/// Applies operations against the stores held by a [`StoreRegistry`]
#[derive(Debug, Clone)]
pub struct ChainResolver {
    registry: Arc<StoreRegistry>,
    auto_create: bool,
}

impl ChainResolver {
    pub fn new(registry: Arc<StoreRegistry>) -> Self {
        Self {
            registry,
            auto_create: false,
        }
    }

    /// Create stores for unknown caches instead of rejecting the operation
    pub fn with_auto_create(mut self, auto_create: bool) -> Self {
        self.auto_create = auto_create;
        self
    }

    pub fn registry(&self) -> &Arc<StoreRegistry> {
        &self.registry
    }

    fn store_for(&self, cache_id: &CacheId) -> Result<Arc<ServerStore>> {
        if self.auto_create {
            Ok(self.registry.get_or_create_store(cache_id))
        } else {
            self.registry.get_store(cache_id)
        }
    }

    /// Apply `op` and return the reply for the client
    ///
    /// Fails only with `UnknownCache`, before any state is touched. A Clear
    /// of an unknown cache never registers it, even with auto-create on.
    pub fn resolve(&self, op: &ServerStoreOp) -> Result<StoreResponse> {
        let store = match op {
            ServerStoreOp::Clear { cache_id } => match self.registry.get_store(cache_id) {
                Ok(store) => store,
                Err(_) if self.auto_create => return Ok(StoreResponse::Success),
                Err(error) => return Err(error),
            },
            _ => self.store_for(op.cache_id())?,
        };

        let response = match op {
            ServerStoreOp::Get { key, .. } => StoreResponse::chain(store.get(*key)),
            ServerStoreOp::Append { key, payload, .. } => {
                store.append(*key, payload.clone());
                StoreResponse::Success
            }
            ServerStoreOp::GetAndAppend { key, payload, .. } => {
                StoreResponse::chain(store.get_and_append(*key, payload.clone()))
            }
            ServerStoreOp::ReplaceAtHead {
                key, expect, update, ..
            } => match store.replace_at_head(*key, expect, update.clone()) {
                ReplaceOutcome::Replaced => StoreResponse::Success,
                ReplaceOutcome::Conflict { current } => {
                    tracing::debug!(
                        cache_id = %store.cache_id(),
                        key,
                        expected_len = expect.len(),
                        current_len = current.len(),
                        "replace at head lost to a concurrent change"
                    );
                    StoreResponse::CasConflict
                }
            },
            ServerStoreOp::Clear { .. } => {
                let keys = store.len();
                store.clear();
                tracing::debug!(cache_id = %store.cache_id(), keys, "cleared store");
                StoreResponse::Success
            }
        };

        Ok(response)
    }
}
