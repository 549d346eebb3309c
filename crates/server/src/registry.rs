//! Registry of per-cache stores
//!
//! The registry is the explicit owner of all chain state in a server
//! process: stores are created when a cache is registered and dropped when
//! it is destroyed.

use crate::errors::{RecoveryHint, Result, StoreError};
use crate::store::ServerStore;
use chainstore_common::CacheId;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

/// Maps each [`CacheId`] to its [`ServerStore`]
#[derive(Debug, Default)]
pub struct StoreRegistry {
    stores: DashMap<CacheId, Arc<ServerStore>>,
}

impl StoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new, empty store for `cache_id`
    pub fn create_store(&self, cache_id: CacheId) -> Result<Arc<ServerStore>> {
        match self.stores.entry(cache_id) {
            Entry::Occupied(existing) => Err(StoreError::CacheAlreadyExists {
                cache_id: existing.key().clone(),
                recovery_hint: RecoveryHint::UseExisting,
            }),
            Entry::Vacant(slot) => {
                let store = Arc::new(ServerStore::new(slot.key().clone()));
                slot.insert(Arc::clone(&store));
                tracing::info!(cache_id = %store.cache_id(), "created store");
                Ok(store)
            }
        }
    }

    /// Look up the store for `cache_id`
    pub fn get_store(&self, cache_id: &CacheId) -> Result<Arc<ServerStore>> {
        self.stores
            .get(cache_id)
            .map(|store| Arc::clone(store.value()))
            .ok_or_else(|| StoreError::UnknownCache {
                cache_id: cache_id.clone(),
                recovery_hint: RecoveryHint::CreateCache {
                    cache_id: cache_id.clone(),
                },
            })
    }

    /// Look up the store for `cache_id`, registering it on first use
    pub fn get_or_create_store(&self, cache_id: &CacheId) -> Arc<ServerStore> {
        if let Some(store) = self.stores.get(cache_id) {
            return Arc::clone(store.value());
        }
        let store = self
            .stores
            .entry(cache_id.clone())
            .or_insert_with(|| {
                tracing::info!(cache_id = %cache_id, "created store on first use");
                Arc::new(ServerStore::new(cache_id.clone()))
            });
        Arc::clone(store.value())
    }

    /// Remove the store for `cache_id` together with all of its chains
    ///
    /// Handles obtained earlier stay usable but are detached: an operation
    /// already holding one when the cache is destroyed lands in the old
    /// store and is never visible through a store created later under the
    /// same id. Quiesce traffic for the cache before destroying it.
    pub fn destroy_store(&self, cache_id: &CacheId) -> Result<()> {
        match self.stores.remove(cache_id) {
            Some((_, store)) => {
                tracing::info!(cache_id = %cache_id, keys = store.len(), "destroyed store");
                Ok(())
            }
            None => Err(StoreError::UnknownCache {
                cache_id: cache_id.clone(),
                recovery_hint: RecoveryHint::Manual {
                    instructions: "Nothing to destroy; the cache was never registered".to_string(),
                },
            }),
        }
    }

    pub fn contains(&self, cache_id: &CacheId) -> bool {
        self.stores.contains_key(cache_id)
    }

    /// Registered cache ids in sorted order
    pub fn cache_ids(&self) -> Vec<CacheId> {
        let mut ids: Vec<CacheId> = self.stores.iter().map(|entry| entry.key().clone()).collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    /// Destroy every store
    pub fn clear_all(&self) {
        self.stores.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainstore_common::Payload;

    #[test]
    fn test_create_and_lookup() {
        let registry = StoreRegistry::new();
        let created = registry.create_store(CacheId::new("a")).expect("Should create");
        let found = registry.get_store(&CacheId::new("a")).expect("Should exist");
        assert!(Arc::ptr_eq(&created, &found));
    }

    #[test]
    fn test_duplicate_create_fails() {
        let registry = StoreRegistry::new();
        registry.create_store(CacheId::new("a")).expect("Should create");
        assert!(matches!(
            registry.create_store(CacheId::new("a")),
            Err(StoreError::CacheAlreadyExists { .. })
        ));
    }

    #[test]
    fn test_unknown_cache() {
        let registry = StoreRegistry::new();
        let error = registry
            .get_store(&CacheId::new("missing"))
            .expect_err("Should not exist");
        assert!(matches!(error, StoreError::UnknownCache { .. }));
        assert!(error.to_string().contains("missing"));
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        let registry = StoreRegistry::new();
        let first = registry.get_or_create_store(&CacheId::new("a"));
        let second = registry.get_or_create_store(&CacheId::new("a"));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_destroy_drops_chains() {
        let registry = StoreRegistry::new();
        let id = CacheId::new("a");
        registry
            .create_store(id.clone())
            .expect("Should create")
            .append(1, Payload::from_i64(1));

        registry.destroy_store(&id).expect("Should destroy");
        assert!(!registry.contains(&id));
        assert!(registry.destroy_store(&id).is_err());

        let recreated = registry.create_store(id).expect("Should recreate");
        assert!(recreated.is_empty());
    }

    #[test]
    fn test_detached_handle_does_not_reach_recreated_store() {
        let registry = StoreRegistry::new();
        let id = CacheId::new("a");
        let stale = registry.create_store(id.clone()).expect("Should create");

        registry.destroy_store(&id).expect("Should destroy");
        let recreated = registry.create_store(id.clone()).expect("Should recreate");
        stale.append(1, Payload::from_i64(1));

        assert!(!Arc::ptr_eq(&stale, &recreated));
        assert!(recreated.is_empty());
        assert!(registry.get_store(&id).expect("Should exist").is_empty());
    }

    #[test]
    fn test_cache_ids_sorted() {
        let registry = StoreRegistry::new();
        for id in ["b", "c", "a"] {
            registry.create_store(CacheId::new(id)).expect("Should create");
        }
        let ids: Vec<String> = registry
            .cache_ids()
            .iter()
            .map(|id| id.as_str().to_string())
            .collect();
        assert_eq!(ids, ["a", "b", "c"]);

        registry.clear_all();
        assert!(registry.is_empty());
    }
}
