//! Per-cache chain storage
//!
//! A [`ServerStore`] maps keys to their current [`Chain`]. Each slot holds
//! an immutable chain value that is swapped wholesale. Mutations on a slot
//! run while holding that slot's map entry, which makes every
//! read-modify-write (append, get-and-append, compare-and-swap) a single
//! atomic step with respect to other operations on the same key. Readers
//! clone the current chain, which shares its elements instead of copying.

use chainstore_common::{CacheId, Chain, Key, Payload};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Result of a compare-and-swap on one slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplaceOutcome {
    /// The slot held the expected chain and now holds the update
    Replaced,
    /// The slot held a different chain, returned here; nothing changed
    Conflict { current: Chain },
}

impl ReplaceOutcome {
    pub fn is_replaced(&self) -> bool {
        matches!(self, Self::Replaced)
    }
}

/// Chain storage for one cache
#[derive(Debug)]
pub struct ServerStore {
    cache_id: CacheId,
    slots: DashMap<Key, Chain>,
}

impl ServerStore {
    pub fn new(cache_id: CacheId) -> Self {
        Self {
            cache_id,
            slots: DashMap::new(),
        }
    }

    pub fn cache_id(&self) -> &CacheId {
        &self.cache_id
    }

    /// Current chain for `key`; an untouched slot reads as the empty chain
    pub fn get(&self, key: Key) -> Chain {
        self.slots
            .get(&key)
            .map(|chain| chain.value().clone())
            .unwrap_or_default()
    }

    /// Append `payload` to the slot and return the new chain
    pub fn append(&self, key: Key, payload: Payload) -> Chain {
        let mut slot = self.slots.entry(key).or_default();
        let updated = slot.append(payload);
        *slot = updated.clone();
        updated
    }

    /// Append `payload` and return the chain as it was before the append
    pub fn get_and_append(&self, key: Key, payload: Payload) -> Chain {
        let mut slot = self.slots.entry(key).or_default();
        let previous = slot.clone();
        *slot = previous.append(payload);
        previous
    }

    /// Replace the slot's chain with `update` iff it currently equals `expect`
    ///
    /// An absent slot compares equal to the empty chain. Installing an empty
    /// update removes the slot.
    pub fn replace_at_head(&self, key: Key, expect: &Chain, update: Chain) -> ReplaceOutcome {
        match self.slots.entry(key) {
            Entry::Occupied(mut slot) => {
                if slot.get() != expect {
                    return ReplaceOutcome::Conflict {
                        current: slot.get().clone(),
                    };
                }
                if update.is_empty() {
                    slot.remove();
                } else {
                    slot.insert(update);
                }
                ReplaceOutcome::Replaced
            }
            Entry::Vacant(slot) => {
                if !expect.is_empty() {
                    return ReplaceOutcome::Conflict {
                        current: Chain::empty(),
                    };
                }
                if !update.is_empty() {
                    slot.insert(update);
                }
                ReplaceOutcome::Replaced
            }
        }
    }

    /// Remove every slot in this cache
    pub fn clear(&self) {
        self.slots.clear();
    }

    /// Number of keys holding a non-empty chain
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains_key(&self, key: Key) -> bool {
        self.slots.contains_key(&key)
    }
}
