//! Directory-listing cache: one interface, picked once at startup by capacity.
//!
//! Capacity 0 selects [`NoopListingCache`], which never stores anything, so the
//! resolver never has to check whether caching is on.

use std::{
    ffi::OsString,
    num::NonZeroUsize,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use lru::LruCache;
use tracing::trace;

/// Sorted child names of one directory, exactly as they were read from disk.
/// Never mutated once built; a stale listing is replaced wholesale.
pub type Listing = Arc<[OsString]>;

pub trait ListingCache: Send + Sync {
    /// Look up the listing stored under `key`, marking it most recently used.
    fn get(&self, key: &str) -> Option<Listing>;

    /// Store `listing` under `key`. Evicts the least recently used entry if full.
    fn insert(&self, key: String, listing: Listing);

    // The rest are for inspection (startup log, tests); resolution only
    // needs `get` and `insert`.

    /// Whether `key` is present. Does not touch recency.
    fn contains(&self, key: &str) -> bool;

    fn len(&self) -> usize;

    /// Maximum number of listings held; 0 when caching is disabled.
    fn capacity(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Build the cache variant matching `capacity`.
pub fn build_listing_cache(capacity: usize) -> Arc<dyn ListingCache> {
    match NonZeroUsize::new(capacity) {
        Some(cap) => Arc::new(LruListingCache::new(cap)),
        None => Arc::new(NoopListingCache),
    }
}

// ---------------------- Disabled ----------------------

/// Always misses. Every resolution reads the directory live.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListingCache;

impl ListingCache for NoopListingCache {
    fn get(&self, _key: &str) -> Option<Listing> {
        None
    }

    fn insert(&self, _key: String, _listing: Listing) {}

    fn contains(&self, _key: &str) -> bool {
        false
    }

    fn len(&self) -> usize {
        0
    }

    fn capacity(&self) -> usize {
        0
    }
}

// ---------------------- Bounded LRU ----------------------

/// Bounded LRU map from lower-cased directory path to its listing.
///
/// Every operation takes the lock for its whole duration, so a lookup or an
/// insert-with-eviction is atomic with respect to other requests.
pub struct LruListingCache {
    entries: Mutex<LruCache<String, Listing>>,
}

impl LruListingCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, Listing>> {
        // Every critical section leaves the map consistent, so a panic
        // elsewhere while holding the lock is safe to recover from.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ListingCache for LruListingCache {
    fn get(&self, key: &str) -> Option<Listing> {
        self.lock().get(key).cloned()
    }

    fn insert(&self, key: String, listing: Listing) {
        if let Some((evicted, _)) = self.lock().push(key.clone(), listing) {
            if evicted != key {
                trace!(evicted = %evicted, "evicted directory listing");
            }
        }
    }

    fn contains(&self, key: &str) -> bool {
        self.lock().contains(key)
    }

    fn len(&self) -> usize {
        self.lock().len()
    }

    fn capacity(&self) -> usize {
        self.lock().cap().get()
    }
}
