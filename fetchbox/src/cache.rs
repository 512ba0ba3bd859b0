use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use fetchbox_core::{Fetcher, Resource, ResourceKey};
use tracing::debug;

use crate::entry::CacheEntry;
use crate::policy::ExpirationPolicy;

#[cfg(feature = "metrics")]
use crate::metrics::{CACHE_EXPIRED_COUNTER, CACHE_HIT_COUNTER, CACHE_MISS_COUNTER};

struct CacheInner<T, E> {
    expiration: ExpirationPolicy,
    entries: DashMap<ResourceKey, CacheEntry<T, E>>,
}

/// Keyed cache of [`Resource`] handles.
///
/// The cache memoizes resources by normalized key: at most one entry exists
/// per key, and while that entry is live every lookup returns the same
/// resource handle without reaching the upstream again. Expired entries are
/// replaced wholesale by the next lookup.
///
/// Cloning is cheap and clones share the same store, so the owning scope
/// can hand the cache to consumers and background tasks freely. Dropping
/// the last clone drops every entry with it.
pub struct ResourceCache<T, E> {
    inner: Arc<CacheInner<T, E>>,
}

impl<T, E> ResourceCache<T, E> {
    /// Creates a cache with the given expiration policy.
    pub fn new(expiration: ExpirationPolicy) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                expiration,
                entries: DashMap::new(),
            }),
        }
    }

    /// Creates a cache whose entries expire `ttl` after creation.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self::new(ExpirationPolicy::after(ttl))
    }

    /// The expiration policy this cache applies to new entries.
    pub fn expiration(&self) -> ExpirationPolicy {
        self.inner.expiration
    }

    /// Returns the live resource for `raw_key`, or creates one.
    ///
    /// The raw key is normalized first; an empty key is a defined no-op and
    /// returns `None` without touching the store or running the factory.
    /// Otherwise:
    ///
    /// - a live entry wins: its resource is returned unchanged, so repeated
    ///   lookups inside the entry lifetime observe the identical handle
    /// - on a miss or an expired entry, `make` runs exactly once and its
    ///   resource is stored with a fresh deadline, replacing any dead entry
    ///
    /// Concurrent callers of the same key are serialized on that key's map
    /// shard, so one of them runs the factory and the rest observe the entry
    /// it wrote. `make` runs while that shard is locked and must not touch
    /// this cache itself.
    ///
    /// # Example
    /// ```
    /// use fetchbox::{ExpirationPolicy, Resource, ResourceCache};
    ///
    /// let cache: ResourceCache<u32, String> = ResourceCache::new(ExpirationPolicy::never());
    /// let first = cache.get_or_create("Mew", |_key| Resource::ready(151)).unwrap();
    /// let second = cache.get_or_create("mew", |_key| Resource::ready(0)).unwrap();
    /// // One entry, one resource: the second factory never ran.
    /// assert_eq!(first, second);
    /// assert_eq!(cache.len(), 1);
    /// ```
    pub fn get_or_create<F>(&self, raw_key: &str, make: F) -> Option<Resource<T, E>>
    where
        F: FnOnce(&ResourceKey) -> Resource<T, E>,
    {
        let key = ResourceKey::new(raw_key)?;
        let now = Utc::now();
        match self.inner.entries.entry(key) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_live(now) {
                    debug!(key = %occupied.key(), "cache hit");
                    #[cfg(feature = "metrics")]
                    metrics::counter!(*CACHE_HIT_COUNTER).increment(1);
                    Some(occupied.get().resource().clone())
                } else {
                    debug!(key = %occupied.key(), "cache entry expired, refetching");
                    #[cfg(feature = "metrics")]
                    metrics::counter!(*CACHE_EXPIRED_COUNTER).increment(1);
                    let resource = make(occupied.key());
                    let entry =
                        CacheEntry::new(resource.clone(), self.inner.expiration.expires_at(now));
                    occupied.insert(entry);
                    Some(resource)
                }
            }
            Entry::Vacant(vacant) => {
                debug!(key = %vacant.key(), "cache miss");
                #[cfg(feature = "metrics")]
                metrics::counter!(*CACHE_MISS_COUNTER).increment(1);
                let resource = make(vacant.key());
                let entry =
                    CacheEntry::new(resource.clone(), self.inner.expiration.expires_at(now));
                vacant.insert(entry);
                Some(resource)
            }
        }
    }

    /// Read-only lookup.
    ///
    /// Returns `None` for empty keys, absent entries and expired entries.
    /// Readers never mutate the store; an expired entry stays in place
    /// until the next [`get_or_create`](Self::get_or_create) replaces it or
    /// [`invalidate`](Self::invalidate) removes it.
    pub fn get(&self, raw_key: &str) -> Option<Resource<T, E>> {
        let key = ResourceKey::new(raw_key)?;
        let entry = self.inner.entries.get(&key)?;
        entry
            .is_live(Utc::now())
            .then(|| entry.resource().clone())
    }

    /// Removes the entry for `raw_key`, live or not.
    ///
    /// Returns `true` when an entry was removed. In-flight fetches of a
    /// removed entry keep running and settle their own orphaned resource.
    pub fn invalidate(&self, raw_key: &str) -> bool {
        let Some(key) = ResourceKey::new(raw_key) else {
            return false;
        };
        let removed = self.inner.entries.remove(&key).is_some();
        if removed {
            debug!(key = %key, "cache entry invalidated");
        }
        removed
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.inner.entries.clear();
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    /// Whether the store holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }
}

impl<T, E> ResourceCache<T, E>
where
    T: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Returns the live resource for `raw_key`, spawning `fetcher` on a
    /// miss.
    ///
    /// Convenience over [`get_or_create`](Self::get_or_create) that drives
    /// `fetcher.fetch(key)` on the Tokio runtime. The fetcher is cloned
    /// into the spawned task; wrap expensive fetchers in an `Arc`.
    ///
    /// # Panics
    ///
    /// Panics when a fetch must be spawned outside a Tokio runtime.
    pub fn fetch_with<A>(&self, raw_key: &str, fetcher: &A) -> Option<Resource<T, E>>
    where
        A: Fetcher<Payload = T, Error = E> + Clone + 'static,
    {
        self.get_or_create(raw_key, |key| {
            let fetcher = fetcher.clone();
            let key = key.clone();
            Resource::spawn(async move { fetcher.fetch(key).await })
        })
    }
}

impl<T, E> Clone for ResourceCache<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T, E> Default for ResourceCache<T, E> {
    fn default() -> Self {
        Self::new(ExpirationPolicy::default())
    }
}

impl<T, E> fmt::Debug for ResourceCache<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceCache")
            .field("entries", &self.inner.entries.len())
            .field("expiration", &self.inner.expiration)
            .finish()
    }
}
