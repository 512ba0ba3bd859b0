use std::fmt;

use chrono::{DateTime, Utc};
use fetchbox_core::Resource;

/// A cached resource together with its expiration deadline.
///
/// Entries are immutable: when an entry expires, the next lookup replaces
/// the whole entry with a fresh one instead of mutating it in place. The
/// previous resource keeps settling on its own and is dropped with its last
/// handle.
pub struct CacheEntry<T, E> {
    resource: Resource<T, E>,
    expires_at: Option<DateTime<Utc>>,
}

impl<T, E> CacheEntry<T, E> {
    /// Creates an entry; `None` for `expires_at` means the entry never
    /// expires.
    pub fn new(resource: Resource<T, E>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            resource,
            expires_at,
        }
    }

    /// The resource held by this entry.
    #[inline]
    pub fn resource(&self) -> &Resource<T, E> {
        &self.resource
    }

    /// Consumes the entry and returns its resource.
    pub fn into_resource(self) -> Resource<T, E> {
        self.resource
    }

    /// When this entry expires, if ever.
    #[inline]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Whether the entry is still usable at `now`.
    #[inline]
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            None => true,
            Some(expires_at) => now < expires_at,
        }
    }
}

impl<T, E> Clone for CacheEntry<T, E> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
            expires_at: self.expires_at,
        }
    }
}

impl<T, E> fmt::Debug for CacheEntry<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("resource", &self.resource)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
