//! Normalized cache key type.
//!
//! `ResourceKey` is a newtype wrapper around `SmolStr` that guarantees two
//! invariants for every key that reaches the cache:
//!
//! - the key is **non-empty**
//! - the key is **case-folded** (Unicode lowercase), so lookups are
//!   case-insensitive

use smol_str::SmolStr;
use std::fmt;

/// A normalized, non-empty cache key.
///
/// Construction goes through [`ResourceKey::new`], which folds the raw input
/// to lowercase and rejects empty strings. Two raw keys that differ only in
/// case therefore map to the same `ResourceKey`:
///
/// # Example
/// ```
/// use fetchbox_core::ResourceKey;
///
/// let a = ResourceKey::new("Pikachu").unwrap();
/// let b = ResourceKey::new("pikachu").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "pikachu");
///
/// assert!(ResourceKey::new("").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceKey(SmolStr);

impl ResourceKey {
    /// Normalizes `raw` into a key.
    ///
    /// Returns `None` when `raw` is empty. An empty key is not an error; it
    /// is the caller signalling "nothing selected", and the cache layer
    /// treats it as a no-op.
    pub fn new(raw: impl AsRef<str>) -> Option<Self> {
        let raw = raw.as_ref();
        if raw.is_empty() {
            return None;
        }
        Some(Self(SmolStr::from(raw.to_lowercase())))
    }

    /// Returns the normalized key as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns a reference to the inner `SmolStr`.
    #[inline]
    pub fn as_smol_str(&self) -> &SmolStr {
        &self.0
    }

    /// Consumes the key and returns the inner `SmolStr`.
    #[inline]
    pub fn into_smol_str(self) -> SmolStr {
        self.0
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<str> for ResourceKey {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<ResourceKey> for SmolStr {
    #[inline]
    fn from(key: ResourceKey) -> Self {
        key.0
    }
}
