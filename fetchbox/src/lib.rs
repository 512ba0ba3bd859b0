#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

/// Keyed memoization of in-flight and settled resources.
///
/// [`ResourceCache`](cache::ResourceCache) hands out [`Resource`] handles
/// keyed by normalized lookup keys, deduplicates concurrent lookups of one
/// key, and replaces expired entries on the next lookup.
pub mod cache;

/// Cache entries pairing a resource with its expiration deadline.
pub mod entry;

/// Busy-indicator gating with a show delay and a minimum visible duration.
///
/// [`LoadingGate`](loading::LoadingGate) is the piece that keeps loading
/// indicators from flickering: short loads never show one, and once one is
/// shown it stays up long enough to be readable.
pub mod loading;

/// Metrics collection for cache observability.
///
/// When the `metrics` feature is enabled, this module provides counters for
/// cache hits, misses and expirations.
pub mod metrics;

/// Cache, slot and loading behavior configuration.
pub mod policy;

/// Single-consumer binding of a cache, a fetcher and a loading gate.
pub mod slot;

pub use cache::ResourceCache;
pub use entry::CacheEntry;
pub use loading::{LoadingGate, LoadingToken};
pub use policy::{DEFAULT_TTL, EmptyKeyPolicy, ExpirationPolicy, LoadingPolicy};
pub use slot::ResourceSlot;

pub use fetchbox_core::{Fetcher, FnFetcher, Resource, ResourceKey, ResourceState};
