#![warn(missing_docs)]
//! # fetchbox-core
//!
//! Core types for the fetchbox asynchronous resource cache.
//!
//! The central abstraction is the [`Resource`]: a handle to an asynchronous
//! computation that can be **read synchronously** at any moment through
//! [`Resource::peek`]. A peek never blocks and never panics; it reports one
//! of three states ([`ResourceState`]):
//!
//! - `Pending`: the computation has not settled yet
//! - `Ready(&T)`: the computation produced a value
//! - `Failed(&E)`: the computation produced an error
//!
//! A resource settles **exactly once** and never changes state afterwards.
//! Consumers that need to react to settlement instead of polling await
//! [`Resource::settled`].
//!
//! The other types here support the cache layer built on top:
//!
//! - [`ResourceKey`]: normalized (case-folded, non-empty) cache key
//! - [`Fetcher`]: the adapter trait that loads a payload for a key
//!
//! ## Feature Flags
//!
//! - `test-helpers` - Manually settleable resources for deterministic tests
//!

pub mod fetcher;
pub mod key;
pub mod resource;
pub mod state;

pub use fetcher::{Fetcher, FnFetcher};
pub use key::ResourceKey;
pub use resource::Resource;
#[cfg(any(test, feature = "test-helpers"))]
pub use resource::SettleHandle;
pub use state::ResourceState;
#[doc(hidden)]
pub use smol_str::SmolStr;
