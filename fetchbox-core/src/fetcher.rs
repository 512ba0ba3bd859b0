//! Fetch adapter seam.
//!
//! A [`Fetcher`] turns a [`ResourceKey`] into a payload. The cache layer
//! treats it as completely opaque: no retries, no validation, no rate
//! limiting happen on the cache side, and whatever error the fetcher
//! returns travels through the resource verbatim.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::key::ResourceKey;

/// Loads the payload for a normalized key.
///
/// Implementations are usually thin clients over some upstream source. The
/// cache invokes `fetch` at most once per live key; deduplication of
/// concurrent lookups happens before the fetcher is reached.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use fetchbox_core::{Fetcher, ResourceKey};
///
/// struct Lookup;
///
/// #[async_trait]
/// impl Fetcher for Lookup {
///     type Payload = String;
///     type Error = String;
///
///     async fn fetch(&self, key: ResourceKey) -> Result<String, String> {
///         Ok(format!("payload for {key}"))
///     }
/// }
/// ```
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// The value produced for a key.
    type Payload: Send + Sync + 'static;
    /// The error produced when loading fails.
    type Error: Send + Sync + 'static;

    /// Loads the payload for `key`.
    async fn fetch(&self, key: ResourceKey) -> Result<Self::Payload, Self::Error>;
}

/// Adapts a plain async closure into a [`Fetcher`].
///
/// Handy for tests and for one-off lookups where a dedicated adapter type
/// would be noise.
#[derive(Clone)]
pub struct FnFetcher<F> {
    f: F,
}

impl<F> FnFetcher<F> {
    /// Wraps `f` as a fetcher.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut, T, E> Fetcher for FnFetcher<F>
where
    F: Fn(ResourceKey) -> Fut + Send + Sync,
    Fut: Future<Output = Result<T, E>> + Send,
    T: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    type Payload = T;
    type Error = E;

    async fn fetch(&self, key: ResourceKey) -> Result<T, E> {
        (self.f)(key).await
    }
}

impl<F> fmt::Debug for FnFetcher<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFetcher").finish_non_exhaustive()
    }
}

#[async_trait]
impl<F> Fetcher for Arc<F>
where
    F: Fetcher,
{
    type Payload = F::Payload;
    type Error = F::Error;

    async fn fetch(&self, key: ResourceKey) -> Result<Self::Payload, Self::Error> {
        (**self).fetch(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fn_fetcher() {
        let fetcher = FnFetcher::new(|key: ResourceKey| async move {
            Ok::<_, String>(format!("got {key}"))
        });
        let key = ResourceKey::new("Pikachu").unwrap();
        assert_eq!(fetcher.fetch(key).await.unwrap(), "got pikachu");
    }

    #[tokio::test]
    async fn test_arc_forwards() {
        let fetcher = Arc::new(FnFetcher::new(|key: ResourceKey| async move {
            Ok::<_, String>(key.as_str().len())
        }));
        let key = ResourceKey::new("mew").unwrap();
        assert_eq!(fetcher.fetch(key).await.unwrap(), 3);
    }
}
