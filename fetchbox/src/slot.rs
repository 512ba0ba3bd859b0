use std::fmt;

use fetchbox_core::{Fetcher, Resource};
use tracing::debug;

use crate::cache::ResourceCache;
use crate::loading::{LoadingGate, LoadingToken};
use crate::policy::{EmptyKeyPolicy, LoadingPolicy};

/// Binds a cache, a fetcher and a loading gate for one consumer.
///
/// A slot tracks "the resource for the currently selected key". Setting a
/// key resolves the resource through the cache (starting a fetch only when
/// needed) and drives the gate so [`is_loading`](Self::is_loading) reflects
/// whether a busy indicator belongs on screen:
///
/// - resolving to an already settled resource finishes within the gate's
///   grace period, so cache hits never flash an indicator
/// - an empty key applies the configured [`EmptyKeyPolicy`] instead of
///   fetching anything
pub struct ResourceSlot<A: Fetcher> {
    cache: ResourceCache<A::Payload, A::Error>,
    fetcher: A,
    gate: LoadingGate,
    empty_key: EmptyKeyPolicy,
    current: Option<Resource<A::Payload, A::Error>>,
    last_token: Option<LoadingToken>,
}

impl<A: Fetcher> ResourceSlot<A> {
    /// Creates a slot over `cache` using `fetcher`, with default loading
    /// and empty-key behavior.
    pub fn new(cache: ResourceCache<A::Payload, A::Error>, fetcher: A) -> Self {
        Self {
            cache,
            fetcher,
            gate: LoadingGate::default(),
            empty_key: EmptyKeyPolicy::default(),
            current: None,
            last_token: None,
        }
    }

    /// Replaces the empty-key behavior.
    pub fn with_empty_key_policy(mut self, policy: EmptyKeyPolicy) -> Self {
        self.empty_key = policy;
        self
    }

    /// Replaces the loading gate timing.
    pub fn with_loading_policy(mut self, policy: LoadingPolicy) -> Self {
        self.gate = LoadingGate::new(policy);
        self
    }

    /// Selects `raw_key` and resolves its resource through the cache.
    ///
    /// An empty key selects nothing: with [`EmptyKeyPolicy::Clear`] the
    /// current resource is dropped and the in-flight load, if any, stops
    /// counting towards the busy indicator; with [`EmptyKeyPolicy::Retain`]
    /// everything stays as it was.
    ///
    /// # Panics
    ///
    /// Panics when a fetch or a gate watcher must be spawned outside a
    /// Tokio runtime.
    pub fn set_key(&mut self, raw_key: &str)
    where
        A: Clone + 'static,
    {
        match self.cache.fetch_with(raw_key, &self.fetcher) {
            None => match self.empty_key {
                EmptyKeyPolicy::Clear => {
                    debug!("empty key, clearing current resource");
                    self.current = None;
                    if let Some(token) = self.last_token.take() {
                        self.gate.finish(token);
                    }
                }
                EmptyKeyPolicy::Retain => {
                    debug!("empty key, retaining current resource");
                }
            },
            Some(resource) => {
                let token = self.gate.begin();
                self.last_token = Some(token);
                if resource.is_settled() {
                    self.gate.finish(token);
                } else {
                    let gate = self.gate.clone();
                    let watched = resource.clone();
                    tokio::spawn(async move {
                        watched.settled().await;
                        gate.finish(token);
                    });
                }
                self.current = Some(resource);
            }
        }
    }

    /// The resource for the currently selected key, if any.
    pub fn resource(&self) -> Option<&Resource<A::Payload, A::Error>> {
        self.current.as_ref()
    }

    /// Whether a busy indicator should be visible right now.
    pub fn is_loading(&self) -> bool {
        self.gate.is_busy()
    }

    /// The gate driving [`is_loading`](Self::is_loading).
    pub fn gate(&self) -> &LoadingGate {
        &self.gate
    }

    /// The cache this slot resolves through.
    pub fn cache(&self) -> &ResourceCache<A::Payload, A::Error> {
        &self.cache
    }

    /// Drops the current resource without touching the cache.
    pub fn clear(&mut self) {
        self.current = None;
    }
}

impl<A: Fetcher> fmt::Debug for ResourceSlot<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceSlot")
            .field("current", &self.current)
            .field("empty_key", &self.empty_key)
            .finish_non_exhaustive()
    }
}
