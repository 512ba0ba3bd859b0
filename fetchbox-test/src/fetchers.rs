//! Instrumented fetchers for exercising caches, slots and gates.
//!
//! Every fetcher here counts how often it actually ran, so tests can
//! assert on deduplication instead of timing.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use fetchbox_core::{Fetcher, ResourceKey};
use tokio::sync::watch;

/// Fetcher that answers every key with a clone of one value.
#[derive(Clone, Debug)]
pub struct StaticFetcher<T> {
    value: T,
    calls: Arc<AtomicUsize>,
}

impl<T> StaticFetcher<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of lookups that reached this fetcher, across all clones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<T> Fetcher for StaticFetcher<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Payload = T;
    type Error = String;

    async fn fetch(&self, _key: ResourceKey) -> Result<T, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.value.clone())
    }
}

/// Fetcher that fails its first `failures` calls and succeeds afterwards.
#[derive(Clone, Debug)]
pub struct FlakyFetcher<T> {
    value: T,
    failures: usize,
    calls: Arc<AtomicUsize>,
}

impl<T> FlakyFetcher<T> {
    pub fn new(value: T, failures: usize) -> Self {
        Self {
            value,
            failures,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<T> Fetcher for FlakyFetcher<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Payload = T;
    type Error = String;

    async fn fetch(&self, _key: ResourceKey) -> Result<T, String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            Err(format!("synthetic failure {}", call + 1))
        } else {
            Ok(self.value.clone())
        }
    }
}

/// Fetcher that parks every lookup until [`ManualHandle::release`] runs.
///
/// All pending lookups observe the released outcome, which makes the
/// pending window fully deterministic under a paused clock.
#[derive(Clone, Debug)]
pub struct ManualFetcher<T, E> {
    rx: watch::Receiver<Option<Result<T, E>>>,
    calls: Arc<AtomicUsize>,
}

/// Test-side handle releasing lookups parked in a [`ManualFetcher`].
#[derive(Debug)]
pub struct ManualHandle<T, E> {
    tx: watch::Sender<Option<Result<T, E>>>,
}

/// Creates a parked fetcher and the handle that releases it.
pub fn manual<T, E>() -> (ManualFetcher<T, E>, ManualHandle<T, E>) {
    let (tx, rx) = watch::channel(None);
    (
        ManualFetcher {
            rx,
            calls: Arc::new(AtomicUsize::new(0)),
        },
        ManualHandle { tx },
    )
}

impl<T, E> ManualFetcher<T, E> {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<T, E> ManualHandle<T, E> {
    /// Completes every parked and future lookup with `outcome`.
    pub fn release(&self, outcome: Result<T, E>) {
        self.tx.send_replace(Some(outcome));
    }
}

#[async_trait]
impl<T, E> Fetcher for ManualFetcher<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    type Payload = T;
    type Error = E;

    async fn fetch(&self, _key: ResourceKey) -> Result<T, E> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut rx = self.rx.clone();
        let outcome = {
            let slot = rx
                .wait_for(|slot| slot.is_some())
                .await
                .expect("release handle dropped while a lookup was parked");
            slot.clone()
        };
        outcome.expect("wait_for returns only once the slot is filled")
    }
}
