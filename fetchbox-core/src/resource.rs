//! Settle-once resource handles.
//!
//! A [`Resource`] wraps one asynchronous computation and makes its outcome
//! observable in two ways:
//!
//! - **synchronously**, via [`Resource::peek`], which never blocks and
//!   reports [`ResourceState::Pending`] until the computation settles
//! - **asynchronously**, via [`Resource::settled`] / [`Resource::get`],
//!   which complete when the outcome is available
//!
//! ## Identity
//!
//! Cloning a resource is cheap and every clone observes the same outcome.
//! Equality is *identity*: two handles compare equal exactly when they were
//! cloned from the same original. A cache that hands out the same resource
//! for repeated lookups of one key can therefore be verified with a plain
//! `assert_eq!`.
//!
//! ## Settlement
//!
//! A resource settles exactly once, moving from pending to ready or failed,
//! and never changes afterwards. Late settle attempts are ignored. A fetch
//! future that never completes (or panics) leaves its resource pending
//! forever, the same way an abandoned in-flight request would.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, OnceLock};

use tokio::sync::watch;
use tracing::{Instrument, debug, debug_span};

use crate::state::ResourceState;

const SETTLED_WITHOUT_OUTCOME: &str = "resource settled without a stored outcome";
const SETTLE_CHANNEL_CLOSED: &str = "settle channel closed while the resource was alive";

struct ResourceInner<T, E> {
    cell: OnceLock<Result<T, E>>,
    settled_tx: watch::Sender<bool>,
}

/// Handle to an in-flight or settled asynchronous computation.
///
/// Created by [`Resource::spawn`] (which drives the given future on the
/// Tokio runtime immediately) or pre-settled via [`Resource::ready`] and
/// [`Resource::failed`].
///
/// # Example
/// ```
/// use fetchbox_core::{Resource, ResourceState};
///
/// let resource: Resource<u32, String> = Resource::ready(7);
/// assert_eq!(resource.peek(), ResourceState::Ready(&7));
/// assert!(resource.is_settled());
/// ```
pub struct Resource<T, E> {
    inner: Arc<ResourceInner<T, E>>,
}

impl<T, E> Resource<T, E>
where
    T: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Starts driving `future` on the current Tokio runtime and returns a
    /// handle to its eventual outcome.
    ///
    /// The future starts running immediately; callers peek or await the
    /// returned handle whenever they are ready for the result. Dropping
    /// every handle does not cancel the computation, it merely discards
    /// the outcome.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    ///
    /// # Example
    /// ```ignore
    /// let resource = Resource::spawn(async move { fetch_creature("pikachu").await });
    /// match resource.peek() {
    ///     ResourceState::Pending => render_placeholder(),
    ///     ResourceState::Ready(creature) => render(creature),
    ///     ResourceState::Failed(error) => render_error(error),
    /// }
    /// ```
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        let resource = Self::unsettled();
        let settler = resource.clone();
        let span = debug_span!("resource_task");
        tokio::spawn(
            async move {
                let outcome = future.await;
                settler.settle(outcome);
            }
            .instrument(span),
        );
        resource
    }
}

impl<T, E> Resource<T, E> {
    fn unsettled() -> Self {
        let (settled_tx, _settled_rx) = watch::channel(false);
        Self {
            inner: Arc::new(ResourceInner {
                cell: OnceLock::new(),
                settled_tx,
            }),
        }
    }

    /// Creates a resource that is already settled with `value`.
    pub fn ready(value: T) -> Self {
        let resource = Self::unsettled();
        resource.settle(Ok(value));
        resource
    }

    /// Creates a resource that is already settled with `error`.
    pub fn failed(error: E) -> Self {
        let resource = Self::unsettled();
        resource.settle(Err(error));
        resource
    }

    /// Stores the outcome and notifies waiters. Returns `false` when the
    /// resource was already settled, in which case the outcome is dropped.
    fn settle(&self, outcome: Result<T, E>) -> bool {
        // The outcome lands in the cell before the flag flips, so a waiter
        // woken through the watch channel always finds it populated.
        let stored = self.inner.cell.set(outcome).is_ok();
        if stored {
            self.inner.settled_tx.send_replace(true);
        } else {
            debug!("late settle ignored, resource already settled");
        }
        stored
    }

    /// Reports the current state without blocking.
    ///
    /// Returns [`ResourceState::Pending`] until the resource settles, then
    /// the same `Ready` or `Failed` view on every subsequent call.
    pub fn peek(&self) -> ResourceState<&T, &E> {
        match self.inner.cell.get() {
            None => ResourceState::Pending,
            Some(outcome) => ResourceState::from(outcome),
        }
    }

    /// Returns `true` once the resource settled.
    pub fn is_settled(&self) -> bool {
        self.inner.cell.get().is_some()
    }

    /// Completes when the resource settles.
    ///
    /// Completes immediately if the resource already settled. Any number of
    /// tasks may wait concurrently.
    pub async fn settled(&self) {
        let mut rx = self.inner.settled_tx.subscribe();
        rx.wait_for(|settled| *settled)
            .await
            .expect(SETTLE_CHANNEL_CLOSED);
    }

    /// Waits for settlement and returns the outcome.
    pub async fn get(&self) -> Result<&T, &E> {
        self.settled().await;
        self.inner
            .cell
            .get()
            .expect(SETTLED_WITHOUT_OUTCOME)
            .as_ref()
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl<T, E> Resource<T, E> {
    /// Creates an unsettled resource together with a handle that settles it.
    ///
    /// Test-only constructor: production resources settle through the future
    /// passed to [`Resource::spawn`].
    pub fn pending() -> (Self, SettleHandle<T, E>) {
        let resource = Self::unsettled();
        let handle = SettleHandle {
            resource: resource.clone(),
        };
        (resource, handle)
    }
}

impl<T, E> Clone for Resource<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T, E> PartialEq for Resource<T, E> {
    /// Identity comparison: clones of one resource are equal, independently
    /// created resources are not, even when their outcomes coincide.
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T, E> Eq for Resource<T, E> {}

impl<T, E> fmt::Debug for Resource<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.inner.cell.get() {
            None => "pending",
            Some(Ok(_)) => "ready",
            Some(Err(_)) => "failed",
        };
        f.debug_struct("Resource").field("state", &state).finish()
    }
}

/// Settles the paired [`Resource`] on demand.
///
/// Returned by [`Resource::pending`]. Both methods report whether the call
/// actually settled the resource; later calls return `false` and change
/// nothing.
#[cfg(any(test, feature = "test-helpers"))]
pub struct SettleHandle<T, E> {
    resource: Resource<T, E>,
}

#[cfg(any(test, feature = "test-helpers"))]
impl<T, E> SettleHandle<T, E> {
    /// Settles the resource with a value.
    pub fn resolve(&self, value: T) -> bool {
        self.resource.settle(Ok(value))
    }

    /// Settles the resource with an error.
    pub fn reject(&self, error: E) -> bool {
        self.resource.settle(Err(error))
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl<T, E> fmt::Debug for SettleHandle<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettleHandle").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_spawn_settles_ready() {
        let resource: Resource<u32, String> = Resource::spawn(async { Ok(7) });
        resource.settled().await;
        assert_eq!(resource.peek(), ResourceState::Ready(&7));
        assert!(resource.is_settled());
    }

    #[tokio::test]
    async fn test_spawn_settles_failed() {
        let resource: Resource<u32, String> = Resource::spawn(async { Err("boom".to_string()) });
        assert_eq!(resource.get().await, Err(&"boom".to_string()));
        // The same error is visible on every later peek.
        assert!(resource.peek().is_failed());
        assert_eq!(resource.peek(), ResourceState::Failed(&"boom".to_string()));
    }

    #[tokio::test]
    async fn test_pending_peek() {
        let (resource, _handle) = Resource::<u32, String>::pending();
        assert!(resource.peek().is_pending());
        assert!(!resource.is_settled());
    }

    #[tokio::test]
    async fn test_resolve_wakes_waiter() {
        let (resource, handle) = Resource::<u32, String>::pending();
        let waiter = resource.clone();
        let join = tokio::spawn(async move {
            waiter.settled().await;
            waiter.peek().ready().copied()
        });
        assert!(handle.resolve(5));
        assert_eq!(join.await.unwrap(), Some(5));
    }

    #[tokio::test]
    async fn test_settles_only_once() {
        let (resource, handle) = Resource::<u32, String>::pending();
        assert!(handle.resolve(1));
        assert!(!handle.resolve(2));
        assert!(!handle.reject("late".to_string()));
        assert_eq!(resource.peek(), ResourceState::Ready(&1));
    }

    #[tokio::test]
    async fn test_settled_is_immediate_after_settlement() {
        let resource: Resource<u32, String> = Resource::ready(3);
        resource.settled().await;
        assert_eq!(resource.get().await, Ok(&3));
    }

    #[tokio::test]
    async fn test_multiple_waiters_observe_one_outcome() {
        let (resource, handle) = Resource::<u32, String>::pending();
        let tasks: Vec<_> = (0..4)
            .map(|_| {
                let waiter = resource.clone();
                tokio::spawn(
                    async move { waiter.get().await.map(|v| *v).map_err(|e| e.clone()) },
                )
            })
            .collect();
        handle.resolve(9);
        for task in tasks {
            assert_eq!(task.await.unwrap(), Ok(9));
        }
    }

    #[test]
    fn test_clones_share_identity() {
        let a: Resource<u32, String> = Resource::ready(1);
        let b = a.clone();
        assert_eq!(a, b);

        // Same outcome, different resource.
        let c: Resource<u32, String> = Resource::ready(1);
        assert_ne!(a, c);
    }

    #[test]
    fn test_failed_constructor() {
        let resource: Resource<u32, String> = Resource::failed("nope".to_string());
        assert_eq!(resource.peek().failed().map(String::as_str), Some("nope"));
    }

    #[test]
    fn test_debug_reports_state() {
        let (pending, handle) = Resource::<u32, String>::pending();
        assert!(format!("{:?}", pending).contains("pending"));
        handle.resolve(1);
        assert!(format!("{:?}", pending).contains("ready"));
    }
}
