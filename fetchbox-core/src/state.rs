//! Synchronous view of a resource.
//!
//! [`ResourceState`] is what a [`Resource::peek`](crate::Resource::peek)
//! returns: an explicit, data-carrying description of where the underlying
//! computation currently stands. There is no control-flow trick involved;
//! callers match on the three variants and decide what to render, retry or
//! report.

/// Observed state of a resource at a single point in time.
///
/// A resource moves from `Pending` to exactly one of `Ready` or `Failed`
/// and then never changes again. Peeking after settlement therefore always
/// reproduces the same variant with the same value or error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceState<T, E> {
    /// The computation has not settled yet.
    Pending,
    /// The computation settled with a value.
    Ready(T),
    /// The computation settled with an error. Every subsequent peek
    /// reports the same error.
    Failed(E),
}

impl<T, E> ResourceState<T, E> {
    /// Returns `true` while the computation is still in flight.
    #[inline]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns `true` once the computation settled with a value.
    #[inline]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Returns `true` once the computation settled with an error.
    #[inline]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Returns the value if the state is `Ready`.
    pub fn ready(self) -> Option<T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the error if the state is `Failed`.
    pub fn failed(self) -> Option<E> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }

    /// Converts a settled state into a `Result`, `None` while pending.
    pub fn into_result(self) -> Option<Result<T, E>> {
        match self {
            Self::Pending => None,
            Self::Ready(value) => Some(Ok(value)),
            Self::Failed(error) => Some(Err(error)),
        }
    }

    /// Maps the value of a `Ready` state, leaving other states untouched.
    pub fn map<U, F>(self, f: F) -> ResourceState<U, E>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Pending => ResourceState::Pending,
            Self::Ready(value) => ResourceState::Ready(f(value)),
            Self::Failed(error) => ResourceState::Failed(error),
        }
    }

    /// Maps the error of a `Failed` state, leaving other states untouched.
    pub fn map_err<U, F>(self, f: F) -> ResourceState<T, U>
    where
        F: FnOnce(E) -> U,
    {
        match self {
            Self::Pending => ResourceState::Pending,
            Self::Ready(value) => ResourceState::Ready(value),
            Self::Failed(error) => ResourceState::Failed(f(error)),
        }
    }
}

impl<T, E> From<Result<T, E>> for ResourceState<T, E> {
    #[inline]
    fn from(outcome: Result<T, E>) -> Self {
        match outcome {
            Ok(value) => Self::Ready(value),
            Err(error) => Self::Failed(error),
        }
    }
}

impl<'a, T, E> From<&'a Result<T, E>> for ResourceState<&'a T, &'a E> {
    #[inline]
    fn from(outcome: &'a Result<T, E>) -> Self {
        match outcome {
            Ok(value) => Self::Ready(value),
            Err(error) => Self::Failed(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates() {
        let pending: ResourceState<u32, String> = ResourceState::Pending;
        let ready: ResourceState<u32, String> = ResourceState::Ready(7);
        let failed: ResourceState<u32, String> = ResourceState::Failed("boom".into());

        assert!(pending.is_pending());
        assert!(ready.is_ready());
        assert!(failed.is_failed());
        assert!(!ready.is_pending());
    }

    #[test]
    fn test_accessors() {
        let ready: ResourceState<u32, String> = ResourceState::Ready(7);
        assert_eq!(ready.ready(), Some(7));

        let failed: ResourceState<u32, String> = ResourceState::Failed("boom".into());
        assert_eq!(failed.failed(), Some("boom".into()));

        let pending: ResourceState<u32, String> = ResourceState::Pending;
        assert_eq!(pending.into_result(), None);
    }

    #[test]
    fn test_map() {
        let ready: ResourceState<u32, String> = ResourceState::Ready(7);
        assert_eq!(ready.map(|v| v * 2), ResourceState::Ready(14));

        let pending: ResourceState<u32, String> = ResourceState::Pending;
        assert_eq!(pending.map(|v| v * 2), ResourceState::Pending);
    }

    #[test]
    fn test_from_result_reference() {
        let outcome: Result<u32, String> = Ok(3);
        let state = ResourceState::from(&outcome);
        assert_eq!(state, ResourceState::Ready(&3));
    }
}
