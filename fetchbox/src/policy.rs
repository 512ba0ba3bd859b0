use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Entry lifetime used when a cache does not specify its own.
pub const DEFAULT_TTL: Duration = Duration::from_secs(10);

fn default_ttl() -> Option<Duration> {
    Some(DEFAULT_TTL)
}

fn default_busy_delay() -> Duration {
    Duration::from_millis(300)
}

fn default_busy_min_duration() -> Duration {
    Duration::from_millis(700)
}

/// How long cache entries stay live.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
pub struct ExpirationPolicy {
    /// Time-to-live before a cache entry expires (e.g., "10s", "500ms").
    /// `None` means entries never expire.
    #[serde(default = "default_ttl", with = "humantime_serde")]
    pub ttl: Option<Duration>,
}

impl ExpirationPolicy {
    /// Entries expire `ttl` after creation.
    pub fn after(ttl: Duration) -> Self {
        Self { ttl: Some(ttl) }
    }

    /// Entries never expire.
    pub fn never() -> Self {
        Self { ttl: None }
    }

    /// Deadline for an entry created at `now`.
    ///
    /// An absurdly long ttl saturates to the far future instead of
    /// overflowing.
    pub(crate) fn expires_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let ttl = self.ttl?;
        let delta = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        Some(now.checked_add_signed(delta).unwrap_or(DateTime::<Utc>::MAX_UTC))
    }
}

impl Default for ExpirationPolicy {
    fn default() -> Self {
        Self {
            ttl: Some(DEFAULT_TTL),
        }
    }
}

/// What a slot does with its current resource when the key becomes empty.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Default)]
pub enum EmptyKeyPolicy {
    /// Drop the currently held resource. The consumer sees "nothing
    /// selected" instead of stale results.
    #[default]
    Clear,
    /// Keep showing the previous resource until a non-empty key arrives.
    Retain,
}

/// Timing of the busy indicator managed by a loading gate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
pub struct LoadingPolicy {
    /// Grace period before a running load shows a busy indicator
    /// (e.g., "300ms"). Loads that finish inside it never show one.
    #[serde(default = "default_busy_delay", with = "humantime_serde")]
    pub busy_delay: Duration,
    /// Minimum time a busy indicator stays visible once shown
    /// (e.g., "700ms"), even when the load finishes earlier.
    #[serde(default = "default_busy_min_duration", with = "humantime_serde")]
    pub busy_min_duration: Duration,
}

impl Default for LoadingPolicy {
    fn default() -> Self {
        Self {
            busy_delay: default_busy_delay(),
            busy_min_duration: default_busy_min_duration(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiration_defaults_to_ten_seconds() {
        let policy = ExpirationPolicy::default();
        assert_eq!(policy.ttl, Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_expiration_from_json() {
        let policy: ExpirationPolicy = serde_json::from_str(r#"{"ttl":"30s"}"#).unwrap();
        assert_eq!(policy.ttl, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_expiration_missing_field_uses_default() {
        let policy: ExpirationPolicy = serde_json::from_str("{}").unwrap();
        assert_eq!(policy.ttl, Some(DEFAULT_TTL));
    }

    #[test]
    fn test_expiration_null_means_never() {
        let policy: ExpirationPolicy = serde_json::from_str(r#"{"ttl":null}"#).unwrap();
        assert_eq!(policy, ExpirationPolicy::never());
    }

    #[test]
    fn test_expiration_round_trip() {
        let policy = ExpirationPolicy::after(Duration::from_millis(500));
        let json = serde_json::to_string(&policy).unwrap();
        let back: ExpirationPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(policy, back);
    }

    #[test]
    fn test_expires_at_never() {
        assert_eq!(ExpirationPolicy::never().expires_at(Utc::now()), None);
    }

    #[test]
    fn test_expires_at_adds_ttl() {
        let now = Utc::now();
        let deadline = ExpirationPolicy::after(Duration::from_secs(10))
            .expires_at(now)
            .unwrap();
        assert_eq!(deadline, now + chrono::Duration::seconds(10));
    }

    #[test]
    fn test_loading_defaults() {
        let policy = LoadingPolicy::default();
        assert_eq!(policy.busy_delay, Duration::from_millis(300));
        assert_eq!(policy.busy_min_duration, Duration::from_millis(700));
    }

    #[test]
    fn test_loading_from_json() {
        let policy: LoadingPolicy =
            serde_json::from_str(r#"{"busy_delay":"100ms","busy_min_duration":"1s"}"#).unwrap();
        assert_eq!(policy.busy_delay, Duration::from_millis(100));
        assert_eq!(policy.busy_min_duration, Duration::from_secs(1));
    }

    #[test]
    fn test_empty_key_default_is_clear() {
        assert_eq!(EmptyKeyPolicy::default(), EmptyKeyPolicy::Clear);
    }
}
