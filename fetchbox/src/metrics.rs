//! Metrics declaration and initialization.

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
lazy_static! {
    /// Track number of cache hit events.
    pub static ref CACHE_HIT_COUNTER: &'static str = {
        metrics::describe_counter!(
            "fetchbox_cache_hit_total",
            "Total number of cache hit events."
        );
        "fetchbox_cache_hit_total"
    };
    /// Track number of cache miss events.
    pub static ref CACHE_MISS_COUNTER: &'static str = {
        metrics::describe_counter!(
            "fetchbox_cache_miss_total",
            "Total number of cache miss events."
        );
        "fetchbox_cache_miss_total"
    };
    /// Track number of expired entries replaced by a fresh fetch.
    pub static ref CACHE_EXPIRED_COUNTER: &'static str = {
        metrics::describe_counter!(
            "fetchbox_cache_expired_total",
            "Total number of expired cache entries replaced by a fresh fetch."
        );
        "fetchbox_cache_expired_total"
    };
}
