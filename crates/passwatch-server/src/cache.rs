//! TTL eviction helpers for the summary cache.

use dashmap::DashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

pub trait TtlEntry {
    fn fetched_at(&self) -> Instant;
}

/// Removes entries older than `max_age`. The key space is bounded by the
/// static pass catalog, so expiry is the only eviction pressure.
pub fn prune_expired<K, V>(cache: &DashMap<K, V>, max_age: Duration)
where
    K: Clone + Eq + Hash,
    V: TtlEntry,
{
    let now = Instant::now();
    let expired: Vec<K> = cache
        .iter()
        .filter(|entry| now.duration_since(entry.value().fetched_at()) > max_age)
        .map(|entry| entry.key().clone())
        .collect();

    for key in expired {
        cache.remove(&key);
    }
}
