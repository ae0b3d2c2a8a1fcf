//! Timestamped response cache over the key-value store
//!
//! Entries are written with the moment of storage, never the request moment,
//! and are only ever overwritten or ignored; expiry is evaluated lazily at
//! read time against the caller's policy. Store failures are logged and
//! collapsed to misses at the public boundary.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::store::{KvStore, StoreError};

/// Store key namespace for cache entries
const CACHE_KEY_PREFIX: &str = "cache_";

/// How a lookup treats an entry's age
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Never read or write the cache; every call is a live fetch
    Bypass,
    /// An entry is usable while its age does not exceed the given TTL
    MaxAge(Duration),
    /// An entry is usable regardless of age; the caller decides when to
    /// refresh. This is the explicit semantic for "no TTL given".
    Indefinite,
}

/// One cached payload with its storage timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Epoch milliseconds at the moment the value was stored
    pub timestamp: i64,
    /// The cached response body
    pub data: serde_json::Value,
}

/// Response cache layered over the persistent store
///
/// Keys are opaque hex digests produced by [`crate::fetch::cache_key`] and
/// friends; the cache itself never inspects them beyond prefixing for the
/// store namespace.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    store: KvStore,
}

impl ResponseCache {
    /// Wraps the given store
    pub fn new(store: KvStore) -> Self {
        Self { store }
    }

    fn store_key(key: &str) -> String {
        format!("{}{}", CACHE_KEY_PREFIX, key)
    }

    fn read_entry(&self, key: &str) -> Result<Option<CacheEntry>, StoreError> {
        self.store.load(&Self::store_key(key))
    }

    /// Looks up a usable entry for the key under the given policy
    ///
    /// Returns `None` for absent entries, entries older than a `MaxAge` TTL,
    /// any lookup under `Bypass`, and any underlying store failure (fail-open:
    /// a transient storage problem must never block data loading).
    pub fn get(&self, key: &str, policy: CachePolicy) -> Option<serde_json::Value> {
        let ttl = match policy {
            CachePolicy::Bypass => return None,
            CachePolicy::MaxAge(ttl) => Some(ttl),
            CachePolicy::Indefinite => None,
        };

        let entry = match self.read_entry(key) {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                debug!(key, "cache miss");
                return None;
            }
            Err(e) => {
                warn!(key, error = %e, "cache read failed, treating as miss");
                return None;
            }
        };

        if let Some(ttl) = ttl {
            let age = Self::age_of(&entry);
            if age > ttl {
                debug!(key, age_ms = age.as_millis() as u64, "cache entry stale");
                return None;
            }
        }
        debug!(key, "cache hit");
        Some(entry.data)
    }

    /// Unconditionally (over)writes the entry with the current timestamp
    ///
    /// Write failures are logged and swallowed: a successful fetch must not
    /// fail because the cache could not be updated.
    pub fn set(&self, key: &str, data: &serde_json::Value) {
        let entry = CacheEntry {
            timestamp: Utc::now().timestamp_millis(),
            data: data.clone(),
        };
        if let Err(e) = self.store.save(&Self::store_key(key), &entry) {
            warn!(key, error = %e, "cache write failed");
        }
    }

    /// Elapsed time since the entry was stored, or `None` if absent
    pub fn age(&self, key: &str) -> Option<Duration> {
        match self.read_entry(key) {
            Ok(Some(entry)) => Some(Self::age_of(&entry)),
            Ok(None) => None,
            Err(e) => {
                warn!(key, error = %e, "cache read failed, treating as absent");
                None
            }
        }
    }

    /// True when the entry is absent or older than the TTL
    pub fn is_stale(&self, key: &str, ttl: Duration) -> bool {
        match self.age(key) {
            Some(age) => age > ttl,
            None => true,
        }
    }

    fn age_of(entry: &CacheEntry) -> Duration {
        let elapsed_ms = Utc::now().timestamp_millis().saturating_sub(entry.timestamp);
        Duration::from_millis(elapsed_ms.max(0) as u64)
    }
}
