/// Content caching layer
///
/// This module provides:
/// - The content cache key schema
/// - A typed, fail-open wrapper over a `CacheBackend`
///
/// Cache errors never reach callers: a failed read is a miss, a failed write
/// or invalidation is logged and dropped.
use kv_cache::CacheBackend;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Default TTL for every content key (seconds)
pub const DEFAULT_TTL_SECS: u64 = 600;

/// Content cache keys
pub struct CacheKey;

impl CacheKey {
    /// Snapshot of every content row
    pub const ALL_CONTENTS: &'static str = "all_contents";

    /// Snapshot of every content row joined with its owner
    pub const CONTENT_WITH_USER_ALL: &'static str = "content_with_user:all";

    pub fn content(id: i64) -> String {
        format!("content:{}", id)
    }

    /// Every collection snapshot key. Any content or user write drops all of them.
    pub fn collections() -> Vec<String> {
        vec![
            Self::ALL_CONTENTS.to_string(),
            Self::CONTENT_WITH_USER_ALL.to_string(),
        ]
    }
}

/// Typed read-through cache for content
#[derive(Clone)]
pub struct ContentCache {
    backend: Arc<dyn CacheBackend>,
    ttl_secs: u64,
}

impl ContentCache {
    pub fn new(backend: Arc<dyn CacheBackend>, ttl_secs: u64) -> Self {
        Self { backend, ttl_secs }
    }

    /// Look up a key. A hit restarts the key's TTL.
    ///
    /// Returns `None` on miss, backend error, or an undecodable payload
    /// (which is also deleted).
    pub async fn fetch<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let bytes = match self.backend.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!(key = %key, "Content cache MISS");
                return None;
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Cache read failed, falling back to store");
                return None;
            }
        };

        match serde_json::from_slice::<T>(&bytes) {
            Ok(value) => {
                debug!(key = %key, "Content cache HIT");
                if let Err(e) = self.backend.expire(key, self.ttl_secs).await {
                    debug!(key = %key, error = %e, "Failed to refresh cache TTL");
                }
                Some(value)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Dropping undecodable cache entry");
                if let Err(e) = self.backend.delete(&[key.to_string()]).await {
                    debug!(key = %key, error = %e, "Failed to drop undecodable cache entry");
                }
                None
            }
        }
    }

    /// Populate a key with the configured TTL
    pub async fn store<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let bytes = match serde_json::to_vec(value) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to encode value for cache");
                return;
            }
        };

        match self.backend.set(key, &bytes, self.ttl_secs).await {
            Ok(()) => debug!(key = %key, ttl = self.ttl_secs, "Content cache WRITE"),
            Err(e) => warn!(key = %key, error = %e, "Cache write failed"),
        }
    }

    /// Drop keys after a store write. Failures are logged, never returned.
    pub async fn invalidate(&self, keys: &[String]) {
        match self.backend.delete(keys).await {
            Ok(deleted) => debug!(keys = ?keys, deleted, "Content cache INVALIDATE"),
            Err(e) => warn!(
                keys = ?keys,
                error = %e,
                "Cache invalidation failed, entries expire with their TTL"
            ),
        }
    }
}
