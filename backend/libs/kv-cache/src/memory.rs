use crate::{CacheBackend, CacheMetrics, CacheResult};
use dashmap::DashMap;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

struct Entry {
    value: Vec<u8>,
    expires_at: Instant,
}

/// In-process cache with per-key expiry
///
/// Expired entries are dropped lazily when touched. Expiry uses the tokio
/// clock, so paused-time tests can advance past a TTL deterministically.
pub struct MemoryCache {
    entries: DashMap<String, Entry>,
    metrics: CacheMetrics,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            metrics: CacheMetrics::new("memory"),
        }
    }

    /// Number of live (unexpired) entries
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .iter()
            .filter(|entry| entry.expires_at > now)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remaining lifetime of a key, if it is live
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        self.entries
            .get(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.expires_at - now)
    }
}

#[async_trait::async_trait]
impl CacheBackend for MemoryCache {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let now = Instant::now();
        let hit = match self.entries.get(key) {
            Some(entry) if entry.expires_at > now => Some(entry.value.clone()),
            _ => None,
        };

        match hit {
            Some(value) => {
                self.metrics.record_hit(key);
                Ok(Some(value))
            }
            None => {
                self.entries.remove_if(key, |_, entry| entry.expires_at <= now);
                self.metrics.record_miss(key);
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: &[u8], ttl_secs: u64) -> CacheResult<()> {
        let expires_at = Instant::now() + Duration::from_secs(ttl_secs);
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_vec(),
                expires_at,
            },
        );
        debug!(key = %key, ttl = ttl_secs, "Cache set");
        self.metrics.record_write(key);
        Ok(())
    }

    async fn expire(&self, key: &str, ttl_secs: u64) -> CacheResult<bool> {
        let now = Instant::now();
        let refreshed = match self.entries.get_mut(key) {
            Some(mut entry) if entry.expires_at > now => {
                entry.expires_at = now + Duration::from_secs(ttl_secs);
                true
            }
            _ => false,
        };

        if refreshed {
            self.metrics.record_refresh(key);
        }
        Ok(refreshed)
    }

    async fn delete(&self, keys: &[String]) -> CacheResult<usize> {
        let now = Instant::now();
        let mut deleted = 0;
        for key in keys {
            if let Some((_, entry)) = self.entries.remove(key) {
                if entry.expires_at > now {
                    deleted += 1;
                }
            }
            self.metrics.record_invalidation(key);
        }
        Ok(deleted)
    }

    async fn ping(&self) -> CacheResult<()> {
        Ok(())
    }
}
