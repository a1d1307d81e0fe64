//! Key-value cache backends
//!
//! Provides a byte-oriented cache contract with two implementations:
//! - `RedisCache`: shared Redis, lazily connected, every command time-bounded
//! - `MemoryCache`: in-process map for single-node deployments and tests
//!
//! Both record hit/miss/write/invalidation metrics labelled by key entity
//! (the key segment before the first `:`).

mod error;
mod memory;
mod metrics;
mod redis_backend;

pub use error::{CacheError, CacheResult};
pub use memory::MemoryCache;
pub use metrics::CacheMetrics;
pub use redis_backend::RedisCache;

/// Core cache operations
///
/// Values are opaque bytes; encoding belongs to the caller.
#[async_trait::async_trait]
pub trait CacheBackend: Send + Sync {
    /// Backend name used in logs and metric labels
    fn name(&self) -> &'static str;

    /// Get a value, `None` on miss or expiry
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

    /// Set a value that expires after `ttl_secs`
    async fn set(&self, key: &str, value: &[u8], ttl_secs: u64) -> CacheResult<()>;

    /// Restart the expiry timer of a live key. `false` when the key is absent.
    async fn expire(&self, key: &str, ttl_secs: u64) -> CacheResult<bool>;

    /// Delete keys, returning how many existed
    async fn delete(&self, keys: &[String]) -> CacheResult<usize>;

    /// Liveness probe
    async fn ping(&self) -> CacheResult<()>;
}
