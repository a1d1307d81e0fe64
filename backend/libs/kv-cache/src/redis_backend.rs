use crate::{CacheBackend, CacheError, CacheMetrics, CacheResult};
use redis::AsyncCommands;
use redis_utils::RedisConnector;
use std::sync::Arc;
use tracing::{debug, warn};

/// Redis-backed cache
#[derive(Clone)]
pub struct RedisCache {
    connector: Arc<RedisConnector>,
    metrics: CacheMetrics,
}

impl RedisCache {
    pub fn new(connector: Arc<RedisConnector>) -> Self {
        Self {
            connector,
            metrics: CacheMetrics::new("redis"),
        }
    }

    fn fail(&self, key: &str, err: redis::RedisError) -> CacheError {
        let err = CacheError::from(err);
        match &err {
            CacheError::Unavailable(_) => {
                debug!(key = %key, error = %err, "Redis command skipped")
            }
            _ => warn!(key = %key, error = %err, "Redis command failed"),
        }
        self.metrics.record_error(key, err.kind());
        err
    }
}

#[async_trait::async_trait]
impl CacheBackend for RedisCache {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let result = self
            .connector
            .run(|mut conn| async move { conn.get::<_, Option<Vec<u8>>>(key).await })
            .await;

        match result {
            Ok(Some(data)) => {
                debug!(key = %key, "Cache hit");
                self.metrics.record_hit(key);
                Ok(Some(data))
            }
            Ok(None) => {
                debug!(key = %key, "Cache miss");
                self.metrics.record_miss(key);
                Ok(None)
            }
            Err(e) => Err(self.fail(key, e)),
        }
    }

    async fn set(&self, key: &str, value: &[u8], ttl_secs: u64) -> CacheResult<()> {
        let data = value.to_vec();
        self.connector
            .run(|mut conn| async move { conn.set_ex::<_, _, ()>(key, data, ttl_secs).await })
            .await
            .map_err(|e| self.fail(key, e))?;

        debug!(key = %key, ttl = ttl_secs, "Cache set");
        self.metrics.record_write(key);
        Ok(())
    }

    async fn expire(&self, key: &str, ttl_secs: u64) -> CacheResult<bool> {
        let refreshed: bool = self
            .connector
            .run(|mut conn| async move {
                redis::cmd("EXPIRE")
                    .arg(key)
                    .arg(ttl_secs)
                    .query_async::<_, bool>(&mut conn)
                    .await
            })
            .await
            .map_err(|e| self.fail(key, e))?;

        if refreshed {
            self.metrics.record_refresh(key);
        }
        Ok(refreshed)
    }

    async fn delete(&self, keys: &[String]) -> CacheResult<usize> {
        if keys.is_empty() {
            return Ok(0);
        }

        let batch = keys.to_vec();
        let deleted: usize = self
            .connector
            .run(|mut conn| async move { conn.del::<_, usize>(batch).await })
            .await
            .map_err(|e| self.fail(&keys[0], e))?;

        for key in keys {
            self.metrics.record_invalidation(key);
        }
        debug!(count = keys.len(), deleted, "Cache delete");
        Ok(deleted)
    }

    async fn ping(&self) -> CacheResult<()> {
        self.connector.ping().await.map_err(CacheError::from)
    }
}
