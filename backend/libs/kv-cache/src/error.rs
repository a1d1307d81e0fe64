//! Cache error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(redis::RedisError),

    #[error("Cache command timed out")]
    Timeout,

    #[error("Cache unavailable: {0}")]
    Unavailable(String),
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        if redis_utils::is_timeout(&err) {
            CacheError::Timeout
        } else if redis_utils::is_circuit_open(&err) {
            CacheError::Unavailable("circuit breaker open".to_string())
        } else {
            CacheError::Redis(err)
        }
    }
}

impl CacheError {
    /// Short label used for the `error_type` metric dimension.
    pub fn kind(&self) -> &'static str {
        match self {
            CacheError::Redis(_) => "redis",
            CacheError::Timeout => "timeout",
            CacheError::Unavailable(_) => "unavailable",
        }
    }
}

pub type CacheResult<T> = Result<T, CacheError>;
