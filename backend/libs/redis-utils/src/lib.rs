mod breaker;

pub use breaker::{Breaker, BreakerConfig, BreakerState};

use anyhow::{Context, Result};
use redis::aio::ConnectionManager;
use redis::{Client, RedisError};
use std::future::Future;
use std::time::Duration;
use tokio::sync::OnceCell;
use tokio::time::timeout;
use tracing::{debug, info};

/// Default upper bound for a single Redis command.
pub const DEFAULT_COMMAND_TIMEOUT_MS: u64 = 3_000;

const MIN_COMMAND_TIMEOUT_MS: u64 = 100;

/// Upper bound for a single TCP connect attempt.
const MAX_CONNECT_TIMEOUT_MS: u64 = 1_000;

// One retry after at most 100ms (2 * 50ms, jittered). The breaker handles
// longer outages.
const CONNECT_RETRY_BASE: u64 = 2;
const CONNECT_RETRY_FACTOR_MS: u64 = 50;
const CONNECT_RETRIES: usize = 1;

const CIRCUIT_OPEN_MSG: &str = "redis circuit breaker open";

/// Redis handle that connects on first use.
///
/// Construction only parses the URL. The `ConnectionManager` is created by the
/// first command; when that fails the cell stays empty and the next command
/// tries again, so a service can boot while Redis is still unreachable.
///
/// Connection-level failures feed a [`Breaker`]. Once it opens, commands fail
/// immediately with an error recognised by [`is_circuit_open`] until the
/// cooldown lets a trial command through.
pub struct RedisConnector {
    client: Client,
    manager: OnceCell<ConnectionManager>,
    command_timeout: Duration,
    breaker: Breaker,
}

impl RedisConnector {
    pub fn new(redis_url: &str, command_timeout: Duration) -> Result<Self> {
        let client =
            Client::open(redis_url).context("failed to parse REDIS_URL connection string")?;

        Ok(Self {
            client,
            manager: OnceCell::new(),
            command_timeout: clamp_timeout(command_timeout),
            breaker: Breaker::new(BreakerConfig::default()),
        })
    }

    pub fn with_breaker(mut self, config: BreakerConfig) -> Self {
        self.breaker = Breaker::new(config);
        self
    }

    pub fn breaker_state(&self) -> BreakerState {
        self.breaker.state()
    }

    pub fn command_timeout(&self) -> Duration {
        self.command_timeout
    }

    pub fn is_connected(&self) -> bool {
        self.manager.initialized()
    }

    /// Returns a clone of the shared connection manager, connecting if needed.
    pub async fn connection(&self) -> Result<ConnectionManager, RedisError> {
        let manager = self
            .manager
            .get_or_try_init(|| async {
                let connect_timeout = self
                    .command_timeout
                    .min(Duration::from_millis(MAX_CONNECT_TIMEOUT_MS));
                let manager = run_with_timeout(
                    self.command_timeout,
                    ConnectionManager::new_with_backoff_and_timeouts(
                        self.client.clone(),
                        CONNECT_RETRY_BASE,
                        CONNECT_RETRY_FACTOR_MS,
                        CONNECT_RETRIES,
                        Duration::MAX,
                        connect_timeout,
                    ),
                )
                .await?;
                info!("Redis connection manager initialized");
                Ok::<_, RedisError>(manager)
            })
            .await?;

        Ok(manager.clone())
    }

    /// Runs one command against the shared connection under the command timeout.
    ///
    /// Rejected without I/O while the breaker is open.
    pub async fn run<T, F, Fut>(&self, op: F) -> Result<T, RedisError>
    where
        F: FnOnce(ConnectionManager) -> Fut,
        Fut: Future<Output = Result<T, RedisError>>,
    {
        if !self.breaker.allow() {
            return Err(RedisError::from((
                redis::ErrorKind::ClientError,
                CIRCUIT_OPEN_MSG,
            )));
        }

        let result = match self.connection().await {
            Ok(conn) => run_with_timeout(self.command_timeout, op(conn)).await,
            Err(e) => Err(e),
        };

        match &result {
            Err(e) if is_connection_failure(e) => self.breaker.record_failure(),
            // A server-side error still proves Redis is reachable.
            _ => self.breaker.record_success(),
        }
        result
    }

    pub async fn ping(&self) -> Result<(), RedisError> {
        let pong: String = self
            .run(|mut conn| async move { redis::cmd("PING").query_async(&mut conn).await })
            .await?;

        if pong == "PONG" {
            debug!("Redis ping ok");
            Ok(())
        } else {
            Err(RedisError::from((
                redis::ErrorKind::ResponseError,
                "unexpected PING response",
            )))
        }
    }
}

fn clamp_timeout(requested: Duration) -> Duration {
    requested.max(Duration::from_millis(MIN_COMMAND_TIMEOUT_MS))
}

/// Bounds a Redis future; an elapsed timer becomes an `IoError`.
pub async fn run_with_timeout<F, T>(limit: Duration, future: F) -> Result<T, RedisError>
where
    F: Future<Output = Result<T, RedisError>>,
{
    match timeout(limit, future).await {
        Ok(res) => res,
        Err(_) => Err(RedisError::from((
            redis::ErrorKind::IoError,
            "redis command timed out",
        ))),
    }
}

/// True when the error came from `run_with_timeout` giving up.
pub fn is_timeout(err: &RedisError) -> bool {
    err.kind() == redis::ErrorKind::IoError && err.to_string().contains("timed out")
}

/// True when the command was rejected by an open breaker.
pub fn is_circuit_open(err: &RedisError) -> bool {
    err.kind() == redis::ErrorKind::ClientError && err.to_string().contains(CIRCUIT_OPEN_MSG)
}

fn is_connection_failure(err: &RedisError) -> bool {
    err.is_io_error() || err.is_unrecoverable_error()
}
