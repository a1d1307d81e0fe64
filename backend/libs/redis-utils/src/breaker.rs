/// Connection breaker for the shared Redis handle
///
/// State transitions:
/// - Closed → Open: `failure_threshold` consecutive connection-level failures
/// - Open → HalfOpen: once `cooldown` has elapsed
/// - HalfOpen → Closed: on the first success
/// - HalfOpen → Open: on any failure
///
/// While open, commands are rejected without touching the network.
use parking_lot::Mutex;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug, Clone)]
pub struct BreakerConfig {
    /// Consecutive failures that open the breaker
    pub failure_threshold: u32,
    /// How long an open breaker rejects commands before letting one through
    pub cooldown: Duration,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            cooldown: Duration::from_secs(5),
        }
    }
}

struct Inner {
    state: BreakerState,
    consecutive_failures: u32,
    opened_at: Option<Instant>,
}

pub struct Breaker {
    config: BreakerConfig,
    inner: Mutex<Inner>,
}

impl Breaker {
    pub fn new(config: BreakerConfig) -> Self {
        Self {
            config: BreakerConfig {
                failure_threshold: config.failure_threshold.max(1),
                ..config
            },
            inner: Mutex::new(Inner {
                state: BreakerState::Closed,
                consecutive_failures: 0,
                opened_at: None,
            }),
        }
    }

    pub fn state(&self) -> BreakerState {
        self.inner.lock().state
    }

    /// False while the breaker is open and still cooling down.
    pub fn allow(&self) -> bool {
        let mut inner = self.inner.lock();
        match inner.state {
            BreakerState::Closed | BreakerState::HalfOpen => true,
            BreakerState::Open => {
                let cooled = inner
                    .opened_at
                    .map_or(true, |at| at.elapsed() >= self.config.cooldown);
                if cooled {
                    info!("Redis breaker: Open → HalfOpen");
                    inner.state = BreakerState::HalfOpen;
                }
                cooled
            }
        }
    }

    pub fn record_success(&self) {
        let mut inner = self.inner.lock();
        inner.consecutive_failures = 0;
        if inner.state != BreakerState::Closed {
            info!("Redis breaker: {:?} → Closed", inner.state);
            inner.state = BreakerState::Closed;
            inner.opened_at = None;
        }
    }

    pub fn record_failure(&self) {
        let mut inner = self.inner.lock();
        inner.consecutive_failures += 1;

        let trip = match inner.state {
            BreakerState::Closed => inner.consecutive_failures >= self.config.failure_threshold,
            BreakerState::HalfOpen => true,
            BreakerState::Open => false,
        };
        if trip {
            warn!(
                failures = inner.consecutive_failures,
                cooldown_ms = self.config.cooldown.as_millis() as u64,
                "Redis breaker: {:?} → Open",
                inner.state
            );
            inner.state = BreakerState::Open;
            inner.opened_at = Some(Instant::now());
        }
    }
}
