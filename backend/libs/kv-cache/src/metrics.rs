//! Cache metrics for observability

use prometheus::{CounterVec, Opts, Registry};
use std::sync::OnceLock;

static METRICS: OnceLock<CacheMetricsInner> = OnceLock::new();

struct CacheMetricsInner {
    hits: CounterVec,
    misses: CounterVec,
    writes: CounterVec,
    refreshes: CounterVec,
    invalidations: CounterVec,
    errors: CounterVec,
}

fn counter(name: &str, help: &str, labels: &[&str]) -> CounterVec {
    CounterVec::new(Opts::new(name, help), labels).expect("valid metric definition")
}

impl CacheMetricsInner {
    fn new() -> Self {
        Self {
            hits: counter("kv_cache_hits_total", "Total cache hits", &["backend", "entity"]),
            misses: counter(
                "kv_cache_misses_total",
                "Total cache misses",
                &["backend", "entity"],
            ),
            writes: counter(
                "kv_cache_writes_total",
                "Total cache writes",
                &["backend", "entity"],
            ),
            refreshes: counter(
                "kv_cache_ttl_refreshes_total",
                "Total TTL refreshes on access",
                &["backend", "entity"],
            ),
            invalidations: counter(
                "kv_cache_invalidations_total",
                "Total keys invalidated",
                &["backend", "entity"],
            ),
            errors: counter(
                "kv_cache_errors_total",
                "Total cache errors",
                &["backend", "entity", "error_type"],
            ),
        }
    }

    fn register(&self, registry: &Registry) -> Result<(), prometheus::Error> {
        registry.register(Box::new(self.hits.clone()))?;
        registry.register(Box::new(self.misses.clone()))?;
        registry.register(Box::new(self.writes.clone()))?;
        registry.register(Box::new(self.refreshes.clone()))?;
        registry.register(Box::new(self.invalidations.clone()))?;
        registry.register(Box::new(self.errors.clone()))?;
        Ok(())
    }
}

fn get_metrics() -> &'static CacheMetricsInner {
    METRICS.get_or_init(CacheMetricsInner::new)
}

/// Entity label for a key: the segment before the first `:`.
pub(crate) fn extract_entity(key: &str) -> &str {
    key.split(':').next().filter(|s| !s.is_empty()).unwrap_or("unknown")
}

/// Cache metrics recorder, labelled with the backend that emits them
#[derive(Clone, Copy)]
pub struct CacheMetrics {
    backend: &'static str,
}

impl CacheMetrics {
    pub fn new(backend: &'static str) -> Self {
        Self { backend }
    }

    /// Register metrics with a Prometheus registry
    pub fn register(registry: &Registry) -> Result<(), prometheus::Error> {
        get_metrics().register(registry)
    }

    pub fn record_hit(&self, key: &str) {
        get_metrics()
            .hits
            .with_label_values(&[self.backend, extract_entity(key)])
            .inc();
    }

    pub fn record_miss(&self, key: &str) {
        get_metrics()
            .misses
            .with_label_values(&[self.backend, extract_entity(key)])
            .inc();
    }

    pub fn record_write(&self, key: &str) {
        get_metrics()
            .writes
            .with_label_values(&[self.backend, extract_entity(key)])
            .inc();
    }

    pub fn record_refresh(&self, key: &str) {
        get_metrics()
            .refreshes
            .with_label_values(&[self.backend, extract_entity(key)])
            .inc();
    }

    pub fn record_invalidation(&self, key: &str) {
        get_metrics()
            .invalidations
            .with_label_values(&[self.backend, extract_entity(key)])
            .inc();
    }

    pub fn record_error(&self, key: &str, error_type: &str) {
        get_metrics()
            .errors
            .with_label_values(&[self.backend, extract_entity(key), error_type])
            .inc();
    }
}
