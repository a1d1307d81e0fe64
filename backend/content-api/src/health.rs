/// Health, readiness and liveness endpoints
///
/// PostgreSQL is required for readiness. The cache is reported but only ever
/// degrades the status, since content reads fall back to the store.
use actix_web::{web, HttpResponse};
use chrono::Utc;
use kv_cache::{CacheBackend, CacheError};
use serde::Serialize;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

pub struct HealthState {
    db_pool: PgPool,
    cache: Arc<dyn CacheBackend>,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Serialize)]
pub struct ComponentCheck {
    pub status: ComponentStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub status: ComponentStatus,
    pub checks: HashMap<String, ComponentCheck>,
    pub timestamp: String,
}

impl HealthState {
    pub fn new(db_pool: PgPool, cache: Arc<dyn CacheBackend>) -> Self {
        Self { db_pool, cache }
    }

    async fn check_postgres(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.db_pool)
            .await
            .map(|_| ())
    }

    async fn check_cache(&self) -> Result<(), CacheError> {
        self.cache.ping().await
    }

    /// Probe every component
    pub async fn readiness(&self) -> ReadinessResponse {
        let mut checks = HashMap::new();

        let start = Instant::now();
        let pg_result = self.check_postgres().await;
        let pg_latency = Some(start.elapsed().as_millis() as u64);
        let ready = pg_result.is_ok();
        checks.insert(
            "postgresql".to_string(),
            match pg_result {
                Ok(_) => ComponentCheck {
                    status: ComponentStatus::Healthy,
                    message: "PostgreSQL connection successful".to_string(),
                    latency_ms: pg_latency,
                },
                Err(e) => ComponentCheck {
                    status: ComponentStatus::Unhealthy,
                    message: format!("PostgreSQL connection failed: {}", e),
                    latency_ms: pg_latency,
                },
            },
        );

        let start = Instant::now();
        let cache_result = self.check_cache().await;
        let cache_latency = Some(start.elapsed().as_millis() as u64);
        let cache_ok = cache_result.is_ok();
        checks.insert(
            "cache".to_string(),
            match cache_result {
                Ok(_) => ComponentCheck {
                    status: ComponentStatus::Healthy,
                    message: format!("{} cache ping successful", self.cache.name()),
                    latency_ms: cache_latency,
                },
                Err(e) => ComponentCheck {
                    status: ComponentStatus::Degraded,
                    message: format!(
                        "{} cache ping failed, serving from store: {}",
                        self.cache.name(),
                        e
                    ),
                    latency_ms: cache_latency,
                },
            },
        );

        let status = match (ready, cache_ok) {
            (false, _) => ComponentStatus::Unhealthy,
            (true, false) => ComponentStatus::Degraded,
            (true, true) => ComponentStatus::Healthy,
        };

        ReadinessResponse {
            ready,
            status,
            checks,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

pub async fn health_summary(state: web::Data<HealthState>) -> HttpResponse {
    match state.check_postgres().await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "content-api",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("PostgreSQL connection failed: {}", e),
            "service": "content-api"
        })),
    }
}

pub async fn readiness_summary(state: web::Data<HealthState>) -> HttpResponse {
    let response = state.readiness().await;
    if response.ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

pub async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}

pub fn configure_health(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/v1/health", web::get().to(health_summary))
        .route("/api/v1/health/ready", web::get().to(readiness_summary))
        .route("/api/v1/health/live", web::get().to(liveness_check));
}
