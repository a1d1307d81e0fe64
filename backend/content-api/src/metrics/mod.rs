//! Prometheus metrics for content-api.
//!
//! Cache collectors live in `kv-cache` and are registered on the default
//! registry at startup; this module only renders them.

use actix_web::HttpResponse;
use prometheus::{Encoder, TextEncoder};

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
