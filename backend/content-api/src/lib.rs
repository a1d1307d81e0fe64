/// Content API Library
///
/// User signup and content posting over PostgreSQL, with content reads served
/// through a time-bounded read-through cache.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers
/// - `models`: Rows, projections and request bodies
/// - `services`: Business logic; the content cache policy lives here
/// - `db`: Store traits and PostgreSQL repositories
/// - `cache`: Content cache keys and the fail-open cache wrapper
/// - `error`: Error types and HTTP mapping
/// - `config`: Configuration management
/// - `health`: Health and readiness probes
/// - `metrics`: Prometheus endpoint
pub mod app_state;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod health;
pub mod metrics;
pub mod models;
pub mod openapi;
pub mod routes;
pub mod services;
pub mod validators;

pub use app_state::AppState;
pub use config::Config;
pub use error::{AppError, Result};
