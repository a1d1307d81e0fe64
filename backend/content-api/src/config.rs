/// Configuration management for content-api
///
/// All settings come from environment variables; a `.env` file is honoured
/// at startup.
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub cors: CorsConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    pub host: String,
    pub port: u16,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins, `*` for any
    pub allowed_origins: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackendKind {
    Redis,
    Memory,
}

/// Content cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub backend: CacheBackendKind,
    pub redis_url: String,
    pub ttl_secs: u64,
    /// Upper bound for a single Redis command
    pub command_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let is_production = app_env.eq_ignore_ascii_case("production");

        Ok(Config {
            app: AppConfig {
                env: app_env.clone(),
                host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env("APP_PORT", 8000)?,
            },
            cors: {
                let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                    Ok(value) => value,
                    Err(_) if is_production => {
                        return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                    }
                    Err(_) => "*".to_string(),
                };

                if is_production && allowed_origins.trim() == "*" {
                    return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
                }

                CorsConfig { allowed_origins }
            },
            database: DatabaseConfig {
                url: std::env::var("DB_URL")
                    .or_else(|_| std::env::var("DATABASE_URL"))
                    .map_err(|_| "DB_URL or DATABASE_URL must be set".to_string())?,
                max_connections: parse_env("DB_MAX_CONNECTIONS", 10)?,
                min_connections: parse_env("DB_MIN_CONNECTIONS", 1)?,
                acquire_timeout_secs: parse_env("DB_ACQUIRE_TIMEOUT_SECS", 10)?,
            },
            cache: CacheConfig {
                backend: match std::env::var("CACHE_BACKEND") {
                    Err(_) => CacheBackendKind::Redis,
                    Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
                        "redis" => CacheBackendKind::Redis,
                        "memory" => CacheBackendKind::Memory,
                        other => {
                            return Err(format!(
                                "CACHE_BACKEND must be 'redis' or 'memory', got '{}'",
                                other
                            ))
                        }
                    },
                },
                redis_url: std::env::var("REDIS_URL")
                    .unwrap_or_else(|_| "redis://localhost:6379/0".to_string()),
                ttl_secs: match parse_env("CACHE_TTL_SECS", crate::cache::DEFAULT_TTL_SECS)? {
                    0 => return Err("CACHE_TTL_SECS must be greater than zero".to_string()),
                    ttl => ttl,
                },
                command_timeout_ms: parse_env(
                    "REDIS_COMMAND_TIMEOUT_MS",
                    redis_utils::DEFAULT_COMMAND_TIMEOUT_MS,
                )?,
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.app.host, self.app.port)
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T, String> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| format!("{} has an invalid value: '{}'", name, value)),
        Err(_) => Ok(default),
    }
}
