use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use content_api::cache::ContentCache;
use content_api::config::CacheBackendKind;
use content_api::db::{self, PgContentStore, PgUserStore};
use content_api::health::{self, HealthState};
use content_api::openapi::ApiDoc;
use content_api::{routes, AppState, Config};
use kv_cache::{CacheBackend, CacheMetrics, MemoryCache, RedisCache};
use redis_utils::RedisConnector;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into());
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn run_healthcheck() -> io::Result<()> {
    let port = std::env::var("APP_PORT").unwrap_or_else(|_| "8000".to_string());
    let url = format!("http://127.0.0.1:{}/api/v1/health", port);
    match reqwest::Client::new().get(&url).send().await {
        Ok(resp) if resp.status().is_success() => Ok(()),
        Ok(resp) => {
            eprintln!("healthcheck HTTP status: {}", resp.status());
            Err(io::Error::new(io::ErrorKind::Other, "healthcheck failed"))
        }
        Err(e) => {
            eprintln!("healthcheck HTTP error: {}", e);
            Err(io::Error::new(io::ErrorKind::Other, "healthcheck error"))
        }
    }
}

fn build_cache_backend(config: &Config) -> io::Result<Arc<dyn CacheBackend>> {
    match config.cache.backend {
        CacheBackendKind::Redis => {
            let connector = RedisConnector::new(
                &config.cache.redis_url,
                Duration::from_millis(config.cache.command_timeout_ms),
            )
            .map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("Failed to initialize Redis connector: {e:#}"),
                )
            })?;
            tracing::info!(
                timeout_ms = connector.command_timeout().as_millis() as u64,
                "Using Redis content cache"
            );
            Ok(Arc::new(RedisCache::new(Arc::new(connector))))
        }
        CacheBackendKind::Memory => {
            tracing::info!("Using in-process content cache");
            Ok(Arc::new(MemoryCache::new()))
        }
    }
}

/// Content API
///
/// # Routes
///
/// - `/api/v1/signup`, `/api/v1/users/*` - user signup and profiles (store only)
/// - `/api/v1/post-content`, `/api/v1/content/*` - content writes and cached reads
/// - `/api/v1/health*`, `/metrics`, `/swagger-ui/` - operations
///
/// `content-api healthcheck` probes a running instance for container healthchecks.
#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    if std::env::args().nth(1).as_deref() == Some("healthcheck") {
        return run_healthcheck().await;
    }

    init_tracing();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting content-api v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let db_pool = match db::create_pool(&config.database).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database pool creation failed: {:#}", e);
            eprintln!("ERROR: Failed to create database pool: {}", e);
            std::process::exit(1);
        }
    };

    let cache_backend = build_cache_backend(&config)?;
    if let Err(e) = CacheMetrics::register(prometheus::default_registry()) {
        tracing::warn!("Failed to register cache metrics: {}", e);
    }
    match cache_backend.ping().await {
        Ok(()) => tracing::info!("Cache backend reachable"),
        Err(e) => tracing::warn!(
            "Cache backend unreachable at startup, serving content from the store: {}",
            e
        ),
    }

    let content_cache = ContentCache::new(cache_backend.clone(), config.cache.ttl_secs);
    let state = web::Data::new(AppState::new(
        Arc::new(PgUserStore::new(db_pool.clone())),
        Arc::new(PgContentStore::new(db_pool.clone())),
        content_cache,
    ));
    let health_state = web::Data::new(HealthState::new(db_pool.clone(), cache_backend));

    let bind_address = config.bind_address();
    tracing::info!("Starting HTTP server at {}", bind_address);

    let allowed_origins = config.cors.allowed_origins.clone();
    let server = HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else if !origin.is_empty() {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(state.clone())
            .app_data(health_state.clone())
            .wrap(cors)
            .wrap(tracing_actix_web::TracingLogger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api/v1/openapi.json", ApiDoc::openapi()),
            )
            .route(
                "/metrics",
                web::get().to(content_api::metrics::serve_metrics),
            )
            .configure(health::configure_health)
            .configure(routes::configure_routes)
    })
    .bind(&bind_address)?
    .run();

    let server_handle = server.handle();
    let mut server_task = tokio::spawn(server);

    let joined = tokio::select! {
        joined = &mut server_task => joined,
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received");
            server_handle.stop(true).await;
            server_task.await
        }
    };

    match joined {
        Ok(result) => result?,
        Err(e) => tracing::error!("HTTP server task failed: {}", e),
    }

    db_pool.close().await;
    tracing::info!("content-api shut down");
    Ok(())
}
