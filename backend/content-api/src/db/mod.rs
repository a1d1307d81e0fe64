/// Database access layer
///
/// This module provides:
/// - `UserStore` / `ContentStore`: the relational store contract used by services
/// - PostgreSQL implementations of both
/// - Connection pool creation
pub mod content_repo;
pub mod user_repo;

pub use content_repo::PgContentStore;
pub use user_repo::PgUserStore;

use crate::config::DatabaseConfig;
use crate::models::{
    Content, ContentChanges, ContentWithUser, NewContent, NewUser, User, UserChanges,
};
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

const PG_UNIQUE_VIOLATION: &str = "23505";
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

/// Store failures, with constraint violations split out as domain errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated ({constraint:?})")]
    UniqueViolation { constraint: Option<String> },

    #[error("foreign key constraint violated ({constraint:?})")]
    ForeignKeyViolation { constraint: Option<String> },

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().map(str::to_string);
            match db_err.code().as_deref() {
                Some(PG_UNIQUE_VIOLATION) => return StoreError::UniqueViolation { constraint },
                Some(PG_FOREIGN_KEY_VIOLATION) => {
                    return StoreError::ForeignKeyViolation { constraint }
                }
                _ => {}
            }
        }
        StoreError::Database(err)
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Durable storage for users
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get(&self, id: i64) -> StoreResult<Option<User>>;

    async fn list(&self) -> StoreResult<Vec<User>>;

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_by_phone(&self, phone_number: &str) -> StoreResult<Option<User>>;

    async fn insert(&self, user: &NewUser) -> StoreResult<User>;

    /// Applies the present fields; `None` when the user does not exist
    async fn update(&self, id: i64, changes: &UserChanges) -> StoreResult<Option<User>>;
}

/// Durable storage for content
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn get(&self, id: i64) -> StoreResult<Option<Content>>;

    async fn list(&self) -> StoreResult<Vec<Content>>;

    /// Every content row joined with its owner
    async fn list_with_owner(&self) -> StoreResult<Vec<ContentWithUser>>;

    async fn list_by_owner(&self, user_id: i64) -> StoreResult<Vec<Content>>;

    async fn insert(&self, content: &NewContent) -> StoreResult<Content>;

    /// Applies the present fields; `None` when the content does not exist
    async fn update(&self, id: i64, changes: &ContentChanges) -> StoreResult<Option<Content>>;
}

/// Create a PostgreSQL pool and verify it with `SELECT 1`
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .test_before_acquire(true)
        .connect(&config.url)
        .await?;

    match tokio::time::timeout(
        Duration::from_secs(config.acquire_timeout_secs),
        sqlx::query("SELECT 1").execute(&pool),
    )
    .await
    {
        Ok(Ok(_)) => {
            info!(
                max_connections = config.max_connections,
                min_connections = config.min_connections,
                "Database pool created and verified"
            );
            Ok(pool)
        }
        Ok(Err(e)) => {
            error!(error = %e, "Database connection verification failed");
            Err(e)
        }
        Err(_) => {
            error!(
                timeout_secs = config.acquire_timeout_secs,
                "Database connection verification timeout"
            );
            Err(sqlx::Error::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "Database verification timeout",
            )))
        }
    }
}
