/// Error types for content-api
///
/// Every handler returns `Result<T>`; `AppError` renders as a JSON body
/// `{"error": ..., "status": ...}` with the matching HTTP status.
use crate::db::StoreError;
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Result type for content-api operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Request body or field failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Domain rule violated (duplicate email/phone, unknown owner)
    #[error("{0}")]
    BadRequest(String),

    /// Resource not found
    #[error("{0}")]
    NotFound(String),
}

/// JSON body of every error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub status: u16,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: self.to_string(),
            status: status.as_u16(),
        })
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation { constraint } => {
                AppError::BadRequest(duplicate_message(constraint.as_deref()))
            }
            StoreError::ForeignKeyViolation { .. } => {
                AppError::BadRequest("Referenced user does not exist".to_string())
            }
            StoreError::Database(e) => AppError::Database(e.to_string()),
        }
    }
}

fn duplicate_message(constraint: Option<&str>) -> String {
    match constraint {
        Some(name) if name.contains("email") => "Email already registered".to_string(),
        Some(name) if name.contains("phone") => "Phone number already registered".to_string(),
        _ => "Record already exists".to_string(),
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Validation("x".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Database("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unique_violation_maps_to_duplicate_message() {
        let err: AppError = StoreError::UniqueViolation {
            constraint: Some("users_email_key".into()),
        }
        .into();
        assert_eq!(err.to_string(), "Email already registered");

        let err: AppError = StoreError::UniqueViolation {
            constraint: Some("users_phone_number_key".into()),
        }
        .into();
        assert_eq!(err.to_string(), "Phone number already registered");
    }

    #[test]
    fn test_foreign_key_violation_is_bad_request() {
        let err: AppError = StoreError::ForeignKeyViolation {
            constraint: Some("contents_user_id_fkey".into()),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
