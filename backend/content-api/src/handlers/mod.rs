/// HTTP handlers for content-api
///
/// - Users: signup, list, get, partial update
/// - Content: create, update, list, get (reads go through the content cache)
pub mod content;
pub mod users;

pub use content::{create_content, get_content, list_content, update_content};
pub use users::{get_user, list_users, signup, update_user};

use crate::error::AppError;
use actix_web::{error::JsonPayloadError, web, HttpRequest, HttpResponse};

/// Service banner
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses((status = 200, description = "Service is up"))
)]
pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"message": "Up and running"}))
}

/// JSON extractor settings: malformed or mistyped bodies are validation errors
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation(err.to_string()).into()
}
