/// OpenAPI documentation for content-api
use crate::error::ErrorResponse;
use crate::handlers;
use crate::models::{
    Content, ContentWithUser, CreateContentRequest, SignupRequest, UpdateContentRequest,
    UpdateUserRequest, User, UserSummary, UserWithContents,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Content API",
        version = "0.1.0",
        description = "User signup and content posting service. Content reads are served through a read-through cache with a sliding ten-minute TTL; writes go to PostgreSQL first and then invalidate the affected cache keys.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8000", description = "Development server"),
    ),
    paths(
        handlers::root,
        handlers::users::signup,
        handlers::users::list_users,
        handlers::users::get_user,
        handlers::users::update_user,
        handlers::content::create_content,
        handlers::content::update_content,
        handlers::content::list_content,
        handlers::content::get_content,
    ),
    components(schemas(
        User,
        UserSummary,
        UserWithContents,
        Content,
        ContentWithUser,
        SignupRequest,
        UpdateUserRequest,
        CreateContentRequest,
        UpdateContentRequest,
        ErrorResponse,
    )),
    tags(
        (name = "health", description = "Service health checks"),
        (name = "users", description = "Signup and user profiles"),
        (name = "content", description = "Content creation, updates and cached reads"),
    )
)]
pub struct ApiDoc;
