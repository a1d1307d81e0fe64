/// Content handlers - HTTP endpoints for content operations
use crate::app_state::AppState;
use crate::error::{ErrorResponse, Result};
use crate::models::{Content, ContentWithUser, CreateContentRequest, UpdateContentRequest};
use actix_web::{web, HttpResponse};
use validator::Validate;

/// Create content for an existing user
#[utoipa::path(
    post,
    path = "/api/v1/post-content",
    tag = "content",
    request_body = CreateContentRequest,
    responses(
        (status = 201, description = "Content created", body = Content),
        (status = 404, description = "Owner does not exist", body = ErrorResponse),
        (status = 422, description = "Invalid input", body = ErrorResponse)
    )
)]
pub async fn create_content(
    state: web::Data<AppState>,
    req: web::Json<CreateContentRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    req.validate()?;

    let content = state.contents.create_content(req.into()).await?;
    Ok(HttpResponse::Created().json(content))
}

/// Update the image and/or body of a content post
#[utoipa::path(
    put,
    path = "/api/v1/content/{id}",
    tag = "content",
    params(("id" = i64, Path, description = "Content ID")),
    request_body = UpdateContentRequest,
    responses(
        (status = 200, description = "Content updated", body = Content),
        (status = 404, description = "Content not found", body = ErrorResponse),
        (status = 422, description = "Invalid input", body = ErrorResponse)
    )
)]
pub async fn update_content(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    req: web::Json<UpdateContentRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    req.validate()?;

    let content = state
        .contents
        .update_content(id.into_inner(), req.into())
        .await?;
    Ok(HttpResponse::Ok().json(content))
}

/// List every content post with its owner
#[utoipa::path(
    get,
    path = "/api/v1/content",
    tag = "content",
    responses(
        (status = 200, description = "All content with owners", body = Vec<ContentWithUser>)
    )
)]
pub async fn list_content(state: web::Data<AppState>) -> Result<HttpResponse> {
    let contents = state.contents.read_all_content_with_user().await?;
    Ok(HttpResponse::Ok().json(contents))
}

/// Get a content post with its owner
#[utoipa::path(
    get,
    path = "/api/v1/content/{id}",
    tag = "content",
    params(("id" = i64, Path, description = "Content ID")),
    responses(
        (status = 200, description = "Content with owner", body = ContentWithUser),
        (status = 404, description = "Content not found", body = ErrorResponse)
    )
)]
pub async fn get_content(
    state: web::Data<AppState>,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    let content = state.contents.read_content_with_user(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(content))
}
