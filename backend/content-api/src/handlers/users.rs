/// User handlers - signup and profile endpoints
use crate::app_state::AppState;
use crate::error::{ErrorResponse, Result};
use crate::models::{SignupRequest, UpdateUserRequest, User, UserWithContents};
use actix_web::{web, HttpResponse};
use validator::Validate;

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/v1/signup",
    tag = "users",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User registered", body = User),
        (status = 400, description = "Email or phone number already registered", body = ErrorResponse),
        (status = 422, description = "Invalid input", body = ErrorResponse)
    )
)]
pub async fn signup(
    state: web::Data<AppState>,
    req: web::Json<SignupRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    req.validate()?;

    let user = state.users.signup(req.into()).await?;
    Ok(HttpResponse::Created().json(user))
}

/// List every user with their content
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    responses(
        (status = 200, description = "All users", body = Vec<UserWithContents>)
    )
)]
pub async fn list_users(state: web::Data<AppState>) -> Result<HttpResponse> {
    let users = state.users.list_users().await?;
    Ok(HttpResponse::Ok().json(users))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User with content", body = UserWithContents),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn get_user(state: web::Data<AppState>, id: web::Path<i64>) -> Result<HttpResponse> {
    let user = state.users.get_user(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// Partially update a user's name, email or phone number
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Email or phone number taken", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Invalid input", body = ErrorResponse)
    )
)]
pub async fn update_user(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    req: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    req.validate()?;

    let user = state.users.update_user(id.into_inner(), req.into()).await?;
    Ok(HttpResponse::Ok().json(user))
}
