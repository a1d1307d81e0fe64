/// Data models for content-api
///
/// This module defines:
/// - Store rows: `User`, `Content`
/// - Read projections: `UserSummary`, `ContentWithUser`, `UserWithContents`
/// - Request bodies with field validation, and the store inputs derived from them
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub country: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
}

/// User as embedded in content listings (no `created_at`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub country: String,
    pub state: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            phone_number: user.phone_number.clone(),
            country: user.country.clone(),
            state: user.state.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Content {
    pub id: i64,
    pub title: String,
    /// Image path or URL, stored exactly as submitted
    pub image: Option<String>,
    pub content: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ContentWithUser {
    pub id: i64,
    pub title: String,
    pub image: Option<String>,
    pub content: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub user: UserSummary,
}

impl ContentWithUser {
    pub fn new(content: Content, user: UserSummary) -> Self {
        Self {
            id: content.id,
            title: content.title,
            image: content.image,
            content: content.content,
            user_id: content.user_id,
            created_at: content.created_at,
            user,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserWithContents {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub country: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub contents: Vec<Content>,
}

impl UserWithContents {
    pub fn new(user: User, contents: Vec<Content>) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone_number: user.phone_number,
            country: user.country,
            state: user.state,
            created_at: user.created_at,
            contents,
        }
    }
}

// ============= Requests =============

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    #[validate(
        length(min = 2, max = 100),
        custom(function = "crate::validators::validate_name")
    )]
    pub name: String,
    #[validate(email)]
    pub email: String,
    /// `+234` followed by 8 to 11 digits
    #[validate(custom(function = "crate::validators::validate_phone_number"))]
    pub phone_number: String,
    #[validate(length(min = 2, max = 100))]
    pub country: String,
    #[validate(length(min = 2, max = 100))]
    pub state: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(
        length(min = 2, max = 100),
        custom(function = "crate::validators::validate_name")
    )]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(custom(function = "crate::validators::validate_phone_number"))]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateContentRequest {
    #[validate(length(min = 3, max = 200))]
    pub title: String,
    /// Optional image file path, e.g. `/Users/me/photo.png`
    pub image: Option<String>,
    #[validate(length(min = 10))]
    pub content: String,
    #[validate(range(min = 1))]
    pub user_id: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateContentRequest {
    pub image: Option<String>,
    #[validate(length(min = 10))]
    pub content: Option<String>,
}

// ============= Store inputs =============

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub country: String,
    pub state: String,
}

impl From<SignupRequest> for NewUser {
    fn from(req: SignupRequest) -> Self {
        Self {
            name: req.name.trim().to_string(),
            email: req.email,
            phone_number: req.phone_number,
            country: req.country,
            state: req.state,
        }
    }
}

/// Partial user update; `None` leaves the column untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            name: req.name.map(|name| name.trim().to_string()),
            email: req.email,
            phone_number: req.phone_number,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewContent {
    pub title: String,
    pub image: Option<String>,
    pub content: String,
    pub user_id: i64,
}

impl From<CreateContentRequest> for NewContent {
    fn from(req: CreateContentRequest) -> Self {
        Self {
            title: req.title,
            image: req.image,
            content: req.content,
            user_id: req.user_id,
        }
    }
}

/// Partial content update; `None` leaves the column untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentChanges {
    pub image: Option<String>,
    pub content: Option<String>,
}

impl From<UpdateContentRequest> for ContentChanges {
    fn from(req: UpdateContentRequest) -> Self {
        Self {
            image: req.image,
            content: req.content,
        }
    }
}
