/// User service: store-only reads and writes
///
/// User data is never read from the cache. Updates still drop the content
/// collection snapshots, since `content_with_user:all` embeds user fields.
use crate::cache::{CacheKey, ContentCache};
use crate::db::{ContentStore, StoreError, UserStore};
use crate::error::{AppError, Result};
use crate::models::{NewUser, User, UserChanges, UserWithContents};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    contents: Arc<dyn ContentStore>,
    cache: ContentCache,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserStore>,
        contents: Arc<dyn ContentStore>,
        cache: ContentCache,
    ) -> Self {
        Self {
            users,
            contents,
            cache,
        }
    }

    /// Register a user, rejecting a taken email or phone number
    pub async fn signup(&self, new_user: NewUser) -> Result<User> {
        if self.users.find_by_email(&new_user.email).await?.is_some() {
            return Err(AppError::BadRequest("Email already registered".to_string()));
        }
        if self
            .users
            .find_by_phone(&new_user.phone_number)
            .await?
            .is_some()
        {
            return Err(AppError::BadRequest(
                "Phone number already registered".to_string(),
            ));
        }

        let user = self.users.insert(&new_user).await?;
        info!(user_id = user.id, "User registered");
        Ok(user)
    }

    pub async fn get_user(&self, id: i64) -> Result<UserWithContents> {
        let user = self
            .users
            .get(id)
            .await?
            .ok_or_else(|| user_not_found(id))?;
        let contents = self.contents.list_by_owner(id).await?;

        Ok(UserWithContents::new(user, contents))
    }

    /// Every user with their contents
    pub async fn list_users(&self) -> Result<Vec<UserWithContents>> {
        let users = self.users.list().await?;

        let mut by_owner: HashMap<i64, Vec<_>> = HashMap::new();
        for content in self.contents.list().await? {
            by_owner.entry(content.user_id).or_default().push(content);
        }

        Ok(users
            .into_iter()
            .map(|user| {
                let contents = by_owner.remove(&user.id).unwrap_or_default();
                UserWithContents::new(user, contents)
            })
            .collect())
    }

    /// Apply a partial update; email and phone must stay unique
    pub async fn update_user(&self, id: i64, changes: UserChanges) -> Result<User> {
        let current = self
            .users
            .get(id)
            .await?
            .ok_or_else(|| user_not_found(id))?;

        if let Some(email) = changes.email.as_deref() {
            if email != current.email && self.users.find_by_email(email).await?.is_some() {
                return Err(AppError::BadRequest("Email already exists".to_string()));
            }
        }
        if let Some(phone) = changes.phone_number.as_deref() {
            if phone != current.phone_number && self.users.find_by_phone(phone).await?.is_some()
            {
                return Err(AppError::BadRequest(
                    "Phone number already exists".to_string(),
                ));
            }
        }

        let user = self
            .users
            .update(id, &changes)
            .await
            .map_err(update_conflict)?
            .ok_or_else(|| user_not_found(id))?;
        info!(user_id = id, "User updated");

        self.cache.invalidate(&CacheKey::collections()).await;
        Ok(user)
    }
}

fn user_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("User with id {} not found", id))
}

/// A unique violation on update lost a race with another writer; report it
/// the same way as the pre-check does.
fn update_conflict(err: StoreError) -> AppError {
    if let StoreError::UniqueViolation {
        constraint: Some(name),
    } = &err
    {
        if name.contains("email") {
            return AppError::BadRequest("Email already exists".to_string());
        }
        if name.contains("phone") {
            return AppError::BadRequest("Phone number already exists".to_string());
        }
    }
    err.into()
}
