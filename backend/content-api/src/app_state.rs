use crate::cache::ContentCache;
use crate::db::{ContentStore, UserStore};
use crate::services::{ContentService, UserService};
use std::sync::Arc;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub contents: Arc<ContentService>,
}

impl AppState {
    /// Wire both services over the same stores and cache
    pub fn new(
        users: Arc<dyn UserStore>,
        contents: Arc<dyn ContentStore>,
        cache: ContentCache,
    ) -> Self {
        Self {
            users: Arc::new(UserService::new(
                users.clone(),
                contents.clone(),
                cache.clone(),
            )),
            contents: Arc::new(ContentService::new(contents, users, cache)),
        }
    }
}
