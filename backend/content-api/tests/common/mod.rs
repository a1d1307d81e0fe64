#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use content_api::cache::ContentCache;
use content_api::db::{ContentStore, StoreError, StoreResult, UserStore};
use content_api::models::{
    Content, ContentChanges, ContentWithUser, NewContent, NewUser, User, UserChanges, UserSummary,
};
use content_api::AppState;
use kv_cache::{CacheBackend, CacheError, CacheResult, MemoryCache};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const TTL_SECS: u64 = 600;

/// Both tables in memory, with the same constraints as the SQL schema
#[derive(Default)]
pub struct InMemoryDb {
    users: Mutex<Vec<User>>,
    contents: Mutex<Vec<Content>>,
    content_reads: AtomicUsize,
}

impl InMemoryDb {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Number of store reads on the contents table
    pub fn content_reads(&self) -> usize {
        self.content_reads.load(Ordering::SeqCst)
    }

    /// Change a body behind the service's back, as another writer would
    pub fn overwrite_body(&self, id: i64, body: &str) {
        let mut contents = self.contents.lock().unwrap();
        if let Some(row) = contents.iter_mut().find(|c| c.id == id) {
            row.content = body.to_string();
        }
    }

    fn read(&self) {
        self.content_reads.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserStore for InMemoryDb {
    async fn get(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<User>> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_phone(&self, phone_number: &str) -> StoreResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.phone_number == phone_number)
            .cloned())
    }

    async fn insert(&self, user: &NewUser) -> StoreResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::UniqueViolation {
                constraint: Some("users_email_key".into()),
            });
        }
        if users.iter().any(|u| u.phone_number == user.phone_number) {
            return Err(StoreError::UniqueViolation {
                constraint: Some("users_phone_number_key".into()),
            });
        }

        let created = User {
            id: users.len() as i64 + 1,
            name: user.name.clone(),
            email: user.email.clone(),
            phone_number: user.phone_number.clone(),
            country: user.country.clone(),
            state: user.state.clone(),
            created_at: Utc::now(),
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, changes: &UserChanges) -> StoreResult<Option<User>> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            user.name = name.clone();
        }
        if let Some(email) = &changes.email {
            user.email = email.clone();
        }
        if let Some(phone) = &changes.phone_number {
            user.phone_number = phone.clone();
        }
        Ok(Some(user.clone()))
    }
}

#[async_trait]
impl ContentStore for InMemoryDb {
    async fn get(&self, id: i64) -> StoreResult<Option<Content>> {
        self.read();
        Ok(self
            .contents
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn list(&self) -> StoreResult<Vec<Content>> {
        self.read();
        Ok(self.contents.lock().unwrap().clone())
    }

    async fn list_with_owner(&self) -> StoreResult<Vec<ContentWithUser>> {
        self.read();
        let users = self.users.lock().unwrap();
        let owners: HashMap<i64, UserSummary> =
            users.iter().map(|u| (u.id, UserSummary::from(u))).collect();

        Ok(self
            .contents
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| {
                owners
                    .get(&c.user_id)
                    .map(|owner| ContentWithUser::new(c.clone(), owner.clone()))
            })
            .collect())
    }

    async fn list_by_owner(&self, user_id: i64) -> StoreResult<Vec<Content>> {
        self.read();
        Ok(self
            .contents
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, content: &NewContent) -> StoreResult<Content> {
        if !self.users.lock().unwrap().iter().any(|u| u.id == content.user_id) {
            return Err(StoreError::ForeignKeyViolation {
                constraint: Some("contents_user_id_fkey".into()),
            });
        }

        let mut contents = self.contents.lock().unwrap();
        let created = Content {
            id: contents.len() as i64 + 1,
            title: content.title.clone(),
            image: content.image.clone(),
            content: content.content.clone(),
            user_id: content.user_id,
            created_at: Utc::now(),
        };
        contents.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, changes: &ContentChanges) -> StoreResult<Option<Content>> {
        let mut contents = self.contents.lock().unwrap();
        let Some(row) = contents.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        if let Some(image) = &changes.image {
            row.image = Some(image.clone());
        }
        if let Some(body) = &changes.content {
            row.content = body.clone();
        }
        Ok(Some(row.clone()))
    }
}

/// Memory cache that records every key passed to `get`
#[derive(Default)]
pub struct CountingCache {
    inner: MemoryCache,
    gets: Mutex<Vec<String>>,
}

impl CountingCache {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn gets(&self) -> Vec<String> {
        self.gets.lock().unwrap().clone()
    }

    pub fn inner(&self) -> &MemoryCache {
        &self.inner
    }
}

#[async_trait]
impl CacheBackend for CountingCache {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        self.gets.lock().unwrap().push(key.to_string());
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &[u8], ttl_secs: u64) -> CacheResult<()> {
        self.inner.set(key, value, ttl_secs).await
    }

    async fn expire(&self, key: &str, ttl_secs: u64) -> CacheResult<bool> {
        self.inner.expire(key, ttl_secs).await
    }

    async fn delete(&self, keys: &[String]) -> CacheResult<usize> {
        self.inner.delete(keys).await
    }

    async fn ping(&self) -> CacheResult<()> {
        Ok(())
    }
}

/// Cache whose every command fails
#[derive(Default)]
pub struct FailingCache {
    calls: AtomicUsize,
}

impl FailingCache {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail<T>(&self) -> CacheResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(CacheError::Unavailable("connection refused".into()))
    }
}

#[async_trait]
impl CacheBackend for FailingCache {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn get(&self, _key: &str) -> CacheResult<Option<Vec<u8>>> {
        self.fail()
    }

    async fn set(&self, _key: &str, _value: &[u8], _ttl_secs: u64) -> CacheResult<()> {
        self.fail()
    }

    async fn expire(&self, _key: &str, _ttl_secs: u64) -> CacheResult<bool> {
        self.fail()
    }

    async fn delete(&self, _keys: &[String]) -> CacheResult<usize> {
        self.fail()
    }

    async fn ping(&self) -> CacheResult<()> {
        self.fail()
    }
}

pub fn app_state(db: &Arc<InMemoryDb>, cache: Arc<dyn CacheBackend>) -> AppState {
    AppState::new(
        db.clone(),
        db.clone(),
        ContentCache::new(cache, TTL_SECS),
    )
}

pub fn new_user(n: u32) -> NewUser {
    NewUser {
        name: format!("User {}", n),
        email: format!("user{}@example.com", n),
        phone_number: format!("+23480{:08}", n),
        country: "Nigeria".into(),
        state: "Lagos".into(),
    }
}

pub fn new_content(user_id: i64, body: &str) -> NewContent {
    NewContent {
        title: "A title".into(),
        image: None,
        content: body.into(),
        user_id,
    }
}
