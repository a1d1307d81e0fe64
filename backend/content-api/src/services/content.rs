/// Content service: read-through caching over the content store
///
/// Reads consult the cache first and populate it on miss. Writes go to the
/// store and then drop the affected keys; the cache is only repopulated by
/// the next read.
use crate::cache::{CacheKey, ContentCache};
use crate::db::{ContentStore, UserStore};
use crate::error::{AppError, Result};
use crate::models::{Content, ContentChanges, ContentWithUser, NewContent};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct ContentService {
    contents: Arc<dyn ContentStore>,
    users: Arc<dyn UserStore>,
    cache: ContentCache,
}

impl ContentService {
    pub fn new(
        contents: Arc<dyn ContentStore>,
        users: Arc<dyn UserStore>,
        cache: ContentCache,
    ) -> Self {
        Self {
            contents,
            users,
            cache,
        }
    }

    /// Read one content row, cache first
    pub async fn read_content(&self, id: i64) -> Result<Content> {
        let key = CacheKey::content(id);
        if let Some(content) = self.cache.fetch::<Content>(&key).await {
            return Ok(content);
        }

        let content = self
            .contents
            .get(id)
            .await?
            .ok_or_else(|| content_not_found(id))?;

        self.cache.store(&key, &content).await;
        Ok(content)
    }

    /// Read every content row, cache first
    pub async fn read_all_content(&self) -> Result<Vec<Content>> {
        if let Some(contents) = self
            .cache
            .fetch::<Vec<Content>>(CacheKey::ALL_CONTENTS)
            .await
        {
            return Ok(contents);
        }

        let contents = self.contents.list().await?;
        if !contents.is_empty() {
            self.cache.store(CacheKey::ALL_CONTENTS, &contents).await;
        }
        Ok(contents)
    }

    /// Read every content row with its owner, cache first
    pub async fn read_all_content_with_user(&self) -> Result<Vec<ContentWithUser>> {
        if let Some(contents) = self
            .cache
            .fetch::<Vec<ContentWithUser>>(CacheKey::CONTENT_WITH_USER_ALL)
            .await
        {
            return Ok(contents);
        }

        let contents = self.contents.list_with_owner().await?;
        if !contents.is_empty() {
            self.cache
                .store(CacheKey::CONTENT_WITH_USER_ALL, &contents)
                .await;
        }
        Ok(contents)
    }

    /// Read one content row (through the cache) joined with its owner (from the store)
    pub async fn read_content_with_user(&self, id: i64) -> Result<ContentWithUser> {
        let content = self.read_content(id).await?;
        let owner = self
            .users
            .get(content.user_id)
            .await?
            .ok_or_else(|| user_not_found(content.user_id))?;

        Ok(ContentWithUser::new(content, (&owner).into()))
    }

    /// Persist new content, then drop the collection snapshots
    pub async fn create_content(&self, new_content: NewContent) -> Result<Content> {
        if self.users.get(new_content.user_id).await?.is_none() {
            return Err(user_not_found(new_content.user_id));
        }

        let content = self.contents.insert(&new_content).await?;
        info!(content_id = content.id, user_id = content.user_id, "Content created");

        self.cache.invalidate(&CacheKey::collections()).await;
        Ok(content)
    }

    /// Persist changes, then drop the content key and the collection snapshots
    pub async fn update_content(&self, id: i64, changes: ContentChanges) -> Result<Content> {
        let content = self
            .contents
            .update(id, &changes)
            .await?
            .ok_or_else(|| content_not_found(id))?;
        info!(content_id = id, "Content updated");

        let mut keys = vec![CacheKey::content(id)];
        keys.extend(CacheKey::collections());
        self.cache.invalidate(&keys).await;
        Ok(content)
    }
}

fn content_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Content with id {} not found", id))
}

fn user_not_found(id: i64) -> AppError {
    AppError::NotFound(format!("User with id {} not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::DEFAULT_TTL_SECS;
    use crate::db::{MockContentStore, MockUserStore, StoreError};
    use crate::models::User;
    use chrono::Utc;
    use kv_cache::{CacheBackend, MemoryCache};
    use std::time::Duration;

    fn content(id: i64, body: &str) -> Content {
        Content {
            id,
            title: "Title".into(),
            image: None,
            content: body.into(),
            user_id: 1,
            created_at: Utc::now(),
        }
    }

    fn user(id: i64) -> User {
        User {
            id,
            name: "John Doe".into(),
            email: "john@example.com".into(),
            phone_number: "+2348012345678".into(),
            country: "Nigeria".into(),
            state: "Lagos".into(),
            created_at: Utc::now(),
        }
    }

    fn service(
        contents: MockContentStore,
        users: MockUserStore,
    ) -> (Arc<MemoryCache>, ContentService) {
        let memory = Arc::new(MemoryCache::new());
        let cache = ContentCache::new(memory.clone(), DEFAULT_TTL_SECS);
        let service = ContentService::new(Arc::new(contents), Arc::new(users), cache);
        (memory, service)
    }

    #[tokio::test]
    async fn test_read_content_populates_then_hits() {
        let mut contents = MockContentStore::new();
        contents
            .expect_get()
            .times(1)
            .returning(|id| Ok(Some(content(id, "first body text"))));
        let (memory, service) = service(contents, MockUserStore::new());

        let first = service.read_content(5).await.unwrap();
        assert!(memory.get("content:5").await.unwrap().is_some());

        let second = service.read_content(5).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_read_content_not_found_is_not_cached() {
        let mut contents = MockContentStore::new();
        contents.expect_get().times(2).returning(|_| Ok(None));
        let (memory, service) = service(contents, MockUserStore::new());

        for _ in 0..2 {
            let err = service.read_content(42).await.unwrap_err();
            assert_eq!(err.to_string(), "Content with id 42 not found");
        }
        assert!(memory.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_content_after_ttl_goes_to_store() {
        let mut contents = MockContentStore::new();
        contents
            .expect_get()
            .times(2)
            .returning(|id| Ok(Some(content(id, "body that expires"))));
        let (_, service) = service(contents, MockUserStore::new());

        service.read_content(1).await.unwrap();
        tokio::time::advance(Duration::from_secs(DEFAULT_TTL_SECS)).await;
        service.read_content(1).await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_collection_is_not_cached() {
        let mut contents = MockContentStore::new();
        contents.expect_list().times(2).returning(|| Ok(vec![]));
        let (memory, service) = service(contents, MockUserStore::new());

        assert!(service.read_all_content().await.unwrap().is_empty());
        assert!(service.read_all_content().await.unwrap().is_empty());
        assert!(memory.is_empty());
    }

    #[tokio::test]
    async fn test_create_content_requires_owner() {
        let mut users = MockUserStore::new();
        users.expect_get().returning(|_| Ok(None));
        let mut contents = MockContentStore::new();
        contents.expect_insert().never();
        let (_, service) = service(contents, users);

        let err = service
            .create_content(NewContent {
                title: "Title".into(),
                image: None,
                content: "A body of text".into(),
                user_id: 9,
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "User with id 9 not found");
    }

    #[tokio::test]
    async fn test_create_content_drops_collections() {
        let mut users = MockUserStore::new();
        users.expect_get().returning(|id| Ok(Some(user(id))));
        let mut contents = MockContentStore::new();
        contents
            .expect_insert()
            .returning(|new| Ok(content(7, &new.content)));
        let (memory, service) = service(contents, users);

        memory.set(CacheKey::ALL_CONTENTS, b"[]", 600).await.unwrap();
        memory
            .set(CacheKey::CONTENT_WITH_USER_ALL, b"[]", 600)
            .await
            .unwrap();

        let created = service
            .create_content(NewContent {
                title: "Title".into(),
                image: None,
                content: "A body of text".into(),
                user_id: 1,
            })
            .await
            .unwrap();
        assert_eq!(created.id, 7);
        assert!(memory.is_empty());
        assert!(memory.get("content:7").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_content_drops_item_and_collections() {
        let mut contents = MockContentStore::new();
        contents
            .expect_update()
            .returning(|id, changes| Ok(Some(content(id, changes.content.as_deref().unwrap_or("")))));
        let (memory, service) = service(contents, MockUserStore::new());

        memory.set("content:3", b"{}", 600).await.unwrap();
        memory.set(CacheKey::ALL_CONTENTS, b"[]", 600).await.unwrap();

        let updated = service
            .update_content(
                3,
                ContentChanges {
                    image: None,
                    content: Some("updated body text".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.content, "updated body text");
        assert!(memory.is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_content_is_not_found() {
        let mut contents = MockContentStore::new();
        contents.expect_update().returning(|_, _| Ok(None));
        let (_, service) = service(contents, MockUserStore::new());

        let err = service
            .update_content(99, ContentChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_foreign_key_race_is_bad_request() {
        let mut users = MockUserStore::new();
        users.expect_get().returning(|id| Ok(Some(user(id))));
        let mut contents = MockContentStore::new();
        contents.expect_insert().returning(|_| {
            Err(StoreError::ForeignKeyViolation {
                constraint: Some("contents_user_id_fkey".into()),
            })
        });
        let (_, service) = service(contents, users);

        let err = service
            .create_content(NewContent {
                title: "Title".into(),
                image: None,
                content: "A body of text".into(),
                user_id: 1,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_read_content_with_user_joins_owner() {
        let mut contents = MockContentStore::new();
        contents
            .expect_get()
            .returning(|id| Ok(Some(content(id, "joined body text"))));
        let mut users = MockUserStore::new();
        users.expect_get().returning(|id| Ok(Some(user(id))));
        let (_, service) = service(contents, users);

        let joined = service.read_content_with_user(2).await.unwrap();
        assert_eq!(joined.id, 2);
        assert_eq!(joined.user.name, "John Doe");
    }
}
