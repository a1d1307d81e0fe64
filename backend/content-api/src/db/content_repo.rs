use super::{ContentStore, StoreResult};
use crate::models::{Content, ContentChanges, ContentWithUser, NewContent, UserSummary};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

const CONTENT_COLUMNS: &str = "id, title, image, content, user_id, created_at";

/// PostgreSQL-backed content store
#[derive(Clone)]
pub struct PgContentStore {
    pool: PgPool,
}

impl PgContentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// One row of the contents/users join
#[derive(sqlx::FromRow)]
struct ContentOwnerRow {
    id: i64,
    title: String,
    image: Option<String>,
    content: String,
    user_id: i64,
    created_at: DateTime<Utc>,
    owner_name: String,
    owner_email: String,
    owner_phone_number: String,
    owner_country: String,
    owner_state: String,
}

impl From<ContentOwnerRow> for ContentWithUser {
    fn from(row: ContentOwnerRow) -> Self {
        let user = UserSummary {
            id: row.user_id,
            name: row.owner_name,
            email: row.owner_email,
            phone_number: row.owner_phone_number,
            country: row.owner_country,
            state: row.owner_state,
        };
        let content = Content {
            id: row.id,
            title: row.title,
            image: row.image,
            content: row.content,
            user_id: row.user_id,
            created_at: row.created_at,
        };
        ContentWithUser::new(content, user)
    }
}

#[async_trait]
impl ContentStore for PgContentStore {
    async fn get(&self, id: i64) -> StoreResult<Option<Content>> {
        let content = sqlx::query_as::<_, Content>(&format!(
            "SELECT {CONTENT_COLUMNS} FROM contents WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(content)
    }

    async fn list(&self) -> StoreResult<Vec<Content>> {
        let contents = sqlx::query_as::<_, Content>(&format!(
            "SELECT {CONTENT_COLUMNS} FROM contents ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(contents)
    }

    async fn list_with_owner(&self) -> StoreResult<Vec<ContentWithUser>> {
        let rows = sqlx::query_as::<_, ContentOwnerRow>(
            r#"
            SELECT c.id, c.title, c.image, c.content, c.user_id, c.created_at,
                   u.name AS owner_name,
                   u.email AS owner_email,
                   u.phone_number AS owner_phone_number,
                   u.country AS owner_country,
                   u.state AS owner_state
            FROM contents c
            JOIN users u ON u.id = c.user_id
            ORDER BY c.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ContentWithUser::from).collect())
    }

    async fn list_by_owner(&self, user_id: i64) -> StoreResult<Vec<Content>> {
        let contents = sqlx::query_as::<_, Content>(&format!(
            "SELECT {CONTENT_COLUMNS} FROM contents WHERE user_id = $1 ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(contents)
    }

    async fn insert(&self, content: &NewContent) -> StoreResult<Content> {
        let created = sqlx::query_as::<_, Content>(&format!(
            r#"
            INSERT INTO contents (title, image, content, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {CONTENT_COLUMNS}
            "#
        ))
        .bind(&content.title)
        .bind(&content.image)
        .bind(&content.content)
        .bind(content.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update(&self, id: i64, changes: &ContentChanges) -> StoreResult<Option<Content>> {
        let updated = sqlx::query_as::<_, Content>(&format!(
            r#"
            UPDATE contents
            SET image = COALESCE($2, image),
                content = COALESCE($3, content)
            WHERE id = $1
            RETURNING {CONTENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&changes.image)
        .bind(&changes.content)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }
}
