use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{NewPost, PostStore};
use crate::error::Result;
use crate::models::Post;

const POST_COLUMNS: &str = "id, owner_id, username, display_name, avatar_ref, image_ref, body, \
     like_count, reply_count, created_at, updated_at, deleted_at";

/// PostgreSQL-backed post store.
#[derive(Clone)]
pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl PostStore for PgPostStore {
    async fn insert(&self, post: NewPost) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO posts (
                id, owner_id, username, display_name, avatar_ref,
                image_ref, body, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            "#,
        )
        .bind(post.id)
        .bind(post.owner_id)
        .bind(&post.username)
        .bind(&post.display_name)
        .bind(&post.avatar_ref)
        .bind(&post.image_ref)
        .bind(&post.body)
        .bind(post.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>> {
        let sql = format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE id = $1 AND deleted_at IS NULL
            "#
        );
        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(post)
    }

    async fn list(&self, cursor: i64, limit: i64) -> Result<Vec<Post>> {
        let sql = format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE deleted_at IS NULL AND created_at < $1
            ORDER BY created_at DESC
            LIMIT $2
            "#
        );
        let posts = sqlx::query_as::<_, Post>(&sql)
            .bind(cursor)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(posts)
    }

    async fn list_by_owner(&self, owner_id: Uuid, cursor: i64, limit: i64) -> Result<Vec<Post>> {
        let sql = format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE owner_id = $1 AND deleted_at IS NULL AND created_at < $2
            ORDER BY created_at DESC
            LIMIT $3
            "#
        );
        let posts = sqlx::query_as::<_, Post>(&sql)
            .bind(owner_id)
            .bind(cursor)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(posts)
    }

    async fn update_body(&self, id: Uuid, owner_id: Uuid, body: &str, now: i64) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET body = $1, updated_at = $2
            WHERE id = $3 AND owner_id = $4 AND deleted_at IS NULL
            "#,
        )
        .bind(body)
        .bind(now)
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn soft_delete(&self, id: Uuid, owner_id: Uuid, now: i64) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET deleted_at = $1, updated_at = $1
            WHERE id = $2 AND owner_id = $3 AND deleted_at IS NULL
            "#,
        )
        .bind(now)
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn repair_owner_profile(
        &self,
        owner_id: Uuid,
        display_name: &str,
        avatar_ref: &str,
        now: i64,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET display_name = $1, avatar_ref = $2, updated_at = $3
            WHERE owner_id = $4 AND deleted_at IS NULL
            "#,
        )
        .bind(display_name)
        .bind(avatar_ref)
        .bind(now)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
