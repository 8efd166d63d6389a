//! Shared test fixtures: an in-memory `PostStore` with the same
//! predicate-guarded semantics as the PostgreSQL implementation.
#![allow(dead_code)]

use std::sync::Mutex;

use post_service::db::{NewPost, PostStore};
use post_service::error::Result;
use post_service::models::Post;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryPostStore {
    rows: Mutex<Vec<Post>>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a live post directly, bypassing the orchestrator, with an
    /// explicit `created_at` for pagination scenarios.
    pub fn seed(&self, owner_id: Uuid, created_at: i64, display_name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.rows.lock().unwrap().push(Post {
            id,
            owner_id,
            username: "seeded".into(),
            display_name: display_name.into(),
            avatar_ref: "avatars/old.png".into(),
            image_ref: String::new(),
            body: format!("post at {created_at}"),
            like_count: 0,
            reply_count: 0,
            created_at,
            updated_at: created_at,
            deleted_at: None,
        });
        id
    }

    /// Raw row lookup including soft-deleted rows, for assertions only.
    pub fn raw(&self, id: Uuid) -> Option<Post> {
        self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl PostStore for InMemoryPostStore {
    async fn insert(&self, post: NewPost) -> Result<()> {
        self.rows.lock().unwrap().push(Post {
            id: post.id,
            owner_id: post.owner_id,
            username: post.username,
            display_name: post.display_name,
            avatar_ref: post.avatar_ref,
            image_ref: post.image_ref,
            body: post.body,
            like_count: 0,
            reply_count: 0,
            created_at: post.created_at,
            updated_at: post.created_at,
            deleted_at: None,
        });
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id && p.deleted_at.is_none())
            .cloned())
    }

    async fn list(&self, cursor: i64, limit: i64) -> Result<Vec<Post>> {
        let mut posts: Vec<Post> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.deleted_at.is_none() && p.created_at < cursor)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts.truncate(limit as usize);
        Ok(posts)
    }

    async fn list_by_owner(&self, owner_id: Uuid, cursor: i64, limit: i64) -> Result<Vec<Post>> {
        let mut posts: Vec<Post> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| {
                p.owner_id == owner_id && p.deleted_at.is_none() && p.created_at < cursor
            })
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts.truncate(limit as usize);
        Ok(posts)
    }

    async fn update_body(&self, id: Uuid, owner_id: Uuid, body: &str, now: i64) -> Result<u64> {
        let mut rows = self.rows.lock().unwrap();
        let mut affected = 0;
        for post in rows.iter_mut() {
            if post.id == id && post.owner_id == owner_id && post.deleted_at.is_none() {
                post.body = body.to_string();
                post.updated_at = now;
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn soft_delete(&self, id: Uuid, owner_id: Uuid, now: i64) -> Result<u64> {
        let mut rows = self.rows.lock().unwrap();
        let mut affected = 0;
        for post in rows.iter_mut() {
            if post.id == id && post.owner_id == owner_id && post.deleted_at.is_none() {
                post.deleted_at = Some(now);
                post.updated_at = now;
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn repair_owner_profile(
        &self,
        owner_id: Uuid,
        display_name: &str,
        avatar_ref: &str,
        now: i64,
    ) -> Result<u64> {
        let mut rows = self.rows.lock().unwrap();
        let mut affected = 0;
        for post in rows.iter_mut() {
            if post.owner_id == owner_id && post.deleted_at.is_none() {
                post.display_name = display_name.to_string();
                post.avatar_ref = avatar_ref.to_string();
                post.updated_at = now;
                affected += 1;
            }
        }
        Ok(affected)
    }
}
