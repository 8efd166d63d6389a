/// Feed reader - cursor-paginated, soft-delete-aware listing
///
/// The cursor is an exclusive upper bound on `created_at`. Missing or
/// unusable cursor/limit values fall back to defaults instead of
/// rejecting the request. Ties on `created_at` across a page boundary
/// are a documented limitation: no secondary sort key breaks them.
use std::sync::Arc;

use uuid::Uuid;

use crate::db::PostStore;
use crate::error::Result;
use crate::models::{Post, PostPage};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

pub struct FeedReader {
    store: Arc<dyn PostStore>,
}

impl FeedReader {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store }
    }

    /// Global feed page, newest first.
    pub async fn page(&self, cursor: Option<i64>, limit: Option<i64>) -> Result<PostPage> {
        let posts = self
            .store
            .list(normalize_cursor(cursor), normalize_limit(limit))
            .await?;

        Ok(assemble_page(posts))
    }

    /// Feed page restricted to one owner.
    pub async fn page_for_owner(
        &self,
        owner_id: Uuid,
        cursor: Option<i64>,
        limit: Option<i64>,
    ) -> Result<PostPage> {
        let posts = self
            .store
            .list_by_owner(owner_id, normalize_cursor(cursor), normalize_limit(limit))
            .await?;

        Ok(assemble_page(posts))
    }
}

/// Absent or non-positive cursors mean "start from newest".
pub(crate) fn normalize_cursor(cursor: Option<i64>) -> i64 {
    match cursor {
        Some(c) if c > 0 => c,
        _ => i64::MAX,
    }
}

pub(crate) fn normalize_limit(limit: Option<i64>) -> i64 {
    match limit {
        Some(l) if l > 0 => l.min(MAX_PAGE_SIZE),
        _ => DEFAULT_PAGE_SIZE,
    }
}

/// The next cursor is the `created_at` of the last row, and only exists
/// for a non-empty page. Reading the last element unconditionally would
/// fault on empty results.
fn assemble_page(posts: Vec<Post>) -> PostPage {
    let next_cursor = posts.last().map(|p| p.created_at);
    PostPage { posts, next_cursor }
}
