/// Database access layer for post-service
///
/// `PostStore` is the seam between business logic and persistence; the
/// sqlx-backed `PgPostStore` is the production implementation. Components
/// receive an explicitly constructed store handle at startup rather than
/// reaching for package-level state.
pub mod post_repo;

pub use post_repo::PgPostStore;

use crate::error::Result;
use crate::models::Post;
use uuid::Uuid;

/// A fully assembled post, ready to insert. The id is generated by the
/// caller before any remote call resolves and is never reassigned.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub username: String,
    pub display_name: String,
    pub avatar_ref: String,
    pub image_ref: String,
    pub body: String,
    pub created_at: i64,
}

/// Persistence operations over post rows.
///
/// Every mutation is a single statement guarded by equality predicates on
/// id/owner/non-deleted, so duplicate concurrent deletes are idempotent
/// no-ops and the bulk repair commutes with concurrent row edits.
#[async_trait::async_trait]
pub trait PostStore: Send + Sync {
    async fn insert(&self, post: NewPost) -> Result<()>;

    /// Fetch one live post; soft-deleted rows are invisible here.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>>;

    /// Live posts with `created_at < cursor`, newest first, capped at
    /// `limit`.
    async fn list(&self, cursor: i64, limit: i64) -> Result<Vec<Post>>;

    /// Same as `list`, restricted to one owner.
    async fn list_by_owner(&self, owner_id: Uuid, cursor: i64, limit: i64) -> Result<Vec<Post>>;

    /// Owner-guarded body update on a live post. Returns the number of
    /// rows affected (0 when the row is gone or deleted).
    async fn update_body(&self, id: Uuid, owner_id: Uuid, body: &str, now: i64) -> Result<u64>;

    /// Owner-guarded soft delete. Affecting 0 rows is not an error: a
    /// concurrent delete already won and the outcome is the same.
    async fn soft_delete(&self, id: Uuid, owner_id: Uuid, now: i64) -> Result<u64>;

    /// Set-based repair of the denormalized profile snapshot across every
    /// live post of one owner. Last write wins; no version comparison.
    async fn repair_owner_profile(
        &self,
        owner_id: Uuid,
        display_name: &str,
        avatar_ref: &str,
        now: i64,
    ) -> Result<u64>;
}
