/// Post service - creation orchestration and owner-gated mutations
///
/// Creation fans out synchronously: image upload (only when an image is
/// attached, failure fatal), then profile lookup (always, failure fatal),
/// then a single insert. The calls are not coordinated by a distributed
/// transaction: an uploaded asset whose insert fails afterwards is
/// orphaned. That inconsistency is accepted and documented rather than
/// papered over with a compensating delete.
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::clients::{ImageClient, ProfileClient};
use crate::db::{NewPost, PostStore};
use crate::error::{AppError, Result};
use crate::middleware::check_post_ownership;
use crate::models::Post;

const MAX_BODY_BYTES: usize = 4096;

const ALLOWED_IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// Binary image attachment as received from the request.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub bytes: Vec<u8>,
    pub filename: String,
}

pub struct PostService {
    store: Arc<dyn PostStore>,
    profiles: Arc<dyn ProfileClient>,
    images: Arc<dyn ImageClient>,
}

impl PostService {
    pub fn new(
        store: Arc<dyn PostStore>,
        profiles: Arc<dyn ProfileClient>,
        images: Arc<dyn ImageClient>,
    ) -> Self {
        Self {
            store,
            profiles,
            images,
        }
    }

    /// Create a post for the caller. No idempotency key: a retried
    /// submission creates a second post with a distinct id.
    pub async fn create_post(
        &self,
        caller: Uuid,
        body: &str,
        image: Option<ImagePayload>,
    ) -> Result<Post> {
        let body = validate_body(body)?;
        if let Some(image) = &image {
            validate_image_filename(&image.filename)?;
        }

        // The id exists before either remote call resolves.
        let id = Uuid::new_v4();

        let image_ref = match image {
            Some(image) => {
                self.images
                    .store_image(image.bytes, &image.filename)
                    .await?
            }
            None => String::new(),
        };

        // Required on every create; there is no cached fallback. If the
        // image upload above succeeded and this fails, the asset stays
        // orphaned in the image store.
        let profile = self.profiles.fetch_profile(caller).await?;

        let now = Utc::now().timestamp();
        self.store
            .insert(NewPost {
                id,
                owner_id: caller,
                username: profile.username.clone(),
                display_name: profile.display_name.clone(),
                avatar_ref: profile.avatar_ref.clone(),
                image_ref: image_ref.clone(),
                body: body.to_string(),
                created_at: now,
            })
            .await?;

        info!(post_id = %id, owner_id = %caller, "post created");

        Ok(Post {
            id,
            owner_id: caller,
            username: profile.username,
            display_name: profile.display_name,
            avatar_ref: profile.avatar_ref,
            image_ref,
            body: body.to_string(),
            like_count: 0,
            reply_count: 0,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    /// Fetch one live post or fail with not-found.
    pub async fn get_post(&self, id: Uuid) -> Result<Post> {
        self.store.find_by_id(id).await?.ok_or(AppError::NotFound)
    }

    /// Owner-only body update. Deleted posts report not-found, same as
    /// absent ones.
    pub async fn update_body(&self, caller: Uuid, id: Uuid, body: &str) -> Result<()> {
        let body = validate_body(body)?;

        let post = self.get_post(id).await?;
        check_post_ownership(caller, &post)?;

        let affected = self
            .store
            .update_body(id, caller, body, Utc::now().timestamp())
            .await?;

        if affected == 0 {
            // The row was deleted between the fetch and the update.
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    /// Owner-only soft delete. Terminal: nothing mutates a deleted post.
    pub async fn delete_post(&self, caller: Uuid, id: Uuid) -> Result<()> {
        let post = self.get_post(id).await?;
        check_post_ownership(caller, &post)?;

        let affected = self
            .store
            .soft_delete(id, caller, Utc::now().timestamp())
            .await?;

        if affected == 0 {
            // A concurrent delete won the race; the outcome is identical.
            warn!(post_id = %id, "soft delete affected no rows");
        }

        Ok(())
    }
}

fn validate_body(body: &str) -> Result<&str> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("post body is required".into()));
    }
    if trimmed.len() > MAX_BODY_BYTES {
        return Err(AppError::Validation(format!(
            "post body exceeds {MAX_BODY_BYTES} bytes"
        )));
    }
    Ok(trimmed)
}

fn validate_image_filename(filename: &str) -> Result<()> {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match extension {
        Some(ext) if ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(AppError::Validation(format!(
            "unsupported image type: {filename}"
        ))),
    }
}
