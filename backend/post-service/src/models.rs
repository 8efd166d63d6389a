/// Data models for post-service
///
/// The `Post` row carries a denormalized snapshot of the owner's public
/// profile (`username`, `display_name`, `avatar_ref`) taken at creation
/// time. `display_name` and `avatar_ref` are repaired in bulk by the
/// profile-events consumer when the authoritative profile changes;
/// `username` is immutable once set.
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub username: String,
    pub display_name: String,
    pub avatar_ref: String,
    /// Reference into the external image store; empty when no image was
    /// attached at creation time.
    pub image_ref: String,
    pub body: String,
    pub like_count: i64,
    pub reply_count: i64,
    /// Epoch seconds; sole feed pagination key.
    pub created_at: i64,
    pub updated_at: i64,
    /// Soft-delete marker. Rows with a value here are invisible to every
    /// read and every further mutation; there is no undelete path.
    #[serde(skip_serializing)]
    pub deleted_at: Option<i64>,
}

/// Success envelope shared by every endpoint. Failures carry a
/// message-only body (see `error.rs`), never a `data` payload.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub message: String,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }
}

/// One feed page. `next_cursor` is present only when the page is
/// non-empty; an empty page terminates pagination.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPage {
    pub posts: Vec<Post>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<i64>,
}

/// Profile-change event consumed from the broker, published by the user
/// service whenever the authoritative profile record changes.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileChangedEvent {
    pub owner_id: Uuid,
    pub display_name: String,
    pub avatar_ref: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deleted_at_is_not_serialized() {
        let post = Post {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            username: "ada".into(),
            display_name: "Ada".into(),
            avatar_ref: "avatars/ada.png".into(),
            image_ref: String::new(),
            body: "hello".into(),
            like_count: 0,
            reply_count: 0,
            created_at: 1_700_000_000,
            updated_at: 1_700_000_000,
            deleted_at: Some(1_700_000_100),
        };

        let json = serde_json::to_value(&post).unwrap();
        assert!(json.get("deletedAt").is_none());
        assert!(json.get("deleted_at").is_none());
        assert_eq!(json["ownerId"], json!(post.owner_id.to_string()));
        assert_eq!(json["imageRef"], json!(""));
    }

    #[test]
    fn profile_changed_event_decodes_camel_case() {
        let payload = r#"{
            "ownerId": "00000000-0000-0000-0000-000000000002",
            "displayName": "New Name",
            "avatarRef": "avatars/new.png"
        }"#;

        let event: ProfileChangedEvent = serde_json::from_str(payload).unwrap();
        assert_eq!(event.display_name, "New Name");
        assert_eq!(event.avatar_ref, "avatars/new.png");
    }

    #[test]
    fn empty_page_omits_next_cursor() {
        let page = PostPage {
            posts: vec![],
            next_cursor: None,
        };
        let json = serde_json::to_value(&page).unwrap();
        assert!(json.get("nextCursor").is_none());
    }
}
