/// Ownership authorization guard
///
/// A pure precondition check invoked identically before body-update and
/// soft-delete. It performs no mutation and holds no state; on mismatch
/// the calling operation aborts without side effects.
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::Post;

pub fn check_post_ownership(caller: Uuid, post: &Post) -> Result<()> {
    if post.owner_id == caller {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "you don't have permission to modify this post".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_owned_by(owner_id: Uuid) -> Post {
        Post {
            id: Uuid::new_v4(),
            owner_id,
            username: "ada".into(),
            display_name: "Ada".into(),
            avatar_ref: String::new(),
            image_ref: String::new(),
            body: "hello".into(),
            like_count: 0,
            reply_count: 0,
            created_at: 1_700_000_000,
            updated_at: 1_700_000_000,
            deleted_at: None,
        }
    }

    #[test]
    fn owner_passes() {
        let owner = Uuid::new_v4();
        assert!(check_post_ownership(owner, &post_owned_by(owner)).is_ok());
    }

    #[test]
    fn non_owner_is_forbidden() {
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let err = check_post_ownership(intruder, &post_owned_by(owner)).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
