/// HTTP request handlers
pub mod feed;
pub mod posts;

pub use feed::{list_posts, list_posts_by_owner};
pub use posts::{create_post, delete_post, get_post, update_post};
