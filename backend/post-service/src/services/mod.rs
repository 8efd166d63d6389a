/// Business logic layer
pub mod feed;
pub mod posts;

pub use feed::FeedReader;
pub use posts::{ImagePayload, PostService};
