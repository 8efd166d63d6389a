/// Remote service clients
///
/// Post creation fans out to two independent services: the user service
/// (authoritative profile record, required) and the image service
/// (binary asset storage, required only when an image is attached). Both
/// are consumed through traits so the orchestration logic stays
/// independent of the transport.
pub mod image;
pub mod profile;

pub use image::HttpImageClient;
pub use profile::HttpProfileClient;

use crate::error::Result;
use serde::Deserialize;
use uuid::Uuid;

/// The owner's public profile as the user service reports it right now.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerProfile {
    pub username: String,
    pub display_name: String,
    pub avatar_ref: String,
}

/// Profile lookup against the user service. Failure is always fatal to
/// the enclosing creation; there is no cached or default fallback.
#[async_trait::async_trait]
pub trait ProfileClient: Send + Sync {
    async fn fetch_profile(&self, owner_id: Uuid) -> Result<OwnerProfile>;
}

/// Binary upload against the image service. Returns the stored filename
/// reference. A failed upload is a hard error, never silently dropped.
#[async_trait::async_trait]
pub trait ImageClient: Send + Sync {
    async fn store_image(&self, bytes: Vec<u8>, filename: &str) -> Result<String>;
}
