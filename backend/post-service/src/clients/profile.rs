use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::clients::{OwnerProfile, ProfileClient};
use crate::error::{AppError, Result};

#[derive(Debug, Deserialize)]
struct ProfileEnvelope {
    #[allow(dead_code)]
    message: String,
    data: OwnerProfile,
}

/// HTTP client for the user service.
pub struct HttpProfileClient {
    client: Client,
    base_url: String,
}

impl HttpProfileClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Upstream(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait::async_trait]
impl ProfileClient for HttpProfileClient {
    async fn fetch_profile(&self, owner_id: Uuid) -> Result<OwnerProfile> {
        let url = format!("{}/api/v1/users/{}", self.base_url, owner_id);
        debug!(%owner_id, "fetching owner profile");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("profile request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "profile request returned {}",
                response.status()
            )));
        }

        let envelope = response
            .json::<ProfileEnvelope>()
            .await
            .map_err(|e| AppError::Upstream(format!("profile response parse failed: {e}")))?;

        Ok(envelope.data)
    }
}
