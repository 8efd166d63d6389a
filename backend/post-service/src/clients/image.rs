use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::clients::ImageClient;
use crate::error::{AppError, Result};

#[derive(Debug, Deserialize)]
struct StoredImage {
    filename: String,
}

#[derive(Debug, Deserialize)]
struct ImageEnvelope {
    #[allow(dead_code)]
    message: String,
    data: StoredImage,
}

/// HTTP client for the image service.
pub struct HttpImageClient {
    client: Client,
    base_url: String,
}

impl HttpImageClient {
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
impl ImageClient for HttpImageClient {
    async fn store_image(&self, bytes: Vec<u8>, filename: &str) -> Result<String> {
        let url = format!("{}/api/v1/images", self.base_url);
        debug!(filename, size_bytes = bytes.len(), "uploading post image");

        let part = Part::bytes(bytes).file_name(filename.to_string());
        let form = Form::new().part("image", part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("image upload failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "image upload returned {}",
                response.status()
            )));
        }

        let envelope = response
            .json::<ImageEnvelope>()
            .await
            .map_err(|e| AppError::Upstream(format!("image response parse failed: {e}")))?;

        Ok(envelope.data.filename)
    }
}
