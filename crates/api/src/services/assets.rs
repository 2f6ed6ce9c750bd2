//! External asset store client.
//!
//! Product create/update may carry an image payload (a URL or an encoded
//! blob). The payload is posted to the configured asset store, which
//! responds with a durable hosted URL; only that URL is persisted. The
//! checkout core never touches this.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AssetStoreConfig;

/// Errors that can occur when uploading to the asset store.
#[derive(Debug, Error)]
pub enum AssetStoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store returned an error response.
    #[error("asset store error: {status} - {message}")]
    Api {
        status: u16,
        message: String,
    },
}

#[derive(Debug, Serialize)]
struct UploadRequest<'a> {
    /// Image payload: a URL or a base64-encoded blob.
    image: &'a str,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    /// Durable hosted URL for the uploaded asset.
    secure_url: String,
}

/// Asset store API client.
#[derive(Clone)]
pub struct AssetStore {
    client: reqwest::Client,
    upload_url: String,
    api_key: SecretString,
}

impl AssetStore {
    /// Create a new asset store client.
    #[must_use]
    pub fn new(config: &AssetStoreConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            upload_url: config.upload_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Upload an image payload and return its hosted URL.
    ///
    /// # Errors
    ///
    /// Returns `AssetStoreError::Http` if the request fails, or
    /// `AssetStoreError::Api` if the store rejects the upload.
    pub async fn upload(&self, image: &str) -> Result<String, AssetStoreError> {
        let response = self
            .client
            .post(&self.upload_url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&UploadRequest { image })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AssetStoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: UploadResponse = response.json().await?;
        Ok(body.secure_url)
    }
}
