//! Object store access
//!
//! The engine consumes blob storage through the `ObjectStore` trait; the
//! production implementation speaks the storage service's REST API over
//! HTTP. Objects live in one bucket per [`Category`] and are addressed by a
//! stable key.

use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::models::Category;
use async_trait::async_trait;
use std::time::Duration;

const USER_AGENT: &str = concat!("media-reconciler/", env!("CARGO_PKG_VERSION"));

/// Blob storage operations the engine depends on.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Resolve the public URL for an object. Pure; does not check existence.
    fn resolve_public_url(&self, category: Category, key: &str) -> String;

    /// Lightweight existence probe against a public URL (HEAD, no body).
    ///
    /// `Ok(false)` means the URL answered and the object is not there;
    /// `Err` means the probe itself could not complete.
    async fn probe(&self, url: &str) -> Result<bool>;

    /// Read the full object bytes.
    async fn read(&self, category: Category, key: &str) -> Result<Vec<u8>>;

    /// Write object bytes, overwriting any existing object at the key.
    async fn write(&self, category: Category, key: &str, bytes: Vec<u8>) -> Result<()>;

    /// Delete the object at the key.
    async fn delete(&self, category: Category, key: &str) -> Result<()>;
}

/// REST client for the hosted object storage service.
pub struct HttpObjectStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpObjectStore {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        if config.storage_url.is_empty() {
            return Err(Error::Config("storage_url is not configured".into()));
        }
        Self::new(&config.storage_url, &config.storage_key, config.http_timeout())
    }

    /// Authorized object endpoint (read/write/delete).
    fn object_url(&self, category: Category, key: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, category.bucket(), key)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(Error::Storage { status: status.as_u16(), message })
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    fn resolve_public_url(&self, category: Category, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url,
            category.bucket(),
            key
        )
    }

    async fn probe(&self, url: &str) -> Result<bool> {
        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(response.status().is_success())
    }

    async fn read(&self, category: Category, key: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(self.object_url(category, key))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let response = Self::check_status(response).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    async fn write(&self, category: Category, key: &str, bytes: Vec<u8>) -> Result<()> {
        let response = self
            .client
            .post(self.object_url(category, key))
            .bearer_auth(&self.api_key)
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        Self::check_status(response).await?;
        Ok(())
    }

    async fn delete(&self, category: Category, key: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.object_url(category, key))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        Self::check_status(response).await?;
        Ok(())
    }
}
