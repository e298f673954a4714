//! Hosted image/video storage.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

const CLOUDINARY_API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Applied to every upload: automatic quality and format.
pub const UPLOAD_TRANSFORMATION: &str = "q_auto,f_auto";

#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMedia {
    pub url: String,
    pub public_id: String,
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("media storage is not configured: set CLOUDINARY_CLOUD_NAME, CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET")]
    NotConfigured,
    #[error("file is empty")]
    EmptyFile,
    #[error("upload failed: {0}")]
    Upload(String),
    #[error("delete failed: {0}")]
    Delete(String),
}

#[async_trait]
pub trait MediaStorage: Send + Sync {
    async fn upload(&self, file: MediaUpload) -> Result<StoredMedia, MediaError>;
    async fn delete(&self, public_id: &str) -> Result<(), MediaError>;
}

#[derive(Clone, Default)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: String,
}

impl CloudinaryConfig {
    fn is_complete(&self) -> bool {
        [&self.cloud_name, &self.api_key, &self.api_secret]
            .iter()
            .all(|value| !value.trim().is_empty())
    }
}

impl fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("folder", &self.folder)
            .finish()
    }
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Deserialize)]
struct DestroyResponse {
    result: String,
}

pub struct CloudinaryStorage {
    config: CloudinaryConfig,
    api_base: String,
    client: reqwest::Client,
}

impl CloudinaryStorage {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            config,
            api_base: CLOUDINARY_API_BASE.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Points the adapter at another Cloudinary-compatible host.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn endpoint(&self, resource_type: &str, action: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.api_base.trim_end_matches('/'),
            self.config.cloud_name,
            resource_type,
            action
        )
    }

    async fn destroy(&self, resource_type: &str, public_id: &str) -> Result<String, MediaError> {
        let timestamp = unix_timestamp();
        let signature = sign(
            &[("public_id", public_id), ("timestamp", timestamp.as_str())],
            &self.config.api_secret,
        );
        let form = [
            ("public_id", public_id),
            ("timestamp", timestamp.as_str()),
            ("api_key", self.config.api_key.as_str()),
            ("signature", signature.as_str()),
            ("signature_algorithm", "sha256"),
        ];

        let response = self
            .client
            .post(self.endpoint(resource_type, "destroy"))
            .form(&form)
            .send()
            .await
            .map_err(|e| MediaError::Delete(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, %body, public_id, "media delete rejected");
            return Err(MediaError::Delete(status.to_string()));
        }

        let parsed: DestroyResponse = response
            .json()
            .await
            .map_err(|e| MediaError::Delete(e.to_string()))?;
        Ok(parsed.result)
    }
}

#[async_trait]
impl MediaStorage for CloudinaryStorage {
    async fn upload(&self, file: MediaUpload) -> Result<StoredMedia, MediaError> {
        if !self.config.is_complete() {
            return Err(MediaError::NotConfigured);
        }
        if file.bytes.is_empty() {
            return Err(MediaError::EmptyFile);
        }

        let timestamp = unix_timestamp();
        let signature = sign(
            &[
                ("folder", self.config.folder.as_str()),
                ("timestamp", timestamp.as_str()),
                ("transformation", UPLOAD_TRANSFORMATION),
            ],
            &self.config.api_secret,
        );

        let mut part = reqwest::multipart::Part::bytes(file.bytes).file_name(file.file_name);
        if let Some(content_type) = file.content_type.as_deref() {
            part = part
                .mime_str(content_type)
                .map_err(|e| MediaError::Upload(e.to_string()))?;
        }
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", self.config.folder.clone())
            .text("transformation", UPLOAD_TRANSFORMATION)
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let response = self
            .client
            .post(self.endpoint("auto", "upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| MediaError::Upload(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, %body, "media upload rejected");
            return Err(MediaError::Upload(status.to_string()));
        }

        let parsed: UploadResponse = response
            .json()
            .await
            .map_err(|e| MediaError::Upload(e.to_string()))?;
        tracing::info!(public_id = %parsed.public_id, "media uploaded");

        Ok(StoredMedia {
            url: parsed.secure_url,
            public_id: parsed.public_id,
        })
    }

    /// Tries the id as an image first, then as a video.
    async fn delete(&self, public_id: &str) -> Result<(), MediaError> {
        if !self.config.is_complete() {
            return Err(MediaError::NotConfigured);
        }

        for resource_type in ["image", "video"] {
            let result = self.destroy(resource_type, public_id).await?;
            if result == "ok" {
                tracing::info!(public_id, resource_type, "media deleted");
                return Ok(());
            }
        }
        Err(MediaError::Delete(format!("{public_id} not found")))
    }
}

fn unix_timestamp() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
        .to_string()
}

/// Cloudinary request signature: `k=v` pairs sorted by key, joined with `&`,
/// followed by the API secret, hashed with SHA-256.
fn sign(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by_key(|(key, _)| *key);
    let joined = sorted
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    format!("{:x}", hasher.finalize())
}
