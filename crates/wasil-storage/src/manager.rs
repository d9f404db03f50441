//! Storage manager: validates uploads, names objects and builds public URLs.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use wasil_core::config::StorageConfig;
use wasil_core::error::AppError;
use wasil_core::result::AppResult;
use wasil_core::traits::storage::{ByteStream, StorageObjectMeta, StorageProvider};
use wasil_core::types::MediaId;

/// What an uploaded object is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Photo of a dependant.
    DependantPhoto,
    /// Dispatcher portrait.
    DispatcherPhoto,
    /// Photo taken on a job.
    FieldPhoto,
    /// Short video of a dispatcher at work.
    WorkingVideo,
    /// Account profile photo.
    ProfilePhoto,
}

impl MediaKind {
    fn prefix(&self) -> &'static str {
        match self {
            Self::DependantPhoto => "dependants",
            Self::DispatcherPhoto => "dispatchers",
            Self::FieldPhoto => "field",
            Self::WorkingVideo => "videos",
            Self::ProfilePhoto => "profiles",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// A stored upload.
#[derive(Debug, Clone, Serialize)]
pub struct MediaObject {
    /// Object key within the provider.
    pub key: String,
    /// URL the object can be fetched from.
    pub url: String,
    /// MIME type.
    pub content_type: String,
    /// Size in bytes.
    pub size_bytes: u64,
}

/// Front door to the configured storage provider.
#[derive(Debug, Clone)]
pub struct StorageManager {
    provider: Arc<dyn StorageProvider>,
    config: StorageConfig,
    public_base: String,
}

impl StorageManager {
    /// Wrap `provider`. URLs are built as `{public_url}/media/{key}`.
    pub fn new(provider: Arc<dyn StorageProvider>, config: StorageConfig, public_url: &str) -> Self {
        Self {
            provider,
            config,
            public_base: format!("{}/media", public_url.trim_end_matches('/')),
        }
    }

    /// Validate and store an upload.
    pub async fn put(
        &self,
        kind: MediaKind,
        owner: &str,
        content_type: &str,
        data: Bytes,
    ) -> AppResult<MediaObject> {
        if data.is_empty() {
            return Err(AppError::validation("Upload is empty"));
        }
        if data.len() as u64 > self.config.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "Upload exceeds {} bytes",
                self.config.max_upload_size_bytes
            )));
        }
        let content_type = content_type.to_ascii_lowercase();
        if !self.config.allowed_mime_types.iter().any(|m| *m == content_type) {
            return Err(AppError::validation(format!(
                "Unsupported media type: {content_type}"
            )));
        }

        let key = format!(
            "{}/{}/{}.{}",
            kind.prefix(),
            owner,
            MediaId::new(),
            extension_for(&content_type)
        );
        let size_bytes = data.len() as u64;
        self.provider.write(&key, data).await?;

        info!(key = %key, kind = %kind, size_bytes, "Stored media object");
        Ok(MediaObject {
            url: self.url_for(&key),
            key,
            content_type,
            size_bytes,
        })
    }

    /// Open an object for streaming.
    pub async fn open(&self, key: &str) -> AppResult<(ByteStream, StorageObjectMeta)> {
        let meta = self.provider.metadata(key).await?;
        let stream = self.provider.read(key).await?;
        Ok((stream, meta))
    }

    /// Public URL of an object key.
    pub fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.public_base, key)
    }

    /// Whether the provider is reachable.
    pub async fn health_check(&self) -> bool {
        self.provider.health_check().await.unwrap_or(false)
    }
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "video/mp4" => "mp4",
        "video/quicktime" => "mov",
        _ => "bin",
    }
}

/// Guess a MIME type from an object key, for serving.
pub fn content_type_for(key: &str) -> &'static str {
    match key.rsplit('.').next() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("mp4") => "video/mp4",
        Some("mov") => "video/quicktime",
        _ => "application/octet-stream",
    }
}
