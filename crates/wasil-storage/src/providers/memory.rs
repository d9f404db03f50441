//! In-memory storage provider.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use wasil_core::error::AppError;
use wasil_core::result::AppResult;
use wasil_core::traits::storage::{ByteStream, StorageObjectMeta, StorageProvider};

/// Keeps objects in a concurrent map. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStorageProvider {
    objects: DashMap<String, (Bytes, DateTime<Utc>)>,
}

impl MemoryStorageProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    fn get(&self, path: &str) -> AppResult<(Bytes, DateTime<Utc>)> {
        self.objects
            .get(path)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::not_found(format!("Object not found: {path}")))
    }
}

#[async_trait]
impl StorageProvider for MemoryStorageProvider {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn read(&self, path: &str) -> AppResult<ByteStream> {
        let (data, _) = self.get(path)?;
        Ok(Box::pin(futures::stream::once(async move { Ok(data) })))
    }

    async fn read_bytes(&self, path: &str) -> AppResult<Bytes> {
        Ok(self.get(path)?.0)
    }

    async fn write(&self, path: &str, data: Bytes) -> AppResult<()> {
        self.objects.insert(path.to_string(), (data, Utc::now()));
        Ok(())
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        self.objects.remove(path);
        Ok(())
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        Ok(self.objects.contains_key(path))
    }

    async fn metadata(&self, path: &str) -> AppResult<StorageObjectMeta> {
        let (data, modified) = self.get(path)?;
        Ok(StorageObjectMeta {
            path: path.to_string(),
            size_bytes: data.len() as u64,
            last_modified: Some(modified),
        })
    }
}
