//! Upload handling

use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, instrument};

use crate::storage::{generate_disk_filename, Storage, StorageError, StorageResult};

/// Upload size limit unless configured otherwise
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// A file received from a client
#[derive(Debug, Clone)]
pub struct Upload {
    pub original_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl Upload {
    pub fn new(original_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            original_name: original_name.into(),
            content_type: None,
            data: data.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Where an upload ended up
#[derive(Debug, Clone, PartialEq)]
pub struct StoredUpload {
    pub original_name: String,
    pub disk_name: String,
    pub url: String,
    pub size: u64,
    pub content_type: String,
    pub digest: String,
}

/// Writes uploads to storage under generated names
#[derive(Clone)]
pub struct Uploader {
    storage: Arc<dyn Storage>,
    max_size: usize,
}

impl Uploader {
    pub fn new(storage: Arc<dyn Storage>, max_size: usize) -> Self {
        Self { storage, max_size }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    fn limit_error(&self) -> StorageError {
        StorageError::LimitExceeded {
            max_mb: self.max_size / (1024 * 1024),
        }
    }

    /// Check an upload size before reading the whole body
    pub fn check_size(&self, size: usize) -> StorageResult<()> {
        if size > self.max_size {
            return Err(self.limit_error());
        }
        Ok(())
    }

    #[instrument(skip(self, upload), fields(name = %upload.original_name, size = upload.data.len()))]
    pub async fn store(&self, upload: Upload) -> StorageResult<StoredUpload> {
        self.check_size(upload.data.len())?;

        let disk_name = generate_disk_filename(&upload.original_name);
        let metadata = self.storage.put(&disk_name, upload.data).await?;
        let url = self.storage.url(&disk_name);

        info!(disk_name = %disk_name, storage = self.storage.name(), "Upload stored");

        Ok(StoredUpload {
            original_name: upload.original_name,
            content_type: upload.content_type.unwrap_or(metadata.content_type),
            disk_name,
            url,
            size: metadata.size,
            digest: metadata.digest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn uploader(max: usize) -> Uploader {
        Uploader::new(Arc::new(MemoryStorage::new()), max)
    }

    #[tokio::test]
    async fn test_store_generates_url() {
        let uploader = uploader(DEFAULT_MAX_UPLOAD_SIZE);
        let stored = uploader
            .store(Upload::new("notes.txt", "hello"))
            .await
            .unwrap();

        assert_eq!(stored.original_name, "notes.txt");
        assert_eq!(stored.size, 5);
        assert_eq!(stored.content_type, "text/plain");
        assert_eq!(stored.url, format!("/uploads/{}", stored.disk_name));
        assert!(uploader.storage().exists(&stored.disk_name).await.unwrap());
    }

    #[tokio::test]
    async fn test_client_content_type_wins() {
        let stored = uploader(DEFAULT_MAX_UPLOAD_SIZE)
            .store(Upload::new("blob", "x").with_content_type("image/png"))
            .await
            .unwrap();
        assert_eq!(stored.content_type, "image/png");
    }

    #[tokio::test]
    async fn test_too_large_is_rejected() {
        let uploader = uploader(1024 * 1024);
        let data = vec![0u8; 1024 * 1024 + 1];
        let err = uploader.store(Upload::new("big.bin", data)).await.unwrap_err();
        assert!(matches!(err, StorageError::LimitExceeded { max_mb: 1 }));
        assert!(uploader.check_size(1024 * 1024).is_ok());
    }
}
