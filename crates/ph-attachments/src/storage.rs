//! Storage Abstraction
//!
//! Blobs are addressed by a flat key. Local storage maps the key to a file
//! under its root directory and serves it under a public URL prefix.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use ph_core::PhError;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("File too large. Maximum size is {max_mb}MB")]
    LimitExceeded { max_mb: usize },
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for PhError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(key) => PhError::not_found_with("File", &key, "File not found"),
            StorageError::LimitExceeded { .. } => PhError::PayloadTooLarge {
                message: err.to_string(),
            },
            StorageError::InvalidPath(_) => PhError::bad_request(err.to_string()),
            StorageError::IoError(e) => PhError::Internal(format!("upload storage: {}", e)),
        }
    }
}

/// File metadata from storage
#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// File size in bytes
    pub size: u64,
    /// Content type (MIME)
    pub content_type: String,
    /// SHA256 digest
    pub digest: String,
}

impl FileMetadata {
    fn describe(key: &str, data: &[u8]) -> Self {
        Self {
            size: data.len() as u64,
            content_type: guess_content_type(key),
            digest: calculate_digest(data),
        }
    }
}

/// Storage trait - unified interface for storage backends
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store data with a key
    async fn put(&self, key: &str, data: Bytes) -> StorageResult<FileMetadata>;

    /// Retrieve data by key
    async fn get(&self, key: &str) -> StorageResult<Bytes>;

    /// Delete data by key; deleting a missing key is not an error
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Check if key exists
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Public URL the stored file is served under
    fn url(&self, key: &str) -> String;

    /// Get storage name for logging
    fn name(&self) -> &str;
}

/// Local filesystem storage
pub struct LocalStorage {
    /// Root directory for storage
    root: PathBuf,
    /// URL prefix the root directory is served under
    base_url: String,
}

impl LocalStorage {
    pub fn new(root: impl AsRef<Path>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a key to a full path
    fn resolve_path(&self, key: &str) -> StorageResult<PathBuf> {
        if key.is_empty()
            || key.contains("..")
            || key.starts_with('/')
            || key.starts_with('\\')
        {
            return Err(StorageError::InvalidPath(key.to_string()));
        }

        Ok(self.root.join(key))
    }
}

#[async_trait]
impl Storage for LocalStorage {
    #[instrument(skip(self, data), fields(storage = "local"))]
    async fn put(&self, key: &str, data: Bytes) -> StorageResult<FileMetadata> {
        let path = self.resolve_path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let metadata = FileMetadata::describe(key, &data);

        let mut file = fs::File::create(&path).await?;
        file.write_all(&data).await?;
        file.sync_all().await?;

        debug!(path = ?path, size = metadata.size, "File stored");
        Ok(metadata)
    }

    #[instrument(skip(self), fields(storage = "local"))]
    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        let path = self.resolve_path(key)?;

        match fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self), fields(storage = "local"))]
    async fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.resolve_path(key)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(path = ?path, "File deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let path = self.resolve_path(key)?;
        Ok(fs::try_exists(&path).await?)
    }

    fn url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }

    fn name(&self) -> &str {
        "local"
    }
}

/// In-memory storage for testing
pub struct MemoryStorage {
    files: tokio::sync::RwLock<std::collections::HashMap<String, Bytes>>,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            files: tokio::sync::RwLock::new(std::collections::HashMap::new()),
        }
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn put(&self, key: &str, data: Bytes) -> StorageResult<FileMetadata> {
        let metadata = FileMetadata::describe(key, &data);
        self.files.write().await.insert(key.to_string(), data);
        Ok(metadata)
    }

    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        let files = self.files.read().await;
        files
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.files.write().await.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.files.read().await.contains_key(key))
    }

    fn url(&self, key: &str) -> String {
        format!("/uploads/{}", key)
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Calculate SHA256 digest
fn calculate_digest(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Guess content type from filename
fn guess_content_type(key: &str) -> String {
    mime_guess::from_path(key)
        .first_or_octet_stream()
        .to_string()
}

/// Generate a disk filename (safe for filesystem): a timestamp and a uuid,
/// keeping the original extension.
pub fn generate_disk_filename(filename: &str) -> String {
    let stamp = chrono::Utc::now().timestamp_millis();
    let uuid = Uuid::new_v4().simple();
    let ext = Path::new(filename)
        .extension()
        .and_then(|s| s.to_str())
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase);

    match ext {
        Some(ext) if !ext.is_empty() => format!("{}-{}.{}", stamp, uuid, ext),
        _ => format!("{}-{}", stamp, uuid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("projecthub-test-{}", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_memory_storage_put_get() {
        let storage = MemoryStorage::new();
        let data = Bytes::from("Hello, World!");

        let meta = storage.put("test.txt", data.clone()).await.unwrap();
        assert_eq!(meta.size, 13);
        assert_eq!(meta.content_type, "text/plain");
        assert_eq!(meta.digest.len(), 64);

        assert_eq!(storage.get("test.txt").await.unwrap(), data);
        storage.delete("test.txt").await.unwrap();
        assert!(!storage.exists("test.txt").await.unwrap());
        assert!(matches!(
            storage.get("test.txt").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_local_storage_round_trip() {
        let root = temp_root();
        let storage = LocalStorage::new(&root, "/uploads/");

        storage.put("a.txt", Bytes::from("abc")).await.unwrap();
        assert!(storage.exists("a.txt").await.unwrap());
        assert_eq!(storage.get("a.txt").await.unwrap(), Bytes::from("abc"));
        assert_eq!(storage.url("a.txt"), "/uploads/a.txt");

        storage.delete("a.txt").await.unwrap();
        storage.delete("a.txt").await.unwrap();
        assert!(!storage.exists("a.txt").await.unwrap());

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_local_storage_rejects_traversal() {
        let storage = LocalStorage::new(temp_root(), "/uploads");
        for key in ["../etc/passwd", "/abs", "\\win", ""] {
            assert!(matches!(
                storage.put(key, Bytes::from("x")).await,
                Err(StorageError::InvalidPath(_))
            ));
        }
    }

    #[test]
    fn test_generate_disk_filename() {
        let name = generate_disk_filename("Report Final.PDF");
        assert!(name.ends_with(".pdf"));
        assert!(!name.contains(' '));

        let bare = generate_disk_filename("README");
        assert!(!bare.contains('.'));
        assert_ne!(generate_disk_filename("a.txt"), generate_disk_filename("a.txt"));
    }

    #[test]
    fn test_error_mapping() {
        let err: PhError = StorageError::LimitExceeded { max_mb: 10 }.into();
        assert_eq!(err.status_code(), 413);
        assert_eq!(err.client_message(), "File too large. Maximum size is 10MB");

        let err: PhError = StorageError::InvalidPath("../x".into()).into();
        assert_eq!(err.status_code(), 400);
    }
}
