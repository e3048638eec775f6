//! # ph-attachments
//!
//! Upload storage for ProjectHub.
//!
//! ## Example
//!
//! ```rust,ignore
//! use ph_attachments::{LocalStorage, Upload, Uploader};
//! use std::sync::Arc;
//!
//! let uploader = Uploader::new(Arc::new(LocalStorage::new("uploads", "/uploads")), 10 * 1024 * 1024);
//! let stored = uploader.store(Upload::new("report.pdf", bytes)).await?;
//! assert!(stored.url.starts_with("/uploads/"));
//! ```

pub mod storage;
pub mod upload;

pub use storage::{
    generate_disk_filename, FileMetadata, LocalStorage, MemoryStorage, Storage, StorageError,
    StorageResult,
};
pub use upload::{StoredUpload, Upload, Uploader, DEFAULT_MAX_UPLOAD_SIZE};
