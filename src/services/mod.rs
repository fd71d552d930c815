// src/services/mod.rs
//
// Shared services module containing infrastructure services
// that can be used across different domain modules

pub mod storage;

// Re-export commonly used types for convenience
pub use storage::{StorageConfig, StorageError, StorageService, UploadedBlob};
