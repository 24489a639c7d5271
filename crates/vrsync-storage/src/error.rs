//! Storage error types.

use thiserror::Error;

pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur while hosting the feed.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to configure feed store: {0}")]
    ConfigError(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn upload_failed(msg: impl Into<String>) -> Self {
        Self::UploadFailed(msg.into())
    }
}
