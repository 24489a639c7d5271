//! Sync orchestrator error types.

use thiserror::Error;

pub type ManagerResult<T> = Result<T, SyncError>;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Vimeo error: {0}")]
    Vimeo(#[from] vrsync_vimeo::VimeoError),

    #[error("Feed error: {0}")]
    Feed(#[from] vrsync_feed::FeedError),

    #[error("Storage error: {0}")]
    Storage(#[from] vrsync_storage::StorageError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("State error: {0}")]
    State(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn state(msg: impl Into<String>) -> Self {
        Self::State(msg.into())
    }

    /// True when the underlying failure is a Vimeo authentication problem,
    /// which no amount of retrying will fix.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Vimeo(e) if e.is_auth())
    }
}
