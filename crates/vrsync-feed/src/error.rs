//! Feed builder error types.

use thiserror::Error;

pub type FeedResult<T> = Result<T, FeedError>;

/// Errors raised while constructing or persisting a feed.
///
/// Validation issues are deliberately not errors: they are collected
/// as messages and never block persistence.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Feed construction error: {0}")]
    Construction(String),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FeedError {
    pub fn construction(msg: impl Into<String>) -> Self {
        Self::Construction(msg.into())
    }
}
