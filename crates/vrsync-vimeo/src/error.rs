//! Vimeo client error types.

use serde_json::Value;
use thiserror::Error;

pub type VimeoResult<T> = Result<T, VimeoError>;

/// Errors surfaced by the Vimeo client.
#[derive(Debug, Error)]
pub enum VimeoError {
    /// 401/403 from the API. Never retried.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// 429 after the retry budget is exhausted. Carries the last
    /// server-provided Retry-After value in seconds.
    #[error("Rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimit { retry_after_secs: u64 },

    /// Any other status >= 400. Never retried.
    #[error("API request failed with status {status}: {message}")]
    Api {
        status: u16,
        message: String,
        body: Option<Value>,
    },

    /// Network-level failure after the retry budget is exhausted.
    #[error("Request failed after {attempts} attempts: {message}")]
    Transient { attempts: u32, message: String },

    /// A single API record could not be translated into a video.
    #[error("Failed to translate video record: {0}")]
    Translation(#[from] vrsync_models::ParseError),

    /// Missing required client settings, raised before any network I/O.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl VimeoError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, VimeoError::Auth(_))
    }

    pub fn is_rate_limit(&self) -> bool {
        matches!(self, VimeoError::RateLimit { .. })
    }

    pub fn is_translation(&self) -> bool {
        matches!(self, VimeoError::Translation(_))
    }
}
