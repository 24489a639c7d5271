//! Feed hosting configuration.

/// Configuration for feed upload and update notification.
#[derive(Debug, Clone, Default)]
pub struct StorageConfig {
    /// Target S3 bucket. Upload is skipped when unset.
    pub s3_bucket: Option<String>,
    /// Object key for the feed; defaults to `roku-feed.json`.
    pub s3_key: Option<String>,
    /// Custom S3 endpoint for S3-compatible stores.
    pub endpoint_url: Option<String>,
    /// Webhook notified after a successful upload.
    pub webhook_url: Option<String>,
}

impl StorageConfig {
    /// Create config from environment variables. AWS credentials and
    /// region come from the SDK's default provider chain.
    pub fn from_env() -> Self {
        Self {
            s3_bucket: std::env::var("ROKU_S3_BUCKET").ok(),
            s3_key: std::env::var("ROKU_S3_KEY").ok(),
            endpoint_url: std::env::var("ROKU_S3_ENDPOINT_URL").ok(),
            webhook_url: std::env::var("ROKU_WEBHOOK_URL").ok(),
        }
    }
}
