//! S3 feed store.

use std::path::Path;

use aws_config::BehaviorVersion;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;
use tracing::{debug, info};

use crate::config::StorageConfig;
use crate::error::{StorageError, StorageResult};

/// Default object key for the published feed.
const DEFAULT_FEED_KEY: &str = "roku-feed.json";

/// Uploads feed documents to an S3 bucket with public-read access.
#[derive(Clone, Debug)]
pub struct FeedStore {
    client: Client,
    bucket: String,
    key: String,
}

impl FeedStore {
    /// Create a feed store from configuration. Credentials and region
    /// come from the SDK's default provider chain.
    pub async fn new(config: StorageConfig) -> StorageResult<Self> {
        let bucket = config
            .s3_bucket
            .filter(|b| !b.is_empty())
            .ok_or_else(|| StorageError::config_error("S3 bucket is required"))?;

        let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        let client = match &config.endpoint_url {
            Some(endpoint) => {
                let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
                    .endpoint_url(endpoint)
                    .force_path_style(true)
                    .build();
                Client::from_conf(s3_config)
            }
            None => Client::new(&sdk_config),
        };

        Ok(Self {
            client,
            bucket,
            key: config.s3_key.unwrap_or_else(|| DEFAULT_FEED_KEY.to_string()),
        })
    }

    /// Create from environment variables.
    pub async fn from_env() -> StorageResult<Self> {
        Self::new(StorageConfig::from_env()).await
    }

    /// Upload a feed file, returning its public URL.
    pub async fn upload_feed(
        &self,
        path: impl AsRef<Path>,
        key: Option<&str>,
    ) -> StorageResult<String> {
        let path = path.as_ref();
        let key = key.unwrap_or(&self.key);
        debug!("Uploading {} to s3://{}/{}", path.display(), self.bucket, key);

        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| StorageError::upload_failed(e.to_string()))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .content_type("application/json")
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(|e| StorageError::upload_failed(e.to_string()))?;

        let url = self.public_url(key);
        info!("Feed uploaded to {}", url);
        Ok(url)
    }

    /// Upload serialized feed bytes, returning the public URL.
    pub async fn upload_bytes(&self, data: Vec<u8>, key: Option<&str>) -> StorageResult<String> {
        let key = key.unwrap_or(&self.key);
        debug!("Uploading {} bytes to s3://{}/{}", data.len(), self.bucket, key);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_type("application/json")
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(|e| StorageError::upload_failed(e.to_string()))?;

        Ok(self.public_url(key))
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://{}.s3.amazonaws.com/{}", self.bucket, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bucket_required() {
        let err = FeedStore::new(StorageConfig::default()).await.unwrap_err();
        assert!(matches!(err, StorageError::ConfigError(_)));
    }

    #[tokio::test]
    async fn test_public_url_shape() {
        let store = FeedStore::new(StorageConfig {
            s3_bucket: Some("my-feeds".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
        assert_eq!(
            store.public_url("roku-feed.json"),
            "https://my-feeds.s3.amazonaws.com/roku-feed.json"
        );
    }
}
