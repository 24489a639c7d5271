//! Roku channel configuration.

/// Configuration for the feed builder.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Channel provider name, required by the feed schema.
    pub provider_name: String,
    /// Roku channel ID, informational only.
    pub channel_id: Option<String>,
    /// Feed language code.
    pub language: String,
    /// Where the feed JSON is written.
    pub feed_output_path: String,
    /// Genre applied to entries whose source has no categories.
    pub default_genre: String,
    /// Rating scheme, e.g. "USA_TV". A rating is only attached when
    /// both the scheme and the default rating are set.
    pub rating_system: String,
    /// Default rating value, e.g. "TV-G".
    pub default_rating: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            provider_name: String::new(),
            channel_id: None,
            language: "en".to_string(),
            feed_output_path: "./roku_feed.json".to_string(),
            default_genre: "Entertainment".to_string(),
            rating_system: "USA_TV".to_string(),
            default_rating: "TV-G".to_string(),
        }
    }
}

impl FeedConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            provider_name: std::env::var("ROKU_PROVIDER_NAME").unwrap_or_default(),
            channel_id: std::env::var("ROKU_CHANNEL_ID").ok(),
            language: std::env::var("ROKU_LANGUAGE").unwrap_or(defaults.language),
            feed_output_path: std::env::var("ROKU_FEED_OUTPUT_PATH")
                .unwrap_or(defaults.feed_output_path),
            default_genre: std::env::var("ROKU_DEFAULT_GENRE").unwrap_or(defaults.default_genre),
            rating_system: std::env::var("ROKU_RATING_SYSTEM").unwrap_or(defaults.rating_system),
            default_rating: std::env::var("ROKU_DEFAULT_RATING")
                .unwrap_or(defaults.default_rating),
        }
    }
}
