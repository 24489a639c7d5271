//! Vimeo API configuration.

/// Configuration for the Vimeo client.
#[derive(Debug, Clone, Default)]
pub struct VimeoConfig {
    /// API access token (bearer credential).
    pub access_token: String,
    /// App client ID. Not used for requests; kept for completeness.
    pub client_id: String,
    /// App client secret. Not used for requests; kept for completeness.
    pub client_secret: String,
    /// User whose catalog is synced; `None` means the authenticated user.
    pub user_id: Option<String>,
    /// Default folder/project to sync from.
    pub folder_id: Option<String>,
    /// Default album/showcase to sync from.
    pub album_id: Option<String>,
}

impl VimeoConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            access_token: std::env::var("VIMEO_ACCESS_TOKEN").unwrap_or_default(),
            client_id: std::env::var("VIMEO_CLIENT_ID").unwrap_or_default(),
            client_secret: std::env::var("VIMEO_CLIENT_SECRET").unwrap_or_default(),
            user_id: std::env::var("VIMEO_USER_ID").ok(),
            folder_id: std::env::var("VIMEO_FOLDER_ID").ok(),
            album_id: std::env::var("VIMEO_ALBUM_ID").ok(),
        }
    }
}
