//! Sync configuration.
//!
//! `SyncConfig` covers the filtering and caching knobs of a sync run;
//! `Config` aggregates the per-crate configurations into the single
//! structure the CLI loads from the environment.

use tracing::warn;

use vrsync_feed::FeedConfig;
use vrsync_storage::StorageConfig;
use vrsync_vimeo::VimeoConfig;

/// Filtering and state knobs for a sync run.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Include videos whose privacy setting is not public.
    pub include_private: bool,
    /// Drop videos shorter than this many seconds.
    pub min_duration: u64,
    /// Drop videos longer than this many seconds, when set.
    pub max_duration: Option<u64>,
    /// When non-empty, keep only videos carrying at least one of these tags.
    pub include_tags: Vec<String>,
    /// Drop videos carrying any of these tags.
    pub exclude_tags: Vec<String>,
    /// Duration boundary between short-form content and movies, in seconds.
    pub short_form_max_duration: u64,
    /// Persist sync state between runs for incremental syncs.
    pub cache_enabled: bool,
    /// Path of the sync state file.
    pub cache_path: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            include_private: false,
            min_duration: 0,
            max_duration: None,
            include_tags: Vec::new(),
            exclude_tags: Vec::new(),
            short_form_max_duration: vrsync_models::DEFAULT_SHORT_FORM_MAX_DURATION,
            cache_enabled: true,
            cache_path: "./.vimeo_roku_cache".to_string(),
        }
    }
}

impl SyncConfig {
    /// Load sync settings from `SYNC_*` environment variables, falling back
    /// to defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            include_private: env_bool("SYNC_INCLUDE_PRIVATE", defaults.include_private),
            min_duration: env_u64("SYNC_MIN_DURATION", defaults.min_duration),
            max_duration: std::env::var("SYNC_MAX_DURATION")
                .ok()
                .and_then(|v| v.parse().ok()),
            include_tags: env_tags("SYNC_INCLUDE_TAGS"),
            exclude_tags: env_tags("SYNC_EXCLUDE_TAGS"),
            short_form_max_duration: env_u64(
                "SYNC_SHORT_FORM_MAX_DURATION",
                defaults.short_form_max_duration,
            ),
            cache_enabled: env_bool("SYNC_CACHE_ENABLED", defaults.cache_enabled),
            cache_path: std::env::var("SYNC_CACHE_PATH").unwrap_or(defaults.cache_path),
        }
    }
}

/// Aggregate configuration for the whole pipeline.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub vimeo: VimeoConfig,
    pub feed: FeedConfig,
    pub storage: StorageConfig,
    pub sync: SyncConfig,
}

impl Config {
    /// Load every section from the environment.
    pub fn from_env() -> Self {
        Self {
            vimeo: VimeoConfig::from_env(),
            feed: FeedConfig::from_env(),
            storage: StorageConfig::from_env(),
            sync: SyncConfig::from_env(),
        }
    }

    /// Collect every configuration problem rather than stopping at the first.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.vimeo.access_token.trim().is_empty() {
            errors.push("Vimeo access token is required".to_string());
        }
        if self.feed.provider_name.trim().is_empty() {
            errors.push("Roku provider name is required".to_string());
        }
        if let Some(max) = self.sync.max_duration {
            if max < self.sync.min_duration {
                errors.push(format!(
                    "SYNC_MAX_DURATION ({max}) is below SYNC_MIN_DURATION ({})",
                    self.sync.min_duration
                ));
            }
        }
        errors
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(v) => matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"),
        Err(_) => default,
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    match std::env::var(key) {
        Ok(v) => v.parse().unwrap_or_else(|_| {
            warn!(key, value = %v, "invalid integer in environment, using default");
            default
        }),
        Err(_) => default,
    }
}

fn env_tags(key: &str) -> Vec<String> {
    std::env::var(key)
        .map(|v| {
            v.split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect()
        })
        .unwrap_or_default()
}
