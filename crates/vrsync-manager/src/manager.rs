//! Sync orchestration.
//!
//! `SyncManager` drives one run of the pipeline: fetch videos from the
//! selected source, filter and classify them, build the Roku feed,
//! validate, persist, optionally upload and notify, and finally record
//! incremental state. Item-level problems are counted and recorded, never
//! fatal; only API, construction, and IO failures flip a run to failed.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::fs;
use tracing::{debug, error, info, warn};

use vrsync_feed::{FeedGenerator, FeedStats};
use vrsync_models::{Video, VideoType};
use vrsync_storage::{FeedStore, WebhookNotifier};
use vrsync_vimeo::{VimeoClient, VimeoResult};

use crate::config::Config;
use crate::error::ManagerResult;
use crate::filter::VideoFilter;
use crate::state::SyncState;

/// Where a sync run fetches videos from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VideoSource {
    /// The user's full catalog.
    #[default]
    All,
    /// One album/showcase; `None` uses the configured default album.
    Album(Option<String>),
    /// One folder/project; `None` uses the configured default folder.
    Folder(Option<String>),
}

/// Knobs for one sync run.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    pub source: VideoSource,
    /// Fetch only videos modified since the last successful sync.
    /// Without a recorded prior sync this falls back to a full fetch.
    pub incremental: bool,
    /// Upload the feed after writing it, when a bucket is configured.
    pub upload: bool,
    /// Send the webhook notification after a successful upload.
    pub notify: bool,
}

/// Summary of one sync run. Counts and errors are reported even when the
/// run failed partway.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncResult {
    pub success: bool,
    pub videos_processed: usize,
    pub videos_added: usize,
    pub videos_skipped: usize,
    pub videos_failed: usize,
    pub feed_path: Option<PathBuf>,
    pub feed_url: Option<String>,
    pub errors: Vec<String>,
    pub duration_seconds: f64,
    pub timestamp: DateTime<Utc>,
}

/// Hooks the orchestrator calls at defined points during a run.
pub trait SyncObserver: Send + Sync {
    /// Called after each fetched record is handled.
    fn on_progress(&self, _processed: usize, _total: usize) {}

    /// Called for each translated video with its inclusion decision.
    fn on_video(&self, _video: &Video, _included: bool) {}
}

/// Observer that ignores everything.
pub struct NoopObserver;

impl SyncObserver for NoopObserver {}

pub struct SyncManager {
    config: Config,
    client: VimeoClient,
    generator: FeedGenerator,
    filter: VideoFilter,
    notifier: WebhookNotifier,
    observer: Arc<dyn SyncObserver>,
    /// In-memory sync state, loaded lazily on first use and kept for the
    /// manager's lifetime unless [`clear_cache`](Self::clear_cache) resets it.
    state: Option<SyncState>,
}

impl SyncManager {
    pub fn new(config: Config) -> ManagerResult<Self> {
        let client = VimeoClient::new(config.vimeo.clone())?;
        Self::with_client(config, client)
    }

    /// Build a manager around an already-configured client. Used by
    /// callers that need a custom base URL or retry policy.
    pub fn with_client(config: Config, client: VimeoClient) -> ManagerResult<Self> {
        let generator = FeedGenerator::new(config.feed.clone())?;
        let filter = VideoFilter::new(&config.sync);
        let notifier = WebhookNotifier::new(config.storage.webhook_url.clone());
        Ok(Self {
            config,
            client,
            generator,
            filter,
            notifier,
            observer: Arc::new(NoopObserver),
            state: None,
        })
    }

    pub fn with_observer(mut self, observer: Arc<dyn SyncObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Run one sync. Never returns an error: failures are reported through
    /// the result's `success` flag and error list, and the duration covers
    /// the failure path too.
    pub async fn sync(&mut self, options: &SyncOptions) -> SyncResult {
        let started = Instant::now();
        let mut result = SyncResult {
            success: true,
            timestamp: Utc::now(),
            ..SyncResult::default()
        };

        info!(source = ?options.source, incremental = options.incremental, "starting sync");

        if let Err(e) = self.run(options, &mut result).await {
            error!(error = %e, "sync failed");
            result.success = false;
            result.errors.push(e.to_string());
        }

        result.duration_seconds = started.elapsed().as_secs_f64();
        info!(
            success = result.success,
            processed = result.videos_processed,
            added = result.videos_added,
            skipped = result.videos_skipped,
            failed = result.videos_failed,
            duration_seconds = result.duration_seconds,
            "sync finished"
        );
        result
    }

    /// Sync one album/showcase.
    pub async fn sync_album(&mut self, album_id: Option<&str>) -> SyncResult {
        self.sync(&SyncOptions {
            source: VideoSource::Album(album_id.map(String::from)),
            ..SyncOptions::default()
        })
        .await
    }

    /// Sync one folder/project.
    pub async fn sync_folder(&mut self, folder_id: Option<&str>) -> SyncResult {
        self.sync(&SyncOptions {
            source: VideoSource::Folder(folder_id.map(String::from)),
            ..SyncOptions::default()
        })
        .await
    }

    /// Stats over the current in-memory feed.
    pub fn feed_stats(&self) -> FeedStats {
        self.generator.stats()
    }

    /// The recorded state of the last successful sync.
    pub async fn last_sync_info(&mut self) -> SyncState {
        self.state_mut().await.clone()
    }

    /// Drop the in-memory state and delete the state file, forcing the
    /// next incremental run to fall back to a full fetch.
    pub async fn clear_cache(&mut self) {
        self.state = None;
        if let Err(e) = fs::remove_file(&self.config.sync.cache_path).await {
            debug!(path = %self.config.sync.cache_path, error = %e, "no state file to remove");
        }
    }

    async fn run(&mut self, options: &SyncOptions, result: &mut SyncResult) -> ManagerResult<()> {
        let last_sync = self.state_mut().await.last_sync;

        self.generator.reset();

        // Incremental runs with a prior sync timestamp take the
        // modified-since stream instead of the selected source; without
        // one they fall back to a full fetch.
        let records = match (options.incremental, last_sync) {
            (true, Some(since)) => self.client.get_videos_modified_since(since).await?,
            _ => self.fetch(&options.source).await?,
        };

        let total = records.len();
        let mut added_ids = Vec::new();
        for record in records {
            result.videos_processed += 1;
            match record {
                Ok(video) => {
                    if self.filter.check(&video).is_some() {
                        result.videos_skipped += 1;
                        self.observer.on_video(&video, false);
                    } else {
                        let video_type = VideoType::classify(
                            video.duration,
                            self.config.sync.short_form_max_duration,
                        );
                        added_ids.push(video.id.clone());
                        self.generator.add_video(&video, Some(video_type), None, None);
                        result.videos_added += 1;
                        self.observer.on_video(&video, true);
                    }
                }
                Err(e) => {
                    warn!(error = %e, "skipping untranslatable video record");
                    result.videos_failed += 1;
                    result.errors.push(format!("video record failed: {e}"));
                }
            }
            self.observer.on_progress(result.videos_processed, total);
        }

        for issue in self.generator.validate() {
            warn!(issue = %issue, "feed validation issue");
            result.errors.push(format!("validation: {issue}"));
        }

        let path = self.generator.save(None).await?;
        result.feed_path = Some(path.clone());

        if options.upload {
            match self.upload(&path).await {
                Ok(Some(url)) => result.feed_url = Some(url),
                Ok(None) => debug!("upload requested but no bucket configured"),
                Err(e) => {
                    warn!(error = %e, "feed upload failed");
                    result.errors.push(format!("upload failed: {e}"));
                }
            }
        }

        if options.notify {
            if let Some(url) = &result.feed_url {
                if !self.notifier.notify_feed_updated(url, None).await {
                    result.errors.push("webhook notification failed".to_string());
                }
            }
        }

        let cache_enabled = self.config.sync.cache_enabled;
        let cache_path = self.config.sync.cache_path.clone();
        let state = self.state_mut().await;
        state.record_sync(added_ids);
        if cache_enabled {
            state.save(&cache_path).await?;
        }

        Ok(())
    }

    async fn fetch(&self, source: &VideoSource) -> ManagerResult<Vec<VimeoResult<Video>>> {
        let records = match source {
            VideoSource::All => self.client.all_videos().collect(None).await?,
            VideoSource::Album(id) => {
                self.client.album_videos(id.as_deref())?.collect(None).await?
            }
            VideoSource::Folder(id) => {
                self.client.folder_videos(id.as_deref())?.collect(None).await?
            }
        };
        Ok(records)
    }

    async fn upload(&self, path: &std::path::Path) -> ManagerResult<Option<String>> {
        if self.config.storage.s3_bucket.is_none() {
            return Ok(None);
        }
        let store = FeedStore::new(self.config.storage.clone()).await?;
        let url = store.upload_feed(path, None).await?;
        Ok(Some(url))
    }

    async fn state_mut(&mut self) -> &mut SyncState {
        if self.state.is_none() {
            let loaded = if self.config.sync.cache_enabled {
                SyncState::load(&self.config.sync.cache_path).await
            } else {
                SyncState::default()
            };
            self.state = Some(loaded);
        }
        self.state.get_or_insert_with(SyncState::default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SyncConfig;
    use vrsync_feed::FeedConfig;
    use vrsync_vimeo::VimeoConfig;

    fn test_config() -> Config {
        Config {
            vimeo: VimeoConfig {
                access_token: "token".to_string(),
                user_id: Some("12345".to_string()),
                ..VimeoConfig::default()
            },
            feed: FeedConfig {
                provider_name: "Test Channel".to_string(),
                ..FeedConfig::default()
            },
            storage: Default::default(),
            sync: SyncConfig {
                cache_enabled: false,
                ..SyncConfig::default()
            },
        }
    }

    #[test]
    fn test_default_options_are_full_local_sync() {
        let options = SyncOptions::default();
        assert_eq!(options.source, VideoSource::All);
        assert!(!options.incremental);
        assert!(!options.upload);
        assert!(!options.notify);
    }

    #[test]
    fn test_manager_requires_provider_name() {
        let mut config = test_config();
        config.feed.provider_name.clear();
        assert!(SyncManager::new(config).is_err());
    }

    #[test]
    fn test_manager_requires_access_token() {
        let mut config = test_config();
        config.vimeo.access_token.clear();
        assert!(SyncManager::new(config).is_err());
    }

    #[tokio::test]
    async fn test_state_starts_empty_when_cache_disabled() {
        let mut manager = SyncManager::new(test_config()).unwrap();
        let info = manager.last_sync_info().await;
        assert!(info.last_sync.is_none());
        assert!(info.synced_video_ids.is_empty());
    }
}
