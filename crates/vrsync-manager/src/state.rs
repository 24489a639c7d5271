//! Incremental sync state.
//!
//! A small JSON file records when the last successful sync ran, how many
//! videos it added, and the IDs of every video ever synced. Incremental runs
//! use the timestamp to fetch only modified videos; a corrupt or missing
//! file simply resets to a full sync rather than failing the run.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, warn};

use crate::error::ManagerResult;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncState {
    /// Completion time of the last successful sync.
    pub last_sync: Option<DateTime<Utc>>,
    /// Number of videos added by the last successful sync.
    #[serde(default)]
    pub last_video_count: usize,
    /// IDs of every video ever synced, in sync order. Append-only; the
    /// history is never pruned or deduplicated.
    #[serde(default)]
    pub synced_video_ids: Vec<String>,
}

impl SyncState {
    /// Load state from `path`. Missing or unreadable files yield the
    /// default (never-synced) state.
    pub async fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path).await {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(state) => state,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "corrupt sync state, starting fresh");
                    Self::default()
                }
            },
            Err(_) => {
                debug!(path = %path.display(), "no sync state found, starting fresh");
                Self::default()
            }
        }
    }

    /// Persist state to `path` via a temp file and rename, so a crash mid
    /// write never leaves a truncated state file behind.
    pub async fn save(&self, path: impl AsRef<Path>) -> ManagerResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| crate::error::SyncError::state(e.to_string()))?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, path).await?;
        debug!(path = %path.display(), total_ids = self.synced_video_ids.len(), "sync state saved");
        Ok(())
    }

    /// Record a completed run that added the given video IDs.
    pub fn record_sync(&mut self, added_ids: Vec<String>) {
        self.last_sync = Some(Utc::now());
        self.last_video_count = added_ids.len();
        self.synced_video_ids.extend(added_ids);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut state = SyncState::default();
        state.record_sync(vec!["vimeo-1".to_string(), "vimeo-2".to_string()]);
        state.save(&path).await.unwrap();

        let loaded = SyncState::load(&path).await;
        assert_eq!(loaded.last_video_count, 2);
        assert_eq!(loaded.synced_video_ids, vec!["vimeo-1", "vimeo-2"]);
        assert!(loaded.last_sync.is_some());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_history_accumulates_across_runs() {
        let mut state = SyncState::default();
        state.record_sync(vec!["vimeo-1".to_string(), "vimeo-2".to_string()]);
        state.record_sync(vec!["vimeo-2".to_string(), "vimeo-3".to_string()]);

        assert_eq!(state.last_video_count, 2);
        // History is append-only, duplicates included.
        assert_eq!(
            state.synced_video_ids,
            vec!["vimeo-1", "vimeo-2", "vimeo-2", "vimeo-3"]
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_fresh_state() {
        let state = SyncState::load("/nonexistent/state.json").await;
        assert!(state.last_sync.is_none());
        assert_eq!(state.last_video_count, 0);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_fresh_state() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        tokio::fs::write(&path, "{not json").await.unwrap();

        let state = SyncState::load(&path).await;
        assert!(state.last_sync.is_none());
        assert!(state.synced_video_ids.is_empty());
    }
}
