//! Video filter chain.
//!
//! Applies the configured filters to a candidate video in a fixed order:
//! privacy, duration floor, duration ceiling, include tags, exclude tags,
//! playability. The first failing filter wins and is reported as the skip
//! reason.

use tracing::debug;

use vrsync_models::Video;

use crate::config::SyncConfig;

/// Why a video was excluded from the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Private,
    TooShort,
    TooLong,
    MissingIncludeTag,
    ExcludedTag,
    NoPlayableFile,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "not public",
            Self::TooShort => "below minimum duration",
            Self::TooLong => "above maximum duration",
            Self::MissingIncludeTag => "missing required tag",
            Self::ExcludedTag => "carries excluded tag",
            Self::NoPlayableFile => "no playable rendition",
        }
    }
}

#[derive(Debug, Clone)]
pub struct VideoFilter {
    include_private: bool,
    min_duration: u64,
    max_duration: Option<u64>,
    include_tags: Vec<String>,
    exclude_tags: Vec<String>,
}

impl VideoFilter {
    pub fn new(config: &SyncConfig) -> Self {
        // Tag comparisons are case-insensitive, so normalize once up front.
        Self {
            include_private: config.include_private,
            min_duration: config.min_duration,
            max_duration: config.max_duration,
            include_tags: lowered(&config.include_tags),
            exclude_tags: lowered(&config.exclude_tags),
        }
    }

    /// Check a video against every filter. Returns the first reason to
    /// skip it, or `None` when the video should be included.
    pub fn check(&self, video: &Video) -> Option<SkipReason> {
        let reason = self.evaluate(video);
        if let Some(reason) = reason {
            debug!(video_id = %video.id, title = %video.title, reason = reason.as_str(), "video filtered out");
        }
        reason
    }

    fn evaluate(&self, video: &Video) -> Option<SkipReason> {
        if !self.include_private && !video.is_public() {
            return Some(SkipReason::Private);
        }
        if video.duration < self.min_duration {
            return Some(SkipReason::TooShort);
        }
        if let Some(max) = self.max_duration {
            if video.duration > max {
                return Some(SkipReason::TooLong);
            }
        }
        if !self.include_tags.is_empty() {
            let has_required = video
                .tags
                .iter()
                .any(|t| self.include_tags.contains(&t.to_lowercase()));
            if !has_required {
                return Some(SkipReason::MissingIncludeTag);
            }
        }
        if !self.exclude_tags.is_empty() {
            let has_excluded = video
                .tags
                .iter()
                .any(|t| self.exclude_tags.contains(&t.to_lowercase()));
            if has_excluded {
                return Some(SkipReason::ExcludedTag);
            }
        }
        if video.best_video_file().is_none() {
            return Some(SkipReason::NoPlayableFile);
        }
        None
    }
}

fn lowered(tags: &[String]) -> Vec<String> {
    tags.iter().map(|t| t.to_lowercase()).collect()
}
