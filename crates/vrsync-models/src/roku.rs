//! Roku Direct Publisher feed entry models.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::timestamp::{format_utc_date, format_utc_timestamp};
use crate::video::Video;

/// Roku content title limit.
pub const TITLE_MAX_LENGTH: usize = 100;
/// Roku short description limit.
pub const SHORT_DESC_MAX_LENGTH: usize = 200;
/// Roku long description limit.
pub const LONG_DESC_MAX_LENGTH: usize = 500;
/// Maximum tags carried into a feed entry.
pub const MAX_TAGS: usize = 20;
/// Maximum genres carried into a feed entry.
pub const MAX_GENRES: usize = 5;

/// Duration threshold (seconds) under which a video is short-form.
pub const DEFAULT_SHORT_FORM_MAX_DURATION: u64 = 900;

/// Content classification for feed bucket placement.
///
/// `Series` and `Episode` are never produced by duration-based
/// classification; series content enters the feed through the
/// dedicated series append API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VideoType {
    #[default]
    #[serde(rename = "shortFormVideo")]
    ShortForm,
    #[serde(rename = "movie")]
    Movie,
    #[serde(rename = "series")]
    Series,
    #[serde(rename = "episode")]
    Episode,
    #[serde(rename = "tvSpecial")]
    TvSpecial,
}

impl VideoType {
    /// Classify a duration against a short-form threshold. The
    /// threshold itself is feature-length (exclusive on the short side).
    pub fn classify(duration: u64, short_form_max: u64) -> Self {
        if duration < short_form_max {
            VideoType::ShortForm
        } else {
            VideoType::Movie
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VideoType::ShortForm => "shortFormVideo",
            VideoType::Movie => "movie",
            VideoType::Series => "series",
            VideoType::Episode => "episode",
            VideoType::TvSpecial => "tvSpecial",
        }
    }
}

impl fmt::Display for VideoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Content rating attached to a feed entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub rating: String,
    #[serde(rename = "ratingSource")]
    pub rating_source: String,
}

/// One playable rendition inside a feed entry's content block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentVideo {
    pub url: String,
    pub quality: String,
    #[serde(rename = "videoType")]
    pub video_type: String,
}

/// The `content` block of a feed entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoContent {
    #[serde(rename = "dateAdded")]
    pub date_added: String,
    pub duration: u64,
    pub videos: Vec<ContentVideo>,
}

/// A video mapped into the Roku Direct Publisher entry schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RokuVideo {
    pub id: String,
    pub title: String,
    #[serde(rename = "shortDescription")]
    pub short_description: String,
    #[serde(rename = "longDescription")]
    pub long_description: String,
    #[serde(rename = "releaseDate")]
    pub release_date: String,
    pub thumbnail: String,
    pub content: VideoContent,
    pub tags: Vec<String>,
    pub genres: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
    /// Classification decided once during mapping; drives bucket
    /// placement and is never serialized into the entry itself.
    #[serde(skip)]
    pub video_type: VideoType,
}

impl RokuVideo {
    /// Map a source [`Video`] into a Roku feed entry.
    ///
    /// Identifiers are namespaced with a `vimeo-` prefix so entries
    /// from other sources sharing the feed cannot collide. Titles and
    /// descriptions are hard-truncated to the Roku ceilings.
    pub fn from_video(video: &Video, video_type: Option<VideoType>) -> Self {
        let thumbnail_url = video
            .best_thumbnail(800)
            .map(|t| t.url.clone())
            .unwrap_or_default();

        let mut videos = Vec::new();
        if let Some(file) = video.best_video_file() {
            videos.push(ContentVideo {
                url: file.url.clone(),
                quality: file.quality.as_str().to_string(),
                video_type: file.video_type.clone(),
            });
        }

        let video_type = video_type.unwrap_or_else(|| {
            VideoType::classify(video.duration, DEFAULT_SHORT_FORM_MAX_DURATION)
        });

        let (short_desc, long_desc) = if video.description.is_empty() {
            (video.title.clone(), video.title.clone())
        } else {
            (
                truncate(&video.description, SHORT_DESC_MAX_LENGTH),
                truncate(&video.description, LONG_DESC_MAX_LENGTH),
            )
        };

        // Genre defaulting for empty categories is the feed builder's
        // job; it knows the configured default genre.
        let genres = video.categories.iter().take(MAX_GENRES).cloned().collect();

        RokuVideo {
            id: format!("vimeo-{}", video.id),
            title: truncate(&video.title, TITLE_MAX_LENGTH),
            short_description: short_desc,
            long_description: long_desc,
            release_date: format_utc_date(&video.release_date),
            thumbnail: thumbnail_url,
            content: VideoContent {
                date_added: format_utc_timestamp(&video.created_time),
                duration: video.duration,
                videos,
            },
            tags: video.tags.iter().take(MAX_TAGS).cloned().collect(),
            genres,
            rating: None,
            video_type,
        }
    }
}

/// Hard character cut, not word-aware.
pub fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
