//! Feed generation: classification, defaulting, validation, persistence.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use vrsync_models::roku::{
    truncate, DEFAULT_SHORT_FORM_MAX_DURATION, LONG_DESC_MAX_LENGTH, SHORT_DESC_MAX_LENGTH,
    TITLE_MAX_LENGTH,
};
use vrsync_models::{
    format_utc_date, format_utc_timestamp, Rating, RokuFeed, RokuVideo, Video, VideoType,
};

use crate::config::FeedConfig;
use crate::error::{FeedError, FeedResult};

/// Minimum thumbnail width requested from source videos.
const MIN_THUMBNAIL_WIDTH: u32 = 800;

/// A series to append to the feed: ordered episodes, optionally
/// grouped into seasons by index.
#[derive(Debug, Clone)]
pub struct SeriesSpec {
    pub id: String,
    pub title: String,
    pub episodes: Vec<Video>,
    /// Season number to indices into `episodes`. `None` puts every
    /// episode into season 1 in listing order.
    pub seasons: Option<BTreeMap<u32, Vec<usize>>>,
    pub description: String,
    pub thumbnail: String,
    pub genres: Vec<String>,
    pub release_date: Option<String>,
}

impl SeriesSpec {
    pub fn new(id: impl Into<String>, title: impl Into<String>, episodes: Vec<Video>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            episodes,
            seasons: None,
            description: String::new(),
            thumbnail: String::new(),
            genres: Vec::new(),
            release_date: None,
        }
    }
}

/// Per-bucket feed counts.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FeedStats {
    pub short_form_videos: usize,
    pub movies: usize,
    pub series: usize,
    pub tv_specials: usize,
    pub playlists: usize,
    pub categories: usize,
    pub total_videos: usize,
}

/// Builds a Roku Direct Publisher feed from source videos.
///
/// Validation is a non-fatal gate: [`validate`] collects messages and
/// [`save`] logs them, but the feed is written regardless.
///
/// [`validate`]: FeedGenerator::validate
/// [`save`]: FeedGenerator::save
#[derive(Debug)]
pub struct FeedGenerator {
    config: FeedConfig,
    feed: RokuFeed,
}

impl FeedGenerator {
    /// Create a generator. The provider name must be configured.
    pub fn new(config: FeedConfig) -> FeedResult<Self> {
        if config.provider_name.is_empty() {
            return Err(FeedError::construction("Provider name is required"));
        }
        let feed = RokuFeed::new(&config.provider_name, &config.language);
        Ok(Self { config, feed })
    }

    /// Reset the feed to an empty state.
    pub fn reset(&mut self) {
        self.feed = RokuFeed::new(&self.config.provider_name, &self.config.language);
    }

    /// Read-only view of the feed under construction.
    pub fn feed(&self) -> &RokuFeed {
        &self.feed
    }

    /// Map a video and place it in the feed.
    ///
    /// Without a classification hint, the default duration threshold
    /// decides between short-form and movie. Genre precedence is
    /// explicit override, then source categories, then the configured
    /// default genre. A rating is attached only when an override is
    /// given or both rating knobs are configured.
    pub fn add_video(
        &mut self,
        video: &Video,
        video_type: Option<VideoType>,
        genres: Option<Vec<String>>,
        rating: Option<Rating>,
    ) -> RokuVideo {
        let video_type = video_type.unwrap_or_else(|| {
            VideoType::classify(video.duration, DEFAULT_SHORT_FORM_MAX_DURATION)
        });

        let mut roku_video = RokuVideo::from_video(video, Some(video_type));

        if let Some(genres) = genres {
            roku_video.genres = genres;
        } else if roku_video.genres.is_empty() {
            roku_video.genres = vec![self.config.default_genre.clone()];
        }

        if let Some(rating) = rating {
            roku_video.rating = Some(rating);
        } else if !self.config.rating_system.is_empty() && !self.config.default_rating.is_empty() {
            roku_video.rating = Some(Rating {
                rating: self.config.default_rating.clone(),
                rating_source: self.config.rating_system.clone(),
            });
        }

        debug!("Added video '{}' as {}", roku_video.title, video_type);
        self.feed.add_video(roku_video.clone());
        roku_video
    }

    /// Map and add a batch of videos with shared overrides.
    pub fn add_videos(
        &mut self,
        videos: &[Video],
        video_type: Option<VideoType>,
        genres: Option<Vec<String>>,
    ) -> Vec<RokuVideo> {
        videos
            .iter()
            .map(|v| self.add_video(v, video_type, genres.clone(), None))
            .collect()
    }

    /// Append a series record with season/episode structure.
    pub fn add_series(&mut self, spec: &SeriesSpec) {
        let seasons = spec.seasons.clone().unwrap_or_else(|| {
            BTreeMap::from([(1, (0..spec.episodes.len()).collect::<Vec<_>>())])
        });

        let mut seasons_data = Vec::new();
        for (season_num, episode_indices) in &seasons {
            let mut episodes_data = Vec::new();
            for (ep_idx, &video_idx) in episode_indices.iter().enumerate() {
                let Some(video) = spec.episodes.get(video_idx) else {
                    continue;
                };

                let thumbnail = video
                    .best_thumbnail(MIN_THUMBNAIL_WIDTH)
                    .map(|t| t.url.as_str())
                    .unwrap_or("");
                let mut videos = Vec::new();
                if let Some(file) = video.best_video_file() {
                    videos.push(json!({
                        "url": file.url,
                        "quality": file.quality.as_str(),
                        "videoType": file.video_type,
                    }));
                }

                let (short_desc, long_desc) = if video.description.is_empty() {
                    (video.title.clone(), video.title.clone())
                } else {
                    (
                        truncate(&video.description, SHORT_DESC_MAX_LENGTH),
                        truncate(&video.description, LONG_DESC_MAX_LENGTH),
                    )
                };

                episodes_data.push(json!({
                    "id": format!("{}-s{}e{}", spec.id, season_num, ep_idx + 1),
                    "title": video.title,
                    "episodeNumber": ep_idx + 1,
                    "shortDescription": short_desc,
                    "longDescription": long_desc,
                    "releaseDate": format_utc_date(&video.release_date),
                    "thumbnail": thumbnail,
                    "content": {
                        "dateAdded": format_utc_timestamp(&video.created_time),
                        "duration": video.duration,
                        "videos": videos,
                    },
                }));
            }

            seasons_data.push(json!({
                "seasonNumber": season_num,
                "episodes": episodes_data,
            }));
        }

        let thumbnail = if spec.thumbnail.is_empty() {
            spec.episodes
                .first()
                .and_then(|v| v.best_thumbnail(MIN_THUMBNAIL_WIDTH))
                .map(|t| t.url.clone())
                .unwrap_or_default()
        } else {
            spec.thumbnail.clone()
        };

        let (short_desc, long_desc) = if spec.description.is_empty() {
            (spec.title.clone(), spec.title.clone())
        } else {
            (
                truncate(&spec.description, SHORT_DESC_MAX_LENGTH),
                truncate(&spec.description, LONG_DESC_MAX_LENGTH),
            )
        };

        let release_date = spec.release_date.clone().unwrap_or_else(|| {
            spec.episodes
                .first()
                .map(|v| format_utc_date(&v.release_date))
                .unwrap_or_default()
        });

        let genres = if spec.genres.is_empty() {
            vec![self.config.default_genre.clone()]
        } else {
            spec.genres.clone()
        };

        self.feed.series.push(json!({
            "id": spec.id,
            "title": truncate(&spec.title, TITLE_MAX_LENGTH),
            "shortDescription": short_desc,
            "longDescription": long_desc,
            "thumbnail": thumbnail,
            "releaseDate": release_date,
            "genres": genres,
            "seasons": seasons_data,
        }));
        debug!(
            "Added series '{}' with {} episodes",
            spec.title,
            spec.episodes.len()
        );
    }

    /// Append a playlist record.
    pub fn add_playlist(&mut self, playlist_id: &str, name: &str, video_ids: Vec<String>) {
        self.feed.playlists.push(json!({
            "name": name,
            "playlistId": playlist_id,
            "itemIds": video_ids,
        }));
        debug!("Added playlist '{}'", name);
    }

    /// Append a category grouping playlists.
    pub fn add_category(&mut self, name: &str, playlist_ids: Vec<String>, order: &str) {
        self.feed.categories.push(json!({
            "name": name,
            "playlistIds": playlist_ids,
            "order": order,
        }));
    }

    /// Validate the feed against Roku requirements.
    ///
    /// Returns collected messages; an empty list means valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.feed.provider_name.is_empty() {
            errors.push("Provider name is required".to_string());
        }

        for video in &self.feed.short_form_videos {
            validate_video(video, "shortFormVideo", &mut errors);
        }
        for video in &self.feed.movies {
            validate_video(video, "movie", &mut errors);
        }

        for series in &self.feed.series {
            let id = series.get("id").and_then(Value::as_str).unwrap_or("");
            if id.is_empty() {
                errors.push("Series missing required 'id' field".to_string());
            }
            if series
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or("")
                .is_empty()
            {
                errors.push("Series missing required 'title' field".to_string());
            }
            let has_seasons = series
                .get("seasons")
                .and_then(Value::as_array)
                .is_some_and(|s| !s.is_empty());
            if !has_seasons {
                errors.push(format!("Series '{id}' has no seasons"));
            }
        }

        errors
    }

    /// Whether the feed currently passes validation.
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Per-bucket counts for the feed under construction.
    pub fn stats(&self) -> FeedStats {
        FeedStats {
            short_form_videos: self.feed.short_form_videos.len(),
            movies: self.feed.movies.len(),
            series: self.feed.series.len(),
            tv_specials: self.feed.tv_specials.len(),
            playlists: self.feed.playlists.len(),
            categories: self.feed.categories.len(),
            total_videos: self.feed.total_videos(),
        }
    }

    /// Serialize the feed with a fresh `lastUpdated` timestamp.
    pub fn to_json(&mut self) -> FeedResult<String> {
        self.feed.last_updated = Utc::now();
        Ok(self.feed.to_json()?)
    }

    /// Persist the feed to disk.
    ///
    /// Validation messages are logged but never block the write. The
    /// document is written to a temp file in the target directory and
    /// renamed into place so readers never observe a partial feed.
    pub async fn save(&mut self, path: Option<&Path>) -> FeedResult<PathBuf> {
        let path = path
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(&self.config.feed_output_path));

        let errors = self.validate();
        if !errors.is_empty() {
            warn!("Feed has {} validation issues:", errors.len());
            for error in errors.iter().take(10) {
                warn!("  - {}", error);
            }
        }

        let json = self.to_json()?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &path).await?;

        info!("Feed saved to {}", path.display());
        Ok(path)
    }
}

fn validate_video(video: &RokuVideo, kind: &str, errors: &mut Vec<String>) {
    let prefix = format!("{} '{}'", kind, video.id);

    if video.id.is_empty() {
        errors.push(format!("{prefix}: Missing required 'id' field"));
    }
    if video.title.is_empty() {
        errors.push(format!("{prefix}: Missing required 'title' field"));
    } else if video.title.chars().count() > TITLE_MAX_LENGTH {
        errors.push(format!(
            "{prefix}: Title exceeds {TITLE_MAX_LENGTH} characters"
        ));
    }
    if video.short_description.chars().count() > SHORT_DESC_MAX_LENGTH {
        errors.push(format!(
            "{prefix}: Short description exceeds {SHORT_DESC_MAX_LENGTH} characters"
        ));
    }
    if video.thumbnail.is_empty() {
        errors.push(format!("{prefix}: Missing required 'thumbnail' field"));
    }
    if video.content.videos.is_empty() {
        errors.push(format!("{prefix}: No video content URLs provided"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use vrsync_models::{Thumbnail, VideoFile, VideoQuality};

    fn test_config() -> FeedConfig {
        FeedConfig {
            provider_name: "Acme Media".to_string(),
            ..Default::default()
        }
    }

    fn source_video(id: &str, duration: u64) -> Video {
        Video {
            id: id.to_string(),
            title: format!("Video {id}"),
            description: "A description.".to_string(),
            duration,
            created_time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            modified_time: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
            release_date: Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap(),
            thumbnails: vec![Thumbnail {
                url: format!("https://i.vimeocdn.com/{id}.jpg"),
                width: 1280,
                height: 720,
            }],
            video_files: vec![VideoFile {
                url: format!("https://player.vimeo.com/{id}.m3u8"),
                quality: VideoQuality::HD,
                video_type: "HLS".to_string(),
                bitrate: None,
                width: None,
                height: None,
            }],
            tags: vec![],
            categories: vec![],
            privacy: "anybody".to_string(),
            embed_html: None,
            link: None,
            plays: 0,
            likes: 0,
            vimeo_uri: None,
            vimeo_embed_url: None,
        }
    }

    #[test]
    fn test_new_requires_provider_name() {
        let err = FeedGenerator::new(FeedConfig::default()).unwrap_err();
        assert!(matches!(err, FeedError::Construction(_)));
    }

    #[test]
    fn test_add_video_classifies_by_duration() {
        let mut gen = FeedGenerator::new(test_config()).unwrap();
        gen.add_video(&source_video("a", 300), None, None, None);
        gen.add_video(&source_video("b", 900), None, None, None);

        let stats = gen.stats();
        assert_eq!(stats.short_form_videos, 1);
        assert_eq!(stats.movies, 1);
    }

    #[test]
    fn test_genre_precedence() {
        let mut gen = FeedGenerator::new(test_config()).unwrap();

        // Explicit override wins.
        let v = gen.add_video(
            &source_video("a", 60),
            None,
            Some(vec!["Sports".to_string()]),
            None,
        );
        assert_eq!(v.genres, vec!["Sports"]);

        // Source categories next.
        let mut with_cats = source_video("b", 60);
        with_cats.categories = vec!["Documentary".to_string()];
        let v = gen.add_video(&with_cats, None, None, None);
        assert_eq!(v.genres, vec!["Documentary"]);

        // Configured default last.
        let v = gen.add_video(&source_video("c", 60), None, None, None);
        assert_eq!(v.genres, vec!["Entertainment"]);
    }

    #[test]
    fn test_rating_defaulting() {
        let mut gen = FeedGenerator::new(test_config()).unwrap();
        let v = gen.add_video(&source_video("a", 60), None, None, None);
        let rating = v.rating.unwrap();
        assert_eq!(rating.rating, "TV-G");
        assert_eq!(rating.rating_source, "USA_TV");

        // Rating only attached when both knobs are configured.
        let mut config = test_config();
        config.default_rating = String::new();
        let mut gen = FeedGenerator::new(config).unwrap();
        let v = gen.add_video(&source_video("b", 60), None, None, None);
        assert!(v.rating.is_none());
    }

    #[test]
    fn test_reset_then_readd_is_idempotent() {
        let mut gen = FeedGenerator::new(test_config()).unwrap();
        let videos = vec![source_video("a", 60), source_video("b", 1200)];

        // lastUpdated differs between builds; compare everything else.
        let snapshot = |gen: &FeedGenerator| -> Value {
            let mut value: Value = serde_json::from_str(&gen.feed().to_json().unwrap()).unwrap();
            value.as_object_mut().unwrap().remove("lastUpdated");
            value
        };

        gen.add_videos(&videos, None, None);
        let first = snapshot(&gen);

        gen.reset();
        gen.add_videos(&videos, None, None);
        let second = snapshot(&gen);

        assert_eq!(first, second);
        assert_eq!(gen.stats().total_videos, 2);
    }

    #[test]
    fn test_add_series_structure() {
        let mut gen = FeedGenerator::new(test_config()).unwrap();
        let spec = SeriesSpec::new(
            "show1",
            "The Show",
            vec![source_video("e1", 1500), source_video("e2", 1500)],
        );
        gen.add_series(&spec);

        let series = &gen.feed().series[0];
        assert_eq!(series["id"], "show1");
        assert_eq!(series["genres"][0], "Entertainment");
        // Thumbnail falls back to the first episode's.
        assert_eq!(series["thumbnail"], "https://i.vimeocdn.com/e1.jpg");

        let seasons = series["seasons"].as_array().unwrap();
        assert_eq!(seasons.len(), 1);
        assert_eq!(seasons[0]["seasonNumber"], 1);
        let episodes = seasons[0]["episodes"].as_array().unwrap();
        assert_eq!(episodes.len(), 2);
        assert_eq!(episodes[0]["id"], "show1-s1e1");
        assert_eq!(episodes[1]["id"], "show1-s1e2");
        assert_eq!(episodes[1]["episodeNumber"], 2);
    }

    #[test]
    fn test_validation_collects_messages() {
        let mut gen = FeedGenerator::new(test_config()).unwrap();

        let mut bad = source_video("a", 60);
        bad.thumbnails.clear();
        bad.video_files.clear();
        gen.add_video(&bad, None, None, None);

        let errors = gen.validate();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.contains("thumbnail")));
        assert!(errors.iter().any(|e| e.contains("No video content")));
        assert!(!gen.is_valid());
    }

    #[test]
    fn test_series_validation() {
        let mut gen = FeedGenerator::new(test_config()).unwrap();
        gen.add_series(&SeriesSpec::new("", "", vec![]));

        let errors = gen.validate();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.contains("'id'")));
        assert!(errors.iter().any(|e| e.contains("'title'")));
    }

    #[tokio::test]
    async fn test_save_writes_valid_json_and_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/feed.json");

        let mut gen = FeedGenerator::new(test_config()).unwrap();
        gen.add_video(&source_video("a", 60), None, None, None);

        // Invalid entries are logged but never block the write.
        let mut bad = source_video("b", 60);
        bad.thumbnails.clear();
        gen.add_video(&bad, None, None, None);

        let written = gen.save(Some(&path)).await.unwrap();
        assert_eq!(written, path);

        let content = std::fs::read_to_string(&path).unwrap();
        let value: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["providerName"], "Acme Media");
        assert_eq!(value["shortFormVideos"].as_array().unwrap().len(), 2);

        // No leftover temp file.
        assert!(!path.with_extension("json.tmp").exists());
    }
}
