//! The Roku Direct Publisher feed document.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

use crate::roku::{RokuVideo, VideoType};
use crate::timestamp::format_utc_timestamp;

/// A complete Direct Publisher feed.
///
/// Video entries land in exactly one bucket, matching the
/// classification decided at mapping time; insertion order within a
/// bucket is preserved. Series, playlist and category records are
/// pass-through JSON appended by the feed builder.
#[derive(Debug, Clone, Serialize)]
pub struct RokuFeed {
    #[serde(rename = "providerName")]
    pub provider_name: String,
    pub language: String,
    #[serde(rename = "lastUpdated", serialize_with = "serialize_timestamp")]
    pub last_updated: DateTime<Utc>,
    #[serde(rename = "shortFormVideos", skip_serializing_if = "Vec::is_empty")]
    pub short_form_videos: Vec<RokuVideo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub movies: Vec<RokuVideo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub series: Vec<Value>,
    #[serde(rename = "tvSpecials", skip_serializing_if = "Vec::is_empty")]
    pub tv_specials: Vec<RokuVideo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub playlists: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<Value>,
}

fn serialize_timestamp<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format_utc_timestamp(ts))
}

impl RokuFeed {
    /// Create an empty feed for a provider.
    pub fn new(provider_name: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            provider_name: provider_name.into(),
            language: language.into(),
            last_updated: Utc::now(),
            short_form_videos: Vec::new(),
            movies: Vec::new(),
            series: Vec::new(),
            tv_specials: Vec::new(),
            playlists: Vec::new(),
            categories: Vec::new(),
        }
    }

    /// Place a mapped video in the bucket matching its classification.
    ///
    /// `Series` and `Episode` entries are not bucketed here; series
    /// content is appended through the feed builder's series API.
    pub fn add_video(&mut self, video: RokuVideo) {
        match video.video_type {
            VideoType::ShortForm => self.short_form_videos.push(video),
            VideoType::Movie => self.movies.push(video),
            VideoType::TvSpecial => self.tv_specials.push(video),
            VideoType::Series | VideoType::Episode => {
                debug!(
                    id = %video.id,
                    video_type = %video.video_type,
                    "dropping entry with non-bucketed classification"
                );
            }
        }
    }

    /// Total standalone video entries (series episodes not counted).
    pub fn total_videos(&self) -> usize {
        self.short_form_videos.len() + self.movies.len() + self.tv_specials.len()
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roku::{RokuVideo, VideoContent, VideoType};

    fn entry(id: &str, video_type: VideoType) -> RokuVideo {
        RokuVideo {
            id: id.to_string(),
            title: "Title".to_string(),
            short_description: "Short".to_string(),
            long_description: "Long".to_string(),
            release_date: "2024-01-01".to_string(),
            thumbnail: "https://i.vimeocdn.com/t.jpg".to_string(),
            content: VideoContent {
                date_added: "2024-01-01T00:00:00Z".to_string(),
                duration: 60,
                videos: vec![],
            },
            tags: vec![],
            genres: vec!["Entertainment".to_string()],
            rating: None,
            video_type,
        }
    }

    #[test]
    fn test_add_video_buckets_by_type() {
        let mut feed = RokuFeed::new("Acme", "en");
        feed.add_video(entry("a", VideoType::ShortForm));
        feed.add_video(entry("b", VideoType::Movie));
        feed.add_video(entry("c", VideoType::TvSpecial));
        feed.add_video(entry("d", VideoType::Series));
        feed.add_video(entry("e", VideoType::Episode));

        assert_eq!(feed.short_form_videos.len(), 1);
        assert_eq!(feed.movies.len(), 1);
        assert_eq!(feed.tv_specials.len(), 1);
        assert_eq!(feed.total_videos(), 3);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut feed = RokuFeed::new("Acme", "en");
        feed.add_video(entry("first", VideoType::Movie));
        feed.add_video(entry("second", VideoType::Movie));
        assert_eq!(feed.movies[0].id, "first");
        assert_eq!(feed.movies[1].id, "second");
    }

    #[test]
    fn test_empty_buckets_omitted_from_json() {
        let mut feed = RokuFeed::new("Acme", "en");
        feed.add_video(entry("a", VideoType::Movie));

        let value: Value = serde_json::from_str(&feed.to_json().unwrap()).unwrap();
        assert_eq!(value["providerName"], "Acme");
        assert_eq!(value["language"], "en");
        assert!(value["lastUpdated"].as_str().unwrap().ends_with('Z'));
        assert_eq!(value["movies"].as_array().unwrap().len(), 1);
        assert!(value.get("shortFormVideos").is_none());
        assert!(value.get("series").is_none());
        assert!(value.get("tvSpecials").is_none());
        assert!(value.get("playlists").is_none());
        assert!(value.get("categories").is_none());
    }

    #[test]
    fn test_round_trip_counts_match() {
        let mut feed = RokuFeed::new("Acme", "en");
        feed.add_video(entry("a", VideoType::ShortForm));
        feed.add_video(entry("b", VideoType::ShortForm));
        feed.add_video(entry("c", VideoType::Movie));

        let value: Value = serde_json::from_str(&feed.to_json().unwrap()).unwrap();
        assert_eq!(
            value["shortFormVideos"].as_array().unwrap().len(),
            feed.short_form_videos.len()
        );
        assert_eq!(value["movies"].as_array().unwrap().len(), feed.movies.len());
    }
}
