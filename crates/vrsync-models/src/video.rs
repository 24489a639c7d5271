//! Source video models parsed from Vimeo API responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

use crate::timestamp::parse_vimeo_datetime;

/// Error translating a single API record into a [`Video`].
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("record has no derivable identifier (empty uri and resource_key)")]
    MissingIdentifier,
}

/// Video quality tiers, derived from pixel height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VideoQuality {
    SD,
    HD,
    FHD,
    UHD,
}

impl VideoQuality {
    /// Derive the quality tier from a rendition's pixel height.
    pub fn from_height(height: u32) -> Self {
        if height >= 2160 {
            VideoQuality::UHD
        } else if height >= 1080 {
            VideoQuality::FHD
        } else if height >= 720 {
            VideoQuality::HD
        } else {
            VideoQuality::SD
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VideoQuality::SD => "SD",
            VideoQuality::HD => "HD",
            VideoQuality::FHD => "FHD",
            VideoQuality::UHD => "UHD",
        }
    }
}

impl fmt::Display for VideoQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One playable rendition of a video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoFile {
    pub url: String,
    pub quality: VideoQuality,
    /// Transport/container type: HLS, MP4, DASH.
    pub video_type: String,
    pub bitrate: Option<u64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// A thumbnail image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

/// A video fetched from Vimeo. Constructed once per API record and
/// treated as read-only for the rest of the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Duration in seconds.
    pub duration: u64,
    pub created_time: DateTime<Utc>,
    pub modified_time: DateTime<Utc>,
    pub release_date: DateTime<Utc>,
    pub thumbnails: Vec<Thumbnail>,
    pub video_files: Vec<VideoFile>,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    /// Privacy view setting; "anybody" means publicly viewable.
    pub privacy: String,
    pub embed_html: Option<String>,
    pub link: Option<String>,
    pub plays: u64,
    pub likes: u64,
    pub vimeo_uri: Option<String>,
    pub vimeo_embed_url: Option<String>,
}

impl Video {
    /// Build a [`Video`] from a Vimeo API response record.
    ///
    /// The identifier is the trailing segment of the record's `uri`,
    /// falling back to `resource_key` when the uri is absent. Missing
    /// optional fields take neutral defaults so one sparse record does
    /// not fail the whole page.
    pub fn from_vimeo_response(data: &Value) -> Result<Self, ParseError> {
        let obj = data.as_object().ok_or(ParseError::NotAnObject)?;

        let uri = obj.get("uri").and_then(Value::as_str).unwrap_or("");
        let id = match uri.rsplit('/').next().filter(|s| !s.is_empty()) {
            Some(seg) => seg.to_string(),
            None => obj
                .get("resource_key")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .ok_or(ParseError::MissingIdentifier)?
                .to_string(),
        };

        let mut thumbnails = Vec::new();
        if let Some(sizes) = obj
            .get("pictures")
            .and_then(|p| p.get("sizes"))
            .and_then(Value::as_array)
        {
            for pic in sizes {
                thumbnails.push(Thumbnail {
                    url: str_field(pic, "link"),
                    width: u32_field(pic, "width"),
                    height: u32_field(pic, "height"),
                });
            }
        }

        let mut video_files = Vec::new();
        if let Some(files) = obj.get("files").and_then(Value::as_array) {
            for file in files {
                let height = file.get("height").and_then(Value::as_u64).map(|h| h as u32);
                // Mime types arrive as "video/mp4"; keep the bare container name.
                let video_type = file
                    .get("type")
                    .and_then(Value::as_str)
                    .unwrap_or("video/mp4")
                    .to_uppercase()
                    .replace("VIDEO/", "");
                video_files.push(VideoFile {
                    url: str_field(file, "link"),
                    quality: VideoQuality::from_height(height.unwrap_or(0)),
                    video_type,
                    bitrate: file.get("size").and_then(Value::as_u64),
                    width: file.get("width").and_then(Value::as_u64).map(|w| w as u32),
                    height,
                });
            }
        }

        // Adaptive-streaming playback link, when Vimeo exposes one.
        if let Some(hls) = obj.get("play").and_then(|p| p.get("hls")) {
            if !hls.is_null() {
                video_files.push(VideoFile {
                    url: str_field(hls, "link"),
                    quality: VideoQuality::HD,
                    video_type: "HLS".to_string(),
                    bitrate: None,
                    width: None,
                    height: None,
                });
            }
        }

        let tags = name_list(obj.get("tags"));
        let categories = name_list(obj.get("categories"));

        let created_time =
            parse_vimeo_datetime(obj.get("created_time").and_then(Value::as_str));
        let modified_time =
            parse_vimeo_datetime(obj.get("modified_time").and_then(Value::as_str));
        let release_date = match obj.get("release_time").and_then(Value::as_str) {
            Some(s) => parse_vimeo_datetime(Some(s)),
            None => created_time,
        };

        Ok(Video {
            id,
            title: obj
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("Untitled")
                .to_string(),
            description: str_field(data, "description"),
            duration: obj.get("duration").and_then(Value::as_u64).unwrap_or(0),
            created_time,
            modified_time,
            release_date,
            thumbnails,
            video_files,
            tags,
            categories,
            privacy: obj
                .get("privacy")
                .and_then(|p| p.get("view"))
                .and_then(Value::as_str)
                .unwrap_or("anybody")
                .to_string(),
            embed_html: obj
                .get("embed")
                .and_then(|e| e.get("html"))
                .and_then(Value::as_str)
                .map(String::from),
            link: obj.get("link").and_then(Value::as_str).map(String::from),
            plays: obj
                .get("stats")
                .and_then(|s| s.get("plays"))
                .and_then(Value::as_u64)
                .unwrap_or(0),
            likes: obj
                .get("metadata")
                .and_then(|m| m.get("connections"))
                .and_then(|c| c.get("likes"))
                .and_then(|l| l.get("total"))
                .and_then(Value::as_u64)
                .unwrap_or(0),
            vimeo_uri: obj.get("uri").and_then(Value::as_str).map(String::from),
            vimeo_embed_url: obj
                .get("player_embed_url")
                .and_then(Value::as_str)
                .map(String::from),
        })
    }

    /// Whether the video is publicly viewable.
    pub fn is_public(&self) -> bool {
        self.privacy == "anybody"
    }

    /// Pick the best thumbnail for a minimum width: the narrowest one
    /// that still meets the minimum, or the widest available when none
    /// do. Returns `None` when the video has no thumbnails.
    pub fn best_thumbnail(&self, min_width: u32) -> Option<&Thumbnail> {
        self.thumbnails
            .iter()
            .filter(|t| t.width >= min_width)
            .min_by_key(|t| t.width)
            .or_else(|| self.thumbnails.iter().max_by_key(|t| t.width))
    }

    /// Pick the best playable rendition: the first HLS rendition when
    /// one exists, otherwise the first match in quality priority order
    /// (UHD, FHD, HD, SD), otherwise the first rendition listed.
    pub fn best_video_file(&self) -> Option<&VideoFile> {
        if let Some(hls) = self.video_files.iter().find(|f| f.video_type == "HLS") {
            return Some(hls);
        }

        const PRIORITY: [VideoQuality; 4] = [
            VideoQuality::UHD,
            VideoQuality::FHD,
            VideoQuality::HD,
            VideoQuality::SD,
        ];
        for quality in PRIORITY {
            if let Some(file) = self.video_files.iter().find(|f| f.quality == quality) {
                return Some(file);
            }
        }
        self.video_files.first()
    }
}

fn str_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

fn u32_field(value: &Value, key: &str) -> u32 {
    value.get(key).and_then(Value::as_u64).unwrap_or(0) as u32
}

/// Collect the non-empty `name` entries of a tag/category array.
fn name_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.get("name").and_then(Value::as_str))
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}
