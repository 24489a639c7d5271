//! Shared data models for the Vimeo to Roku sync pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Source videos fetched from the Vimeo API
//! - Roku Direct Publisher feed entries and the feed document
//! - Quality tiers and content classification

pub mod feed;
pub mod roku;
pub mod timestamp;
pub mod video;

// Re-export common types
pub use feed::RokuFeed;
pub use roku::{
    ContentVideo, Rating, RokuVideo, VideoContent, VideoType, DEFAULT_SHORT_FORM_MAX_DURATION,
};
pub use timestamp::{format_utc_date, format_utc_timestamp, parse_vimeo_datetime};
pub use video::{ParseError, Thumbnail, Video, VideoFile, VideoQuality};
